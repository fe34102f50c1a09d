//! # Tessera Core Library
//!
//! Bonded interactions for triangulated membrane meshes in particle
//! simulations: harmonic, FENE, and tether springs on mesh edges, a global
//! area-conservation term, and time-dependent periodic boxes.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data (`ParticleData`, `SimBox`, `MeshTopology`),
//!   the pure force laws and their parameters, box variants, and CSV I/O.
//!
//! - **[`engine`]: The Logic Core.** Mesh potentials with an attach/detach lifecycle,
//!   parallel bond and triangle evaluators, and the `ForceSet` a simulation sums each step.
//!
//! - **[`workflows`]: The Public API.** File-driven evaluation of a mesh and sampling
//!   of box variants over time, ready for a command-line front end.

pub mod core;
pub mod engine;
pub mod workflows;
