//! # Force Field Module
//!
//! Pure numerics for the bonded mesh potentials: parameter records, the
//! radial force laws, triangle area geometry, and the per-particle
//! accumulators the evaluators write into.
//!
//! ## Overview
//!
//! Nothing here knows about meshes or attachment state. Every function takes
//! a distance or a pair of edge vectors and returns energies and forces, so
//! the laws can be tested in isolation and reused by any evaluator.
//!
//! - **Harmonic bonds** `U = ½k(r - r0)²`
//! - **FENE bonds** with a WCA repulsive core
//! - **Tether bonds** that are flat inside `[l_c1, l_c0]`
//! - **Triangle areas** with analytic vertex gradients
//!
//! ## Key Components
//!
//! - [`params`] - Validated parameter records and the TOML parameter file
//! - [`potentials`] - Force laws returning force-over-distance and energy
//! - [`surface`] - Triangle area and its gradients
//! - [`term`] - Force, energy, and virial accumulators
//!
//! ## Usage
//!
//! ```ignore
//! use tessera::core::forcefield::params::HarmonicParams;
//! use tessera::core::forcefield::potentials::harmonic;
//!
//! let interaction = harmonic(0.969, &HarmonicParams { k: 30.0, r0: 1.6 }).unwrap();
//! assert!(interaction.force_divr > 0.0);
//! ```

pub mod params;
pub mod potentials;
pub mod surface;
pub mod term;
