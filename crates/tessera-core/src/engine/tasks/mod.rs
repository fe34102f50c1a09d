//! Evaluators that turn a mesh, its positions, and per-type parameters into
//! per-particle forces, energies, and virials.
//!
//! Per-bond and per-triangle work runs in parallel when the `parallel`
//! feature is enabled; contributions are then merged serially so results do
//! not depend on thread scheduling.

pub mod area_conservation;
pub mod bond_forces;
