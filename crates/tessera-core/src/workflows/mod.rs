//! # Workflows Module
//!
//! End-to-end procedures built on [`crate::engine`] and [`crate::core`].
//!
//! ## Architecture
//!
//! - **Evaluation Workflow** ([`evaluate`]) - Loads particles, triangles, and parameters,
//!   attaches every requested mesh potential, and evaluates forces and energies once.
//! - **Box Trajectory Workflow** ([`box_trajectory`]) - Samples a box variant over a
//!   range of timesteps.
//!
//! ## Key Capabilities
//!
//! - **File-driven setup** from CSV tables and a TOML parameter file
//! - **Per-contributor energies** alongside summed per-particle results
//! - **Progress reporting** through [`crate::engine::progress::ProgressReporter`]

pub mod box_trajectory;
pub mod evaluate;
