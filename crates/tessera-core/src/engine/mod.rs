//! # Engine Module
//!
//! The stateful layer: mesh potentials with their attach/detach lifecycle,
//! the evaluators that run them, and the set of contributors a simulation
//! sums every step.
//!
//! ## Overview
//!
//! A [`potential::MeshPotential`] couples one force law to one shared mesh
//! and a table of per-type parameters. Adding it to a [`forces::ForceSet`]
//! attaches it: the mesh and parameters are validated against the particle
//! count, and the mesh stays locked until the potential is removed.
//!
//! ## Architecture
//!
//! - **Lifecycle** ([`potential`]) - Parameter tables, attachment state, and cached results
//! - **Force Laws** ([`laws`]) - Harmonic, FENE, tether, and area-conservation markers
//! - **Contributors** ([`forces`]) - [`forces::MeshForce`] and the slot-map backed [`forces::ForceSet`]
//! - **Configuration** ([`config`]) - Evaluation and sampling settings with a builder
//! - **Progress Monitoring** ([`progress`]) - Events forwarded to an optional sink
//! - **Error Handling** ([`error`]) - Attachment, evaluation, and aggregate engine errors
//!
//! ## Key Capabilities
//!
//! - **Parallel evaluation** of bonds and triangles behind the `parallel` feature
//! - **Deterministic merging** of per-bond contributions in bond order
//! - **Stale result detection** through mesh revisions
//! - **Diagnostic errors** naming the potential, bond, particles, and parameters on divergence

pub mod config;
pub mod error;
pub mod forces;
pub mod laws;
pub mod potential;
pub mod progress;
pub(crate) mod tasks;
