//! # Core Module
//!
//! Stateless building blocks for bonded membrane models: the system's data,
//! the force-law numerics, time-dependent box variants, and file I/O.
//!
//! ## Architecture
//!
//! - **System Representation** ([`models`]) - Particles, periodic box, and mesh topology
//! - **Force Laws** ([`forcefield`]) - Parameters, radial laws, and area geometry
//! - **Time Dependence** ([`variant`]) - Scalar and box variants indexed by timestep
//! - **File I/O** ([`io`]) - CSV tables in, per-particle force reports out
//!
//! ## Key Capabilities
//!
//! - **Triclinic periodic boxes** with minimum-image separation in 2D and 3D
//! - **Derived bond lists** kept in step with the triangle list
//! - **Analytic forces** for harmonic, FENE, tether, and area-conservation terms
//! - **Box ramps** linear in box parameters or in inverse volume

pub mod forcefield;
pub mod io;
pub mod models;
pub mod variant;
