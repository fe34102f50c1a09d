//! # Core Models Module
//!
//! Plain data describing the simulated system: particle positions, the
//! periodic box, and the triangulated surface connecting the particles.
//!
//! ## Key Components
//!
//! - [`particles`] - Positions indexed by particle tag
//! - [`simbox`] - Triclinic periodic box with minimum-image wrapping
//! - [`mesh`] - Triangle list, derived bonds, and the shared [`mesh::Mesh`] handle
//! - [`ids`] - Slot-map keys for registered force contributors
//!
//! ## Usage
//!
//! ```ignore
//! use tessera::core::models::mesh::Mesh;
//! use tessera::core::models::simbox::SimBox;
//!
//! let mesh = Mesh::new();
//! mesh.set_triangles(vec![[0, 1, 2], [0, 2, 3], [0, 1, 3], [1, 2, 3]])?;
//! assert_eq!(mesh.read().enumerate_bonds().len(), 6);
//!
//! let simbox = SimBox::cube(5.0)?;
//! ```

pub mod ids;
pub mod mesh;
pub mod particles;
pub mod simbox;
