//! # Variant Module
//!
//! Time-dependent quantities indexed by integer timestep. Scalar variants
//! drive box interpolation; box variants produce the six box parameters for
//! any timestep.
//!
//! - [`scalar`] - The [`Variant`](scalar::Variant) trait with constant and linear ramp implementations
//! - [`boxes`] - [`BoxVariant`](boxes::BoxVariant): constant, interpolated, and inverse-volume ramps

use crate::core::models::simbox::BoxError;
use thiserror::Error;

pub mod boxes;
pub mod scalar;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum VariantError {
    #[error("Ramp endpoints must be finite, got {a} and {b}")]
    NonFiniteEndpoint { a: f64, b: f64 },
    #[error("Target volume must be finite and positive, got {0}")]
    InvalidVolume(f64),
    #[error(transparent)]
    Box(#[from] BoxError),
}
