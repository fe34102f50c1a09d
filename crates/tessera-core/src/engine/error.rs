use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::params::{AnyParams, ParamLoadError};
use crate::core::io::IoError;
use crate::core::models::simbox::BoxError;
use crate::core::variant::VariantError;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("mesh cannot be swapped while potential is active")]
    MeshLocked,

    #[error("{0} potential is already attached")]
    AlreadyAttached(&'static str),

    #[error("{0} potential is not attached")]
    NotAttached(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(
        "{potential} bond {bond} between particles {tags:?} diverged at separation {distance} with parameters {params}"
    )]
    Divergence {
        potential: &'static str,
        bond: usize,
        tags: [usize; 2],
        distance: f64,
        params: AnyParams,
    },

    #[error("{potential} triangle {triangle} with particles {tags:?} has zero area")]
    DegenerateGeometry {
        potential: &'static str,
        triangle: usize,
        tags: [usize; 3],
        params: AnyParams,
    },

    #[error("Expected positions for {expected} particles, got {actual}")]
    ParticleCountMismatch { expected: usize, actual: usize },

    #[error("Mesh references particle {tag}, but only {particle_count} positions were supplied")]
    ParticleOutOfRange { tag: usize, particle_count: usize },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Attachment error: {source}")]
    Attachment {
        #[from]
        source: AttachmentError,
    },

    #[error("Evaluation failed: {source}")]
    Evaluation {
        #[from]
        source: EvaluationError,
    },

    #[error("Parameter file error: {source}")]
    Parameters {
        #[from]
        source: ParamLoadError,
    },

    #[error("Input error: {source}")]
    Input {
        #[from]
        source: IoError,
    },

    #[error("Box error: {source}")]
    Box {
        #[from]
        source: BoxError,
    },

    #[error("Box variant error: {source}")]
    Variant {
        #[from]
        source: VariantError,
    },
}
