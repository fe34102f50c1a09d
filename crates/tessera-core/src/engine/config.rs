use crate::core::forcefield::params::{ParamError, PotentialKind};
use crate::core::models::mesh::{DEFAULT_MESH_TYPE, TopologyError};
use crate::core::models::simbox::SimBox;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    InvalidParameter(#[from] ParamError),

    #[error("Invalid mesh topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("Mesh type '{name}' is not declared by the mesh (declared: {known:?})")]
    UnknownMeshType { name: String, known: Vec<String> },

    #[error("No {potential} parameters set for mesh type '{mesh_type}'")]
    MissingParameters {
        potential: &'static str,
        mesh_type: String,
    },

    #[error("Expected {expected} parameters, got {found} parameters")]
    ParameterKindMismatch {
        expected: PotentialKind,
        found: PotentialKind,
    },

    #[error("Invalid sampling range: first = {first}, last = {last}, stride = {stride}")]
    InvalidSampling { first: u64, last: u64, stride: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputFiles {
    pub particles: PathBuf,
    pub triangles: PathBuf,
    pub parameters: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub inputs: InputFiles,
    pub simbox: SimBox,
    pub mesh_types: Vec<String>,
    pub timestep: u64,
    /// Restricts evaluation to these potentials. `None` evaluates every
    /// potential present in the parameter file.
    pub potentials: Option<Vec<PotentialKind>>,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    particles_path: Option<PathBuf>,
    triangles_path: Option<PathBuf>,
    parameters_path: Option<PathBuf>,
    simbox: Option<SimBox>,
    mesh_types: Option<Vec<String>>,
    timestep: Option<u64>,
    potentials: Option<Vec<PotentialKind>>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles_path(mut self, path: PathBuf) -> Self {
        self.particles_path = Some(path);
        self
    }
    pub fn triangles_path(mut self, path: PathBuf) -> Self {
        self.triangles_path = Some(path);
        self
    }
    pub fn parameters_path(mut self, path: PathBuf) -> Self {
        self.parameters_path = Some(path);
        self
    }
    pub fn simbox(mut self, simbox: SimBox) -> Self {
        self.simbox = Some(simbox);
        self
    }
    pub fn mesh_types(mut self, types: Vec<String>) -> Self {
        self.mesh_types = Some(types);
        self
    }
    pub fn timestep(mut self, timestep: u64) -> Self {
        self.timestep = Some(timestep);
        self
    }
    pub fn potentials(mut self, kinds: Vec<PotentialKind>) -> Self {
        self.potentials = Some(kinds);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let inputs = InputFiles {
            particles: self
                .particles_path
                .ok_or(ConfigError::MissingParameter("particles_path"))?,
            triangles: self
                .triangles_path
                .ok_or(ConfigError::MissingParameter("triangles_path"))?,
            parameters: self
                .parameters_path
                .ok_or(ConfigError::MissingParameter("parameters_path"))?,
        };
        Ok(EvaluationConfig {
            inputs,
            simbox: self.simbox.ok_or(ConfigError::MissingParameter("simbox"))?,
            mesh_types: self
                .mesh_types
                .unwrap_or_else(|| vec![DEFAULT_MESH_TYPE.to_string()]),
            timestep: self.timestep.unwrap_or(0),
            potentials: self.potentials,
        })
    }
}

/// Timesteps `first, first + stride, ...` up to and including `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    first: u64,
    last: u64,
    stride: u64,
}

impl SamplingConfig {
    pub fn new(first: u64, last: u64, stride: u64) -> Result<Self, ConfigError> {
        if stride == 0 || last < first {
            return Err(ConfigError::InvalidSampling {
                first,
                last,
                stride,
            });
        }
        Ok(Self {
            first,
            last,
            stride,
        })
    }

    pub fn timesteps(&self) -> impl Iterator<Item = u64> {
        let stride = usize::try_from(self.stride).unwrap_or(usize::MAX);
        (self.first..=self.last).step_by(stride)
    }

    pub fn count(&self) -> u64 {
        (self.last - self.first) / self.stride + 1
    }
}
