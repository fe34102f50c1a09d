use super::config::ConfigError;
use super::error::{AttachmentError, EngineError, EvaluationError};
use crate::core::forcefield::params::{ParamRecord, PotentialKind};
use crate::core::forcefield::term::{ForceResult, Virial};
use crate::core::models::mesh::{Mesh, MeshTopology};
use crate::core::models::particles::ParticleData;
use crate::core::models::simbox::SimBox;
use nalgebra::Vector3;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument, trace};

/// Everything a force law needs for one evaluation.
///
/// `params[t]` holds the record for mesh type id `t`.
pub struct EvaluationInput<'a, P> {
    pub mesh: &'a MeshTopology,
    pub params: &'a [P],
    pub particles: &'a ParticleData,
    pub simbox: &'a SimBox,
}

impl<P> EvaluationInput<'_, P> {
    pub(crate) fn position(&self, tag: usize) -> Result<Vector3<f64>, EvaluationError> {
        self.particles
            .position(tag)
            .map(|p| p.coords)
            .ok_or(EvaluationError::ParticleOutOfRange {
                tag,
                particle_count: self.particles.len(),
            })
    }
}

/// A force law evaluated over a whole mesh.
///
/// Implementors are zero-sized markers; [`MeshPotential`] supplies the
/// state and attachment rules shared by all of them.
pub trait MeshForceLaw: fmt::Debug + Send + Sync + 'static {
    type Params: ParamRecord;

    fn evaluate(input: &EvaluationInput<'_, Self::Params>)
    -> Result<ForceResult, EvaluationError>;
}

/// Parameter records keyed by mesh type name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamTable<P> {
    entries: BTreeMap<String, P>,
}

impl<P> Default for ParamTable<P> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<P: ParamRecord> ParamTable<P> {
    pub fn get(&self, type_name: &str) -> Option<&P> {
        self.entries.get(type_name)
    }

    /// Validates and stores a record, returning the one it replaced.
    pub fn insert(&mut self, type_name: &str, record: P) -> Result<Option<P>, ConfigError> {
        record.validate()?;
        Ok(self.entries.insert(type_name.to_string(), record))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &P)> {
        self.entries.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Orders the records by type id. Fails on the first type with no record.
    pub fn resolve(&self, types: &[String]) -> Result<Vec<P>, ConfigError> {
        types
            .iter()
            .map(|name| {
                self.entries
                    .get(name)
                    .copied()
                    .ok_or_else(|| ConfigError::MissingParameters {
                        potential: P::KIND.as_str(),
                        mesh_type: name.clone(),
                    })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Detached,
    Attached { particle_count: usize },
}

#[derive(Debug, Clone)]
struct CachedEvaluation {
    timestep: u64,
    revision: u64,
    result: ForceResult,
}

/// A bonded potential bound to one mesh.
///
/// # Lifecycle
///
/// A new potential is detached. While detached, its mesh may be swapped and
/// its parameters edited freely. [`attach`](Self::attach) validates the mesh
/// against the particle count and requires a record for every mesh type;
/// after that the mesh is locked until [`detach`](Self::detach), while
/// parameters stay editable.
///
/// # Results
///
/// [`compute`](Self::compute) stores the per-particle forces, energies, and
/// virials of the latest evaluation. The accessors return `None` when the
/// potential is detached, has not been computed yet, or the mesh was edited
/// after the last evaluation.
#[derive(Debug)]
pub struct MeshPotential<L: MeshForceLaw> {
    mesh: Mesh,
    params: ParamTable<L::Params>,
    state: Attachment,
    last: Option<CachedEvaluation>,
    law: PhantomData<L>,
}

impl<L: MeshForceLaw> MeshPotential<L> {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            params: ParamTable::default(),
            state: Attachment::Detached,
            last: None,
            law: PhantomData,
        }
    }

    pub fn kind(&self) -> PotentialKind {
        <L::Params as ParamRecord>::KIND
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Replaces the mesh. Fails with [`AttachmentError::MeshLocked`] while
    /// attached.
    pub fn set_mesh(&mut self, mesh: Mesh) -> Result<(), AttachmentError> {
        if self.is_attached() {
            return Err(AttachmentError::MeshLocked);
        }
        self.mesh = mesh;
        self.last = None;
        Ok(())
    }

    pub fn state(&self) -> Attachment {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, Attachment::Attached { .. })
    }

    pub fn params(&self, type_name: &str) -> Result<&L::Params, ConfigError> {
        self.check_type(type_name)?;
        self.params
            .get(type_name)
            .ok_or_else(|| ConfigError::MissingParameters {
                potential: self.name(),
                mesh_type: type_name.to_string(),
            })
    }

    pub fn set_params(&mut self, type_name: &str, record: L::Params) -> Result<(), ConfigError> {
        self.check_type(type_name)?;
        self.params.insert(type_name, record)?;
        Ok(())
    }

    pub fn param_table(&self) -> &ParamTable<L::Params> {
        &self.params
    }

    fn check_type(&self, type_name: &str) -> Result<(), ConfigError> {
        let mesh = self.mesh.read();
        match mesh.type_id(type_name) {
            Some(_) => Ok(()),
            None => Err(ConfigError::UnknownMeshType {
                name: type_name.to_string(),
                known: mesh.types().to_vec(),
            }),
        }
    }

    pub fn attach(&mut self, particle_count: usize) -> Result<(), EngineError> {
        if self.is_attached() {
            return Err(AttachmentError::AlreadyAttached(self.name()).into());
        }
        {
            let mesh = self.mesh.read();
            mesh.validate_against(particle_count)
                .map_err(ConfigError::from)?;
            self.params.resolve(mesh.types())?;
        }
        self.state = Attachment::Attached { particle_count };
        self.last = None;
        debug!(potential = self.name(), particle_count, "Potential attached.");
        Ok(())
    }

    /// Releases the mesh lock and drops stored results. Detaching a
    /// detached potential does nothing.
    pub fn detach(&mut self) {
        if self.is_attached() {
            debug!(potential = self.name(), "Potential detached.");
        }
        self.state = Attachment::Detached;
        self.last = None;
    }

    #[instrument(skip_all, name = "mesh_potential_compute", fields(potential = self.name(), timestep = timestep))]
    pub fn compute(
        &mut self,
        timestep: u64,
        particles: &ParticleData,
        simbox: &SimBox,
    ) -> Result<&ForceResult, EngineError> {
        let Attachment::Attached { particle_count } = self.state else {
            return Err(AttachmentError::NotAttached(self.name()).into());
        };
        if particles.len() != particle_count {
            return Err(EvaluationError::ParticleCountMismatch {
                expected: particle_count,
                actual: particles.len(),
            }
            .into());
        }

        let (result, revision) = {
            let mesh = self.mesh.read();
            mesh.validate_against(particle_count)
                .map_err(ConfigError::from)?;
            let params = self.params.resolve(mesh.types())?;
            let result = L::evaluate(&EvaluationInput {
                mesh: &mesh,
                params: &params,
                particles,
                simbox,
            })?;
            (result, mesh.revision())
        };

        trace!(energy = result.total_energy(), "Mesh potential evaluated.");
        let cached = self.last.insert(CachedEvaluation {
            timestep,
            revision,
            result,
        });
        Ok(&cached.result)
    }

    fn current(&self) -> Option<&CachedEvaluation> {
        if !self.is_attached() {
            return None;
        }
        let cached = self.last.as_ref()?;
        (cached.revision == self.mesh.revision()).then_some(cached)
    }

    pub fn result(&self) -> Option<&ForceResult> {
        self.current().map(|c| &c.result)
    }

    pub fn forces(&self) -> Option<&[Vector3<f64>]> {
        self.result().map(ForceResult::forces)
    }

    pub fn energies(&self) -> Option<&[f64]> {
        self.result().map(ForceResult::energies)
    }

    pub fn virials(&self) -> Option<&[Virial]> {
        self.result().map(ForceResult::virials)
    }

    pub fn total_energy(&self) -> Option<f64> {
        self.result().map(ForceResult::total_energy)
    }

    pub fn last_timestep(&self) -> Option<u64> {
        self.current().map(|c| c.timestep)
    }
}
