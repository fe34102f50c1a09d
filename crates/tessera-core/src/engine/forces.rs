use super::config::ConfigError;
use super::error::{AttachmentError, EngineError};
use super::laws::{AreaConservationMesh, FeneMeshBond, HarmonicMeshBond, TetherMeshBond};
use super::progress::{Progress, ProgressReporter};
use crate::core::forcefield::params::{AnyParams, PotentialKind};
use crate::core::forcefield::term::ForceResult;
use crate::core::models::ids::ForceId;
use crate::core::models::mesh::Mesh;
use crate::core::models::particles::ParticleData;
use crate::core::models::simbox::SimBox;
use slotmap::SlotMap;
use tracing::{info, instrument};

/// One of the mesh potentials, behind a single type.
#[derive(Debug)]
pub enum MeshForce {
    Harmonic(HarmonicMeshBond),
    Fene(FeneMeshBond),
    Tether(TetherMeshBond),
    AreaConservation(AreaConservationMesh),
}

macro_rules! each_potential {
    ($force:expr, $potential:ident => $body:expr) => {
        match $force {
            MeshForce::Harmonic($potential) => $body,
            MeshForce::Fene($potential) => $body,
            MeshForce::Tether($potential) => $body,
            MeshForce::AreaConservation($potential) => $body,
        }
    };
}

impl MeshForce {
    /// A detached potential of the given kind with no parameters.
    pub fn new(kind: PotentialKind, mesh: Mesh) -> Self {
        match kind {
            PotentialKind::Harmonic => Self::Harmonic(HarmonicMeshBond::new(mesh)),
            PotentialKind::Fene => Self::Fene(FeneMeshBond::new(mesh)),
            PotentialKind::Tether => Self::Tether(TetherMeshBond::new(mesh)),
            PotentialKind::AreaConservation => {
                Self::AreaConservation(AreaConservationMesh::new(mesh))
            }
        }
    }

    pub fn kind(&self) -> PotentialKind {
        each_potential!(self, p => p.kind())
    }

    pub fn mesh(&self) -> &Mesh {
        each_potential!(self, p => p.mesh())
    }

    pub fn set_mesh(&mut self, mesh: Mesh) -> Result<(), AttachmentError> {
        each_potential!(self, p => p.set_mesh(mesh))
    }

    pub fn is_attached(&self) -> bool {
        each_potential!(self, p => p.is_attached())
    }

    /// Sets the record for one mesh type. The record must belong to this
    /// potential.
    pub fn set_params(&mut self, type_name: &str, params: AnyParams) -> Result<(), ConfigError> {
        let mismatch = ConfigError::ParameterKindMismatch {
            expected: self.kind(),
            found: params.kind(),
        };
        match (self, params) {
            (Self::Harmonic(p), AnyParams::Harmonic(r)) => p.set_params(type_name, r),
            (Self::Fene(p), AnyParams::Fene(r)) => p.set_params(type_name, r),
            (Self::Tether(p), AnyParams::Tether(r)) => p.set_params(type_name, r),
            (Self::AreaConservation(p), AnyParams::AreaConservation(r)) => {
                p.set_params(type_name, r)
            }
            _ => Err(mismatch),
        }
    }

    pub fn params(&self, type_name: &str) -> Result<AnyParams, ConfigError> {
        each_potential!(self, p => p.params(type_name).map(|r| (*r).into()))
    }

    pub(crate) fn attach(&mut self, particle_count: usize) -> Result<(), EngineError> {
        each_potential!(self, p => p.attach(particle_count))
    }

    pub(crate) fn detach(&mut self) {
        each_potential!(self, p => p.detach())
    }

    pub fn compute(
        &mut self,
        timestep: u64,
        particles: &ParticleData,
        simbox: &SimBox,
    ) -> Result<&ForceResult, EngineError> {
        each_potential!(self, p => p.compute(timestep, particles, simbox))
    }

    pub fn result(&self) -> Option<&ForceResult> {
        each_potential!(self, p => p.result())
    }
}

impl From<HarmonicMeshBond> for MeshForce {
    fn from(p: HarmonicMeshBond) -> Self {
        Self::Harmonic(p)
    }
}

impl From<FeneMeshBond> for MeshForce {
    fn from(p: FeneMeshBond) -> Self {
        Self::Fene(p)
    }
}

impl From<TetherMeshBond> for MeshForce {
    fn from(p: TetherMeshBond) -> Self {
        Self::Tether(p)
    }
}

impl From<AreaConservationMesh> for MeshForce {
    fn from(p: AreaConservationMesh) -> Self {
        Self::AreaConservation(p)
    }
}

/// The force contributors of one simulation.
///
/// Adding a contributor attaches it and removing it detaches it, so every
/// potential held by a `ForceSet` is attached and its mesh locked.
/// [`into_detached`](Self::into_detached) hands every contributor back
/// detached when the simulation is torn down.
#[derive(Debug)]
pub struct ForceSet {
    particle_count: usize,
    forces: SlotMap<ForceId, MeshForce>,
}

impl ForceSet {
    pub fn new(particle_count: usize) -> Self {
        Self {
            particle_count,
            forces: SlotMap::with_key(),
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Attaches and stores a contributor. On failure the contributor is
    /// handed back, still detached, together with the reason.
    pub fn try_add(
        &mut self,
        force: impl Into<MeshForce>,
    ) -> Result<ForceId, (MeshForce, EngineError)> {
        let mut force = force.into();
        if let Err(e) = force.attach(self.particle_count) {
            return Err((force, e));
        }
        let kind = force.kind();
        let id = self.forces.insert(force);
        info!(potential = kind.as_str(), "Force contributor added.");
        Ok(id)
    }

    pub fn add(&mut self, force: impl Into<MeshForce>) -> Result<ForceId, EngineError> {
        self.try_add(force).map_err(|(_, e)| e)
    }

    /// Removes and detaches a contributor.
    pub fn remove(&mut self, id: ForceId) -> Option<MeshForce> {
        let mut force = self.forces.remove(id)?;
        force.detach();
        Some(force)
    }

    pub fn get(&self, id: ForceId) -> Option<&MeshForce> {
        self.forces.get(id)
    }

    pub fn get_mut(&mut self, id: ForceId) -> Option<&mut MeshForce> {
        self.forces.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ForceId, &MeshForce)> {
        self.forces.iter()
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Detaches every contributor and returns them.
    pub fn into_detached(mut self) -> Vec<MeshForce> {
        self.forces
            .drain()
            .map(|(_, mut force)| {
                force.detach();
                force
            })
            .collect()
    }

    /// Evaluates every contributor and sums their per-particle results.
    #[instrument(skip_all, name = "force_set_compute", fields(timestep = timestep))]
    pub fn compute_all(
        &mut self,
        timestep: u64,
        particles: &ParticleData,
        simbox: &SimBox,
        reporter: &ProgressReporter,
    ) -> Result<ForceResult, EngineError> {
        let mut total = ForceResult::zeros(particles.len());
        reporter.emit(Progress::StepsStart {
            total: self.forces.len() as u64,
        });
        for (_, force) in self.forces.iter_mut() {
            total += force.compute(timestep, particles, simbox)?;
            reporter.emit(Progress::StepDone);
        }
        reporter.emit(Progress::StepsFinish);
        Ok(total)
    }
}
