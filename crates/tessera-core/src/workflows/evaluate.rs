use crate::core::forcefield::params::{ParameterFile, PotentialKind};
use crate::core::forcefield::term::ForceResult;
use crate::core::io::csv::{self, TriangleTable};
use crate::core::models::mesh::{Mesh, MeshTopology};
use crate::core::models::particles::ParticleData;
use crate::core::models::simbox::SimBox;
use crate::engine::config::{ConfigError, EvaluationConfig};
use crate::engine::error::EngineError;
use crate::engine::forces::{ForceSet, MeshForce};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ContributorEnergy {
    pub kind: PotentialKind,
    pub energy: f64,
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub timestep: u64,
    pub particle_count: usize,
    pub triangle_count: usize,
    pub bond_count: usize,
    pub contributors: Vec<ContributorEnergy>,
    pub total: ForceResult,
}

impl EvaluationReport {
    pub fn total_energy(&self) -> f64 {
        self.total.total_energy()
    }
}

#[instrument(skip_all, name = "evaluate_workflow")]
pub fn run(
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<EvaluationReport, EngineError> {
    reporter.emit(Progress::StageStart {
        name: "Loading inputs",
    });
    info!(
        particles = %config.inputs.particles.display(),
        triangles = %config.inputs.triangles.display(),
        "Loading mesh inputs."
    );
    let particles = csv::read_particles(&config.inputs.particles)?;
    let table = csv::read_triangles(&config.inputs.triangles)?;
    let parameters = ParameterFile::load(&config.inputs.parameters)?;
    reporter.emit(Progress::StageFinish);

    let mesh = build_mesh(&config.mesh_types, table, particles.len())?;
    let forces = assemble_forces(&parameters, &mesh, config.potentials.as_deref())?;

    reporter.emit(Progress::StageStart {
        name: "Evaluating forces",
    });
    let report = evaluate_system(&particles, &config.simbox, &mesh, forces, config.timestep, reporter)?;
    reporter.emit(Progress::StageFinish);

    info!(
        energy = report.total_energy(),
        contributors = report.contributors.len(),
        "Evaluation complete."
    );
    Ok(report)
}

/// Builds a mesh from a triangle table, binding it to the particle count.
pub fn build_mesh(
    types: &[String],
    table: TriangleTable,
    particle_count: usize,
) -> Result<Mesh, ConfigError> {
    let mut topology = MeshTopology::with_types(types.iter().cloned())?;
    topology.bind_particle_count(particle_count)?;
    match table.type_ids {
        Some(type_ids) => topology.set_triangles_with_types(table.triangles, type_ids)?,
        None => topology.set_triangles(table.triangles)?,
    }
    Ok(Mesh::from_topology(topology))
}

/// Creates one detached potential per requested kind, parameterized from
/// the file. With no explicit selection, every kind present in the file is
/// used.
pub fn assemble_forces(
    parameters: &ParameterFile,
    mesh: &Mesh,
    only: Option<&[PotentialKind]>,
) -> Result<Vec<MeshForce>, ConfigError> {
    let kinds = match only {
        Some(kinds) => kinds.to_vec(),
        None => parameters.kinds(),
    };
    if kinds.is_empty() {
        warn!("No mesh potentials selected; forces will be zero.");
    }

    let mut forces = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let mut force = MeshForce::new(kind, mesh.clone());
        for (type_name, record) in parameters.records(kind) {
            force.set_params(type_name, record)?;
        }
        forces.push(force);
    }
    Ok(forces)
}

/// Attaches `forces` to a fresh [`ForceSet`], evaluates them once, and
/// detaches them again.
pub fn evaluate_system(
    particles: &ParticleData,
    simbox: &SimBox,
    mesh: &Mesh,
    forces: Vec<MeshForce>,
    timestep: u64,
    reporter: &ProgressReporter,
) -> Result<EvaluationReport, EngineError> {
    let mut set = ForceSet::new(particles.len());
    for force in forces {
        set.add(force)?;
    }

    let total = set.compute_all(timestep, particles, simbox, reporter)?;
    let contributors = set
        .iter()
        .map(|(_, force)| ContributorEnergy {
            kind: force.kind(),
            energy: force.result().map_or(0.0, ForceResult::total_energy),
        })
        .collect();

    let (triangle_count, bond_count) = {
        let topology = mesh.read();
        (topology.size(), topology.enumerate_bonds().len())
    };
    set.into_detached();

    Ok(EvaluationReport {
        timestep,
        particle_count: particles.len(),
        triangle_count,
        bond_count,
        contributors,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::HarmonicParams;
    use crate::core::models::mesh::TopologyError;
    use crate::engine::config::EvaluationConfigBuilder;
    use std::fs;
    use tempfile::tempdir;

    const PARTICLES: &str = "x,y,z
0.4845,0.0,-0.34259950087240906
-0.4845,0.0,-0.34259950087240906
0.0,0.4845,0.34259950087240906
0.0,-0.4845,0.34259950087240906
";

    const TRIANGLES: &str = "a,b,c
0,1,2
0,2,3
0,1,3
1,2,3
";

    #[test]
    fn build_mesh_rejects_triangles_beyond_particle_count() {
        let table = TriangleTable {
            triangles: vec![[0, 1, 5]],
            type_ids: None,
        };
        let err = build_mesh(&["mesh".to_string()], table, 4).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Topology(TopologyError::VertexOutOfRange { vertex: 5, .. })
        ));
    }

    #[test]
    fn assemble_forces_uses_every_kind_in_file_by_default() {
        let mut parameters = ParameterFile::default();
        parameters
            .harmonic
            .insert("mesh".into(), HarmonicParams { k: 1.0, r0: 1.0 });
        let forces = assemble_forces(&parameters, &Mesh::new(), None).unwrap();
        assert_eq!(forces.len(), 1);
        assert_eq!(forces[0].kind(), PotentialKind::Harmonic);
    }

    #[test]
    fn assemble_forces_rejects_records_for_undeclared_types() {
        let mut parameters = ParameterFile::default();
        parameters
            .harmonic
            .insert("vesicle".into(), HarmonicParams { k: 1.0, r0: 1.0 });
        let err = assemble_forces(&parameters, &Mesh::new(), None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMeshType { .. }));
    }

    #[test]
    fn selecting_a_kind_without_records_fails_at_attach() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("particles.csv"), PARTICLES).unwrap();
        fs::write(dir.path().join("triangles.csv"), TRIANGLES).unwrap();
        fs::write(
            dir.path().join("params.toml"),
            "[harmonic.mesh]\nk = 30.0\nr0 = 1.6\n",
        )
        .unwrap();
        let config = EvaluationConfigBuilder::new()
            .particles_path(dir.path().join("particles.csv"))
            .triangles_path(dir.path().join("triangles.csv"))
            .parameters_path(dir.path().join("params.toml"))
            .simbox(SimBox::cube(5.0).unwrap())
            .potentials(vec![PotentialKind::Tether])
            .build()
            .unwrap();

        let err = run(&config, &ProgressReporter::silent()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config {
                source: ConfigError::MissingParameters {
                    potential: "tether",
                    ..
                }
            }
        ));
    }

    #[test]
    fn run_evaluates_tetrahedron_from_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("particles.csv"), PARTICLES).unwrap();
        fs::write(dir.path().join("triangles.csv"), TRIANGLES).unwrap();
        fs::write(
            dir.path().join("params.toml"),
            "[harmonic.mesh]\nk = 30.0\nr0 = 1.6\n\n[area-conservation.mesh]\nk = 1.0\nA0 = 10.392304845413264\n",
        )
        .unwrap();
        let config = EvaluationConfigBuilder::new()
            .particles_path(dir.path().join("particles.csv"))
            .triangles_path(dir.path().join("triangles.csv"))
            .parameters_path(dir.path().join("params.toml"))
            .simbox(SimBox::cube(5.0).unwrap())
            .timestep(42)
            .build()
            .unwrap();

        let report = run(&config, &ProgressReporter::silent()).unwrap();
        assert_eq!(report.timestep, 42);
        assert_eq!(report.triangle_count, 4);
        assert_eq!(report.bond_count, 6);
        assert_eq!(report.contributors.len(), 2);
        let harmonic = report
            .contributors
            .iter()
            .find(|c| c.kind == PotentialKind::Harmonic)
            .unwrap();
        assert!((harmonic.energy - 35.83449).abs() < 1e-4);
        assert!((report.total_energy() - (35.83449 + 3.697079)).abs() < 1e-4);
    }
}
