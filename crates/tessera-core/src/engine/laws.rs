use super::error::EvaluationError;
use super::potential::{EvaluationInput, MeshForceLaw, MeshPotential};
use super::tasks::{area_conservation, bond_forces};
use crate::core::forcefield::params::{
    AreaConservationParams, FeneParams, HarmonicParams, TetherParams,
};
use crate::core::forcefield::potentials;
use crate::core::forcefield::term::ForceResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct Harmonic;

impl MeshForceLaw for Harmonic {
    type Params = HarmonicParams;

    fn evaluate(input: &EvaluationInput<'_, HarmonicParams>) -> Result<ForceResult, EvaluationError> {
        bond_forces::run(input, potentials::harmonic)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Fene;

impl MeshForceLaw for Fene {
    type Params = FeneParams;

    fn evaluate(input: &EvaluationInput<'_, FeneParams>) -> Result<ForceResult, EvaluationError> {
        bond_forces::run(input, potentials::fene)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tether;

impl MeshForceLaw for Tether {
    type Params = TetherParams;

    fn evaluate(input: &EvaluationInput<'_, TetherParams>) -> Result<ForceResult, EvaluationError> {
        bond_forces::run(input, potentials::tether)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AreaConservation;

impl MeshForceLaw for AreaConservation {
    type Params = AreaConservationParams;

    fn evaluate(
        input: &EvaluationInput<'_, AreaConservationParams>,
    ) -> Result<ForceResult, EvaluationError> {
        area_conservation::run(input)
    }
}

/// Harmonic springs on every mesh edge.
pub type HarmonicMeshBond = MeshPotential<Harmonic>;
/// FENE springs with a WCA core on every mesh edge.
pub type FeneMeshBond = MeshPotential<Fene>;
/// Tethers on every mesh edge.
pub type TetherMeshBond = MeshPotential<Tether>;
/// Total-area restraint per mesh type.
pub type AreaConservationMesh = MeshPotential<AreaConservation>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::mesh::{Mesh, MeshTopology};
    use crate::core::models::particles::ParticleData;
    use crate::core::models::simbox::SimBox;
    use crate::engine::error::EngineError;
    use nalgebra::Vector3;

    const EDGE: f64 = 0.969;

    /// Regular tetrahedron with edge length 0.969 centred at the origin.
    fn tetrahedron() -> (Mesh, ParticleData, SimBox) {
        let h = 0.5 * EDGE;
        let z = h / 2f64.sqrt();
        let particles = ParticleData::from_arrays(&[
            [h, 0.0, -z],
            [-h, 0.0, -z],
            [0.0, h, z],
            [0.0, -h, z],
        ]);
        let mesh = Mesh::new();
        mesh.set_triangles(vec![[0, 1, 2], [0, 2, 3], [0, 1, 3], [1, 2, 3]])
            .unwrap();
        (mesh, particles, SimBox::cube(5.0).unwrap())
    }

    fn evaluate<L: MeshForceLaw>(params: L::Params) -> ForceResult {
        let (mesh, particles, simbox) = tetrahedron();
        let mut potential = MeshPotential::<L>::new(mesh);
        potential.set_params("mesh", params).unwrap();
        potential.attach(particles.len()).unwrap();
        potential.compute(0, &particles, &simbox).unwrap().clone()
    }

    /// Forces on the tetrahedron follow from the force on particle 0 by
    /// symmetry.
    fn assert_tetrahedral_forces(result: &ForceResult, fx: f64, fz: f64, tolerance: f64) {
        let expected = [
            Vector3::new(fx, 0.0, fz),
            Vector3::new(-fx, 0.0, fz),
            Vector3::new(0.0, fx, -fz),
            Vector3::new(0.0, -fx, -fz),
        ];
        for (tag, (got, want)) in result.forces().iter().zip(&expected).enumerate() {
            assert!(
                (got - want).norm() < tolerance,
                "particle {}: got {:?}, expected {:?}",
                tag,
                got,
                want
            );
        }
        assert!(result.net_force().norm() < 1e-9);
    }

    #[test]
    fn harmonic_tetrahedron_matches_reference_energies_and_forces() {
        let cases = [
            (30.0, 1.6, 35.83449, 37.86, -26.771063),
            (25.0, 1.7, 40.077075, 36.55, -25.844753),
            (20.0, 1.8, 41.43366, 33.24, -23.504229),
        ];
        for (k, r0, energy, fx, fz) in cases {
            let result = evaluate::<Harmonic>(HarmonicParams { k, r0 });
            assert!((result.total_energy() - energy).abs() < 1e-4);
            assert_tetrahedral_forces(&result, fx, fz, 1e-4);
        }
    }

    #[test]
    fn fene_tetrahedron_matches_reference_energies_and_forces() {
        let cases = [
            ((30.0, 1.6, 0.9, 1.1), 163.374213, 221.113071, -156.350552),
            ((25.0, 1.7, 1.0, 1.0), 97.189301, 12.959825, -9.16398),
            ((20.0, 1.8, 1.1, 0.9), 67.058202, -44.644347, 31.568321),
        ];
        for ((k, r0, epsilon, sigma), energy, fx, fz) in cases {
            let result = evaluate::<Fene>(FeneParams {
                k,
                r0,
                epsilon,
                sigma,
            });
            assert!((result.total_energy() - energy).abs() < 1e-4);
            assert_tetrahedral_forces(&result, fx, fz, 1e-4);
        }
    }

    #[test]
    fn tether_tetrahedron_matches_reference_energies_and_forces() {
        let cases = [
            ((5.0, 0.7, 0.9, 1.1, 1.3), 0.0, 0.0, 0.0),
            ((6.0, 0.8, 1.05, 1.1, 1.3), 0.0009263082, 0.048888, -0.034569),
            ((7.0, 0.9, 1.1, 1.3, 1.5), 0.294561, 7.144518, -5.051937),
        ];
        for ((k_b, l_min, l_c1, l_c0, l_max), energy, fx, fz) in cases {
            let result = evaluate::<Tether>(TetherParams {
                k_b,
                l_min,
                l_c1,
                l_c0,
                l_max,
            });
            assert!((result.total_energy() - energy).abs() < 1e-6);
            assert_tetrahedral_forces(&result, fx, fz, 1e-5);
        }
    }

    #[test]
    fn area_conservation_tetrahedron_matches_reference_energies_and_forces() {
        let s3 = 3f64.sqrt();
        let cases = [
            (1.0, 6.0 * s3, 3.697079157203422, 0.9438034899764297, -0.6673698478698632),
            (20.0, 5.0 * s3, 57.13009463966952, 18.175664472676335, -12.85213560120085),
            (100.0, 7.0 * s3, 454.492529058465, 96.88179659354388, -68.50577534483064),
        ];
        for (k, a0, energy, fx, fz) in cases {
            let result = evaluate::<AreaConservation>(AreaConservationParams { k, a0 });
            assert!((result.total_energy() - energy).abs() < 1e-9 * energy);
            assert_tetrahedral_forces(&result, fx, fz, 1e-9);
        }
    }

    #[test]
    fn area_conservation_is_zero_at_target_area() {
        let area = 4.0 * 3f64.sqrt() / 4.0 * EDGE * EDGE;
        let result = evaluate::<AreaConservation>(AreaConservationParams { k: 10.0, a0: area });
        assert!(result.total_energy().abs() < 1e-20);
        assert!(result.net_force().norm() < 1e-12);
        assert!(result.forces().iter().all(|f| f.norm() < 1e-9));
    }

    #[test]
    fn area_conservation_ignores_triangle_winding() {
        let (_, particles, simbox) = tetrahedron();
        let params = AreaConservationParams { k: 20.0, a0: 5.0 };
        let mut energies = Vec::new();
        for triangles in [
            vec![[0, 1, 2], [0, 2, 3], [0, 1, 3], [1, 2, 3]],
            vec![[2, 1, 0], [3, 2, 0], [0, 3, 1], [1, 3, 2]],
        ] {
            let mesh = Mesh::new();
            mesh.set_triangles(triangles).unwrap();
            let mut potential = AreaConservationMesh::new(mesh);
            potential.set_params("mesh", params).unwrap();
            potential.attach(4).unwrap();
            let result = potential.compute(0, &particles, &simbox).unwrap();
            energies.push((result.total_energy(), result.forces()[0]));
        }
        assert!((energies[0].0 - energies[1].0).abs() < 1e-12);
        assert!((energies[0].1 - energies[1].1).norm() < 1e-12);
    }

    #[test]
    fn area_conservation_sums_area_per_mesh_type() {
        let (_, particles, simbox) = tetrahedron();
        let mut topology = MeshTopology::with_types(["upper", "lower"]).unwrap();
        topology
            .set_triangles_with_types(
                vec![[0, 1, 2], [0, 2, 3], [0, 1, 3], [1, 2, 3]],
                vec![0, 0, 1, 1],
            )
            .unwrap();
        let face = 3f64.sqrt() / 4.0 * EDGE * EDGE;

        let mut potential = AreaConservationMesh::new(Mesh::from_topology(topology));
        potential
            .set_params("upper", AreaConservationParams { k: 1.0, a0: 2.0 * face })
            .unwrap();
        potential
            .set_params("lower", AreaConservationParams { k: 4.0, a0: face })
            .unwrap();
        potential.attach(4).unwrap();
        let result = potential.compute(0, &particles, &simbox).unwrap();

        // Only the lower pair is off target: E = ½·4·face²/face.
        assert!((result.total_energy() - 2.0 * face).abs() < 1e-9);
    }

    #[test]
    fn bonds_across_periodic_boundary_use_minimum_image() {
        let (mesh, particles, _) = tetrahedron();
        let simbox = SimBox::cube(5.0).unwrap();
        let mut shifted = particles.clone();
        shifted.positions_mut()[0] += Vector3::new(5.0, 5.0, 5.0);

        let mut potential = HarmonicMeshBond::new(mesh);
        potential
            .set_params("mesh", HarmonicParams { k: 30.0, r0: 1.6 })
            .unwrap();
        potential.attach(4).unwrap();
        let energy = potential.compute(0, &shifted, &simbox).unwrap().total_energy();
        assert!((energy - 35.83449).abs() < 1e-4);
    }

    #[test]
    fn overstretched_fene_bond_reports_divergence_with_context() {
        let (mesh, particles, simbox) = tetrahedron();
        let mut potential = FeneMeshBond::new(mesh);
        let params = FeneParams {
            k: 30.0,
            r0: 0.9,
            epsilon: 1.0,
            sigma: 1.0,
        };
        potential.set_params("mesh", params).unwrap();
        potential.attach(4).unwrap();

        match potential.compute(0, &particles, &simbox) {
            Err(EngineError::Evaluation {
                source:
                    EvaluationError::Divergence {
                        potential,
                        bond,
                        tags,
                        distance,
                        ..
                    },
            }) => {
                assert_eq!(potential, "fene");
                assert_eq!(bond, 0);
                assert_eq!(tags, [0, 1]);
                assert!((distance - EDGE).abs() < 1e-12);
            }
            other => panic!("expected divergence, got {:?}", other),
        }
        assert!(potential.result().is_none());
    }

    #[test]
    fn tether_outside_allowed_window_reports_divergence() {
        let too_short = TetherParams {
            k_b: 7.0,
            l_min: 1.0,
            l_c1: 1.1,
            l_c0: 1.3,
            l_max: 1.5,
        };
        let too_long = TetherParams {
            k_b: 7.0,
            l_min: 0.5,
            l_c1: 0.6,
            l_c0: 0.8,
            l_max: 0.95,
        };
        for params in [too_short, too_long] {
            let (mesh, particles, simbox) = tetrahedron();
            let mut potential = TetherMeshBond::new(mesh);
            potential.set_params("mesh", params).unwrap();
            potential.attach(4).unwrap();

            let result = potential.compute(0, &particles, &simbox);
            assert!(
                matches!(
                    result,
                    Err(EngineError::Evaluation {
                        source: EvaluationError::Divergence {
                            potential: "tether",
                            ..
                        }
                    })
                ),
                "expected divergence for {:?}, got {:?}",
                params,
                result
            );
            assert!(potential.result().is_none());
        }
    }

    /// A closed but irregular tetrahedron, so zero net force cannot come from
    /// symmetry alone.
    fn irregular_tetrahedron() -> (Mesh, ParticleData, SimBox) {
        let particles = ParticleData::from_arrays(&[
            [0.0, 0.0, 0.0],
            [1.3, 0.1, -0.2],
            [0.2, 0.9, 0.1],
            [0.4, 0.3, 1.1],
        ]);
        let mesh = Mesh::new();
        mesh.set_triangles(vec![[0, 1, 2], [0, 2, 3], [0, 1, 3], [1, 2, 3]])
            .unwrap();
        (mesh, particles, SimBox::cube(10.0).unwrap())
    }

    fn evaluate_irregular<L: MeshForceLaw>(params: L::Params) -> ForceResult {
        let (mesh, particles, simbox) = irregular_tetrahedron();
        let mut potential = MeshPotential::<L>::new(mesh);
        potential.set_params("mesh", params).unwrap();
        potential.attach(particles.len()).unwrap();
        potential.compute(0, &particles, &simbox).unwrap().clone()
    }

    fn assert_nonzero_forces_cancel(result: &ForceResult) {
        let largest = result
            .forces()
            .iter()
            .map(|f| f.norm())
            .fold(0.0, f64::max);
        assert!(largest > 1e-3, "forces are trivially zero");
        assert!(
            result.net_force().norm() < 1e-9,
            "net force {:?}",
            result.net_force()
        );
    }

    #[test]
    fn irregular_closed_mesh_has_zero_net_force() {
        assert_nonzero_forces_cancel(&evaluate_irregular::<Harmonic>(HarmonicParams {
            k: 30.0,
            r0: 1.0,
        }));
        assert_nonzero_forces_cancel(&evaluate_irregular::<Fene>(FeneParams {
            k: 30.0,
            r0: 2.0,
            epsilon: 1.0,
            sigma: 1.0,
        }));
        assert_nonzero_forces_cancel(&evaluate_irregular::<AreaConservation>(
            AreaConservationParams { k: 2.0, a0: 1.0 },
        ));
    }

    #[test]
    fn bond_energy_and_virial_are_split_between_endpoints() {
        let mesh = Mesh::new();
        mesh.set_triangles(vec![[0, 1, 2]]).unwrap();
        let particles =
            ParticleData::from_arrays(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 3.0, 0.0]]);
        let simbox = SimBox::cube(10.0).unwrap();

        let mut potential = HarmonicMeshBond::new(mesh);
        potential
            .set_params("mesh", HarmonicParams { k: 2.0, r0: 1.0 })
            .unwrap();
        potential.attach(3).unwrap();
        potential.compute(0, &particles, &simbox).unwrap();

        let energies = potential.energies().unwrap();
        let virials = potential.virials().unwrap();
        // Bond 0-1 sits at rest length; only 0-2 and 1-2 contribute.
        assert!((energies[0] - 0.5 * 4.0).abs() < 1e-12);
        assert!(virials[0][0].abs() < 1e-12);
        assert!(virials[2][3] < 0.0);
    }
}
