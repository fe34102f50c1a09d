use crate::core::forcefield::params::{AreaConservationParams, ParamRecord};
use crate::core::forcefield::surface::{TriangleArea, triangle_area};
use crate::core::forcefield::term::{ForceResult, outer_virial, scale_virial};
use crate::core::models::mesh::Triangle;
use crate::engine::error::EvaluationError;
use crate::engine::potential::EvaluationInput;
use nalgebra::Vector3;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

struct TriangleGeometry {
    ab: Vector3<f64>,
    ac: Vector3<f64>,
    measured: TriangleArea,
}

/// Global area conservation, one term per mesh type:
/// `E_t = ½ k (A_t - A0)² / A0` with `A_t` the summed area of every
/// triangle of type `t`.
///
/// Each triangle's share of `E_t` is proportional to its area and split
/// evenly across its three vertices.
#[instrument(skip_all, name = "area_conservation_task")]
pub fn run(
    input: &EvaluationInput<'_, AreaConservationParams>,
) -> Result<ForceResult, EvaluationError> {
    let triangles = input.mesh.enumerate_triangles();
    let type_ids = input.mesh.triangle_type_ids();
    let mut result = ForceResult::zeros(input.particles.len());
    if triangles.is_empty() {
        return Ok(result);
    }

    #[cfg(not(feature = "parallel"))]
    let iterator = triangles.iter().zip(type_ids).enumerate();

    #[cfg(feature = "parallel")]
    let iterator = triangles.par_iter().zip(type_ids).enumerate();

    let measured: Vec<Result<TriangleGeometry, EvaluationError>> = iterator
        .map(|(index, (tri, &type_id))| measure(index, tri, type_id, input))
        .collect();
    let geometries = measured.into_iter().collect::<Result<Vec<_>, _>>()?;

    let mut total_area = vec![0.0; input.params.len()];
    for (geometry, &type_id) in geometries.iter().zip(type_ids) {
        total_area[type_id] += geometry.measured.area;
    }

    for ((tri, &type_id), geometry) in triangles.iter().zip(type_ids).zip(&geometries) {
        let params = &input.params[type_id];
        let delta = total_area[type_id] - params.a0;
        let energy = 0.5 * params.k * delta * delta / params.a0;
        let prefactor = -params.k * delta / params.a0;
        let vertex_energy = energy * geometry.measured.area / total_area[type_id] / 3.0;

        let forces = geometry.measured.gradients.map(|g| g * prefactor);
        let mut virial = [0.0; 6];
        for (r, f) in [Vector3::zeros(), geometry.ab, geometry.ac].iter().zip(&forces) {
            for (acc, v) in virial.iter_mut().zip(outer_virial(r, f)) {
                *acc += v;
            }
        }
        let vertex_virial = scale_virial(&virial, 1.0 / 3.0);

        for (&tag, force) in tri.iter().zip(forces) {
            result.add_force(tag, force);
            result.add_energy(tag, vertex_energy);
            result.add_virial(tag, &vertex_virial);
        }
    }

    debug!(
        triangles = triangles.len(),
        area = total_area.iter().sum::<f64>(),
        energy = result.total_energy(),
        "Area conservation evaluated."
    );
    Ok(result)
}

fn measure(
    index: usize,
    tri: &Triangle,
    type_id: usize,
    input: &EvaluationInput<'_, AreaConservationParams>,
) -> Result<TriangleGeometry, EvaluationError> {
    let a = input.position(tri[0])?;
    let ab = input.simbox.min_image(input.position(tri[1])? - a);
    let ac = input.simbox.min_image(input.position(tri[2])? - a);

    let measured = triangle_area(&ab, &ac).ok_or_else(|| EvaluationError::DegenerateGeometry {
        potential: AreaConservationParams::KIND.as_str(),
        triangle: index,
        tags: *tri,
        params: input.params[type_id].into(),
    })?;

    Ok(TriangleGeometry { ab, ac, measured })
}
