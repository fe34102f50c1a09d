use crate::core::forcefield::params::ParamRecord;
use crate::core::forcefield::potentials::BondInteraction;
use crate::core::forcefield::term::{ForceResult, pair_virial, scale_virial};
use crate::core::models::mesh::MeshBond;
use crate::engine::error::EvaluationError;
use crate::engine::potential::EvaluationInput;
use nalgebra::Vector3;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

struct BondContribution {
    a: usize,
    b: usize,
    dr: Vector3<f64>,
    interaction: BondInteraction,
}

/// Evaluates a radial law on every mesh bond.
///
/// Each bond's energy and virial are split evenly between its two particles.
#[instrument(skip_all, name = "bond_forces_task")]
pub fn run<P, F>(input: &EvaluationInput<'_, P>, law: F) -> Result<ForceResult, EvaluationError>
where
    P: ParamRecord,
    F: Fn(f64, &P) -> Option<BondInteraction> + Sync,
{
    let bonds = input.mesh.enumerate_bonds();
    let mut result = ForceResult::zeros(input.particles.len());
    if bonds.is_empty() {
        return Ok(result);
    }

    #[cfg(not(feature = "parallel"))]
    let iterator = bonds.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = bonds.par_iter().enumerate();

    let contributions: Vec<Result<BondContribution, EvaluationError>> = iterator
        .map(|(index, bond)| evaluate_bond(index, bond, input, &law))
        .collect();

    for contribution in contributions {
        let BondContribution {
            a,
            b,
            dr,
            interaction,
        } = contribution?;
        let force = dr * interaction.force_divr;
        let half_energy = 0.5 * interaction.energy;
        let half_virial = scale_virial(&pair_virial(interaction.force_divr, &dr), 0.5);

        result.add_force(a, force);
        result.add_force(b, -force);
        result.add_energy(a, half_energy);
        result.add_energy(b, half_energy);
        result.add_virial(a, &half_virial);
        result.add_virial(b, &half_virial);
    }

    debug!(
        potential = P::KIND.as_str(),
        bonds = bonds.len(),
        energy = result.total_energy(),
        "Bond forces evaluated."
    );
    Ok(result)
}

fn evaluate_bond<P, F>(
    index: usize,
    bond: &MeshBond,
    input: &EvaluationInput<'_, P>,
    law: &F,
) -> Result<BondContribution, EvaluationError>
where
    P: ParamRecord,
    F: Fn(f64, &P) -> Option<BondInteraction>,
{
    let dr = input
        .simbox
        .min_image(input.position(bond.a)? - input.position(bond.b)?);
    let r = dr.norm();
    let params = &input.params[bond.type_id];

    let interaction = law(r, params).ok_or_else(|| EvaluationError::Divergence {
        potential: P::KIND.as_str(),
        bond: index,
        tags: bond.tags(),
        distance: r,
        params: (*params).into(),
    })?;

    Ok(BondContribution {
        a: bond.a,
        b: bond.b,
        dr,
        interaction,
    })
}
