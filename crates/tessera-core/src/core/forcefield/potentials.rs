use super::params::{FeneParams, HarmonicParams, TetherParams};

const WCA_CUTOFF_FACTOR: f64 = 1.122_462_048_309_373; // 2^(1/6)

/// Pair force magnitude divided by separation, and pair energy.
///
/// The force on the first particle of a pair separated by `dr = x_a - x_b`
/// is `force_divr * dr`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BondInteraction {
    pub force_divr: f64,
    pub energy: f64,
}

#[inline]
pub fn harmonic(r: f64, params: &HarmonicParams) -> Option<BondInteraction> {
    if !r.is_finite() || r <= 0.0 {
        return None;
    }
    let dr = r - params.r0;
    Some(BondInteraction {
        force_divr: -params.k * dr / r,
        energy: 0.5 * params.k * dr * dr,
    })
}

/// Finite extensible spring plus a WCA core that is switched off beyond
/// `2^(1/6)·sigma`. Returns `None` once the bond reaches `r0`.
#[inline]
pub fn fene(r: f64, params: &FeneParams) -> Option<BondInteraction> {
    if !r.is_finite() || r <= 0.0 || r >= params.r0 {
        return None;
    }
    let rsq = r * r;
    let stretch = 1.0 - rsq / (params.r0 * params.r0);

    let mut force_divr = -params.k / stretch;
    let mut energy = -0.5 * params.k * params.r0 * params.r0 * stretch.ln();

    if params.epsilon > 0.0 && r < WCA_CUTOFF_FACTOR * params.sigma {
        let sr2 = params.sigma * params.sigma / rsq;
        let sr6 = sr2 * sr2 * sr2;
        force_divr += 24.0 * params.epsilon / rsq * (2.0 * sr6 * sr6 - sr6);
        energy += 4.0 * params.epsilon * (sr6 * sr6 - sr6) + params.epsilon;
    }

    Some(BondInteraction { force_divr, energy })
}

/// Smoothly tethered bond: zero between `l_c1` and `l_c0`, diverging at
/// `l_min` and `l_max`. Returns `None` outside `(l_min, l_max)`.
#[inline]
pub fn tether(r: f64, params: &TetherParams) -> Option<BondInteraction> {
    if !r.is_finite() || r <= params.l_min || r >= params.l_max {
        return None;
    }
    let mut force = 0.0;
    let mut energy = 0.0;

    if r > params.l_c0 {
        let gap = params.l_c0 - r;
        let room = params.l_max - r;
        let u = params.k_b * (1.0 / gap).exp() / room;
        energy += u;
        force -= u * (1.0 / (gap * gap) + 1.0 / room);
    }
    if r < params.l_c1 {
        let gap = r - params.l_c1;
        let room = r - params.l_min;
        let u = params.k_b * (1.0 / gap).exp() / room;
        energy += u;
        force += u * (1.0 / (gap * gap) + 1.0 / room);
    }

    Some(BondInteraction {
        force_divr: force / r,
        energy,
    })
}
