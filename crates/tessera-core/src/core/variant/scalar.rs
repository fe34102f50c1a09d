use super::VariantError;
use std::fmt;

/// A real value that depends on the timestep.
pub trait Variant: fmt::Debug + Send + Sync {
    fn value(&self, timestep: u64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVariant {
    pub value: f64,
}

impl ConstantVariant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Variant for ConstantVariant {
    fn value(&self, _timestep: u64) -> f64 {
        self.value
    }
}

/// Holds `a` until `t_start`, moves linearly to `b` over `t_ramp` steps,
/// then holds `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampVariant {
    a: f64,
    b: f64,
    t_start: u64,
    t_ramp: u64,
}

impl RampVariant {
    pub fn new(a: f64, b: f64, t_start: u64, t_ramp: u64) -> Result<Self, VariantError> {
        if !a.is_finite() || !b.is_finite() {
            return Err(VariantError::NonFiniteEndpoint { a, b });
        }
        Ok(Self {
            a,
            b,
            t_start,
            t_ramp,
        })
    }

    /// The ramp from 0 to 1 used to drive box interpolation.
    pub fn unit(t_start: u64, t_ramp: u64) -> Self {
        Self {
            a: 0.0,
            b: 1.0,
            t_start,
            t_ramp,
        }
    }

    pub fn endpoints(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    pub fn t_start(&self) -> u64 {
        self.t_start
    }

    pub fn t_ramp(&self) -> u64 {
        self.t_ramp
    }
}

impl Variant for RampVariant {
    fn value(&self, timestep: u64) -> f64 {
        match ramp_fraction(timestep, self.t_start, self.t_ramp) {
            RampPhase::Before => self.a,
            RampPhase::After => self.b,
            RampPhase::During(s) => self.a * (1.0 - s) + self.b * s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RampPhase {
    Before,
    During(f64),
    After,
}

/// Where `timestep` falls on a ramp. A zero-length ramp jumps to `After`
/// at `t_start`.
pub(crate) fn ramp_fraction(timestep: u64, t_start: u64, t_ramp: u64) -> RampPhase {
    let end = t_start.saturating_add(t_ramp);
    if timestep >= end {
        RampPhase::After
    } else if timestep <= t_start {
        RampPhase::Before
    } else {
        RampPhase::During((timestep - t_start) as f64 / t_ramp as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_variant_ignores_timestep() {
        let variant = ConstantVariant::new(2.5);
        assert_eq!(variant.value(0), 2.5);
        assert_eq!(variant.value(u64::MAX), 2.5);
    }

    #[test]
    fn ramp_holds_endpoints_outside_window() {
        let ramp = RampVariant::new(1.0, 3.0, 10, 20).unwrap();
        assert_eq!(ramp.value(0), 1.0);
        assert_eq!(ramp.value(10), 1.0);
        assert_eq!(ramp.value(30), 3.0);
        assert_eq!(ramp.value(1_000), 3.0);
    }

    #[test]
    fn ramp_interpolates_linearly() {
        let ramp = RampVariant::new(1.0, 3.0, 10, 20).unwrap();
        assert!((ramp.value(20) - 2.0).abs() < 1e-12);
        assert!((ramp.value(15) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn zero_length_ramp_steps_at_start() {
        let ramp = RampVariant::new(0.0, 1.0, 5, 0).unwrap();
        assert_eq!(ramp.value(4), 0.0);
        assert_eq!(ramp.value(5), 1.0);
    }

    #[test]
    fn ramp_end_saturates_instead_of_overflowing() {
        let ramp = RampVariant::unit(u64::MAX - 1, 10);
        assert_eq!(ramp.value(0), 0.0);
        assert_eq!(ramp.value(u64::MAX), 1.0);
    }

    #[test]
    fn non_finite_endpoints_are_rejected() {
        assert!(RampVariant::new(f64::NAN, 1.0, 0, 1).is_err());
        assert!(RampVariant::new(0.0, f64::INFINITY, 0, 1).is_err());
    }
}
