use super::VariantError;
use super::scalar::{RampPhase, Variant, ramp_fraction};
use crate::core::models::simbox::{BoxArray, BoxError, SimBox};
use std::sync::Arc;

/// Interpolates every box parameter between two boxes, driven by a scalar
/// variant whose value is the interpolation fraction.
#[derive(Debug, Clone)]
pub struct BoxRamp {
    initial: SimBox,
    final_box: SimBox,
    variant: Arc<dyn Variant>,
}

impl BoxRamp {
    pub fn new(initial: SimBox, final_box: SimBox, variant: Arc<dyn Variant>) -> Self {
        Self {
            initial,
            final_box,
            variant,
        }
    }

    pub fn initial(&self) -> &SimBox {
        &self.initial
    }

    pub fn final_box(&self) -> &SimBox {
        &self.final_box
    }

    pub fn variant(&self) -> &Arc<dyn Variant> {
        &self.variant
    }

    pub fn value(&self, timestep: u64) -> BoxArray {
        let s = self.variant.value(timestep);
        let from = self.initial.to_array();
        let to = self.final_box.to_array();
        std::array::from_fn(|i| from[i] * (1.0 - s) + to[i] * s)
    }
}

/// Scales the box isotropically so that `1/V` moves linearly from
/// `1/V_initial` to `1/V_final`. Tilt factors never change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseVolumeRamp {
    initial: SimBox,
    final_volume: f64,
    t_start: u64,
    t_ramp: u64,
}

impl InverseVolumeRamp {
    pub fn new(
        initial: SimBox,
        final_volume: f64,
        t_start: u64,
        t_ramp: u64,
    ) -> Result<Self, VariantError> {
        if !final_volume.is_finite() || final_volume <= 0.0 {
            return Err(VariantError::InvalidVolume(final_volume));
        }
        Ok(Self {
            initial,
            final_volume,
            t_start,
            t_ramp,
        })
    }

    pub fn initial(&self) -> &SimBox {
        &self.initial
    }

    pub fn final_volume(&self) -> f64 {
        self.final_volume
    }

    pub fn value(&self, timestep: u64) -> BoxArray {
        let initial_volume = self.initial.volume();
        let volume = match ramp_fraction(timestep, self.t_start, self.t_ramp) {
            RampPhase::Before => return self.initial.to_array(),
            RampPhase::After => self.final_volume,
            RampPhase::During(s) => 1.0 / ((1.0 - s) / initial_volume + s / self.final_volume),
        };
        self.scaled_to(volume / initial_volume)
    }

    fn scaled_to(&self, volume_ratio: f64) -> BoxArray {
        let scale = if self.initial.is_2d() {
            volume_ratio.sqrt()
        } else {
            volume_ratio.cbrt()
        };
        let [lx, ly, lz, xy, xz, yz] = self.initial.to_array();
        [lx * scale, ly * scale, lz * scale, xy, xz, yz]
    }
}

/// The box as a function of timestep.
#[derive(Debug, Clone)]
pub enum BoxVariant {
    Constant(SimBox),
    Ramp(BoxRamp),
    LinearInverseVolume(InverseVolumeRamp),
}

impl BoxVariant {
    pub fn constant(simbox: SimBox) -> Self {
        Self::Constant(simbox)
    }

    pub fn ramp(initial: SimBox, final_box: SimBox, variant: Arc<dyn Variant>) -> Self {
        Self::Ramp(BoxRamp::new(initial, final_box, variant))
    }

    pub fn linear_inverse_volume(
        initial: SimBox,
        final_volume: f64,
        t_start: u64,
        t_ramp: u64,
    ) -> Result<Self, VariantError> {
        InverseVolumeRamp::new(initial, final_volume, t_start, t_ramp)
            .map(Self::LinearInverseVolume)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Ramp(_) => "ramp",
            Self::LinearInverseVolume(_) => "linear-inverse-volume",
        }
    }

    /// Box parameters `[Lx, Ly, Lz, xy, xz, yz]` at `timestep`.
    pub fn value(&self, timestep: u64) -> BoxArray {
        match self {
            Self::Constant(simbox) => simbox.to_array(),
            Self::Ramp(ramp) => ramp.value(timestep),
            Self::LinearInverseVolume(ramp) => ramp.value(timestep),
        }
    }

    /// The validated box at `timestep`.
    ///
    /// Fails only when a custom scalar variant drives a ramp to a box with
    /// non-positive lengths.
    pub fn simbox(&self, timestep: u64) -> Result<SimBox, BoxError> {
        SimBox::from_array(self.value(timestep))
    }
}
