use nalgebra::Vector3;
use thiserror::Error;

/// Box parameters in the order `[Lx, Ly, Lz, xy, xz, yz]`.
pub type BoxArray = [f64; 6];

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoxError {
    #[error("Box length {name} must be finite and positive, got {value}")]
    InvalidLength { name: &'static str, value: f64 },
    #[error("Tilt factor {name} must be finite, got {value}")]
    InvalidTilt { name: &'static str, value: f64 },
}

/// A periodic, possibly triclinic simulation box.
///
/// The box is spanned by the lattice vectors `a1 = (Lx, 0, 0)`,
/// `a2 = (xy·Ly, Ly, 0)` and `a3 = (xz·Lz, yz·Lz, Lz)`. A box with `Lz == 0`
/// is two-dimensional: the z direction is neither periodic nor part of the
/// volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    lx: f64,
    ly: f64,
    lz: f64,
    xy: f64,
    xz: f64,
    yz: f64,
}

impl SimBox {
    pub fn new(lx: f64, ly: f64, lz: f64, xy: f64, xz: f64, yz: f64) -> Result<Self, BoxError> {
        positive_length("Lx", lx)?;
        positive_length("Ly", ly)?;
        if !lz.is_finite() || lz < 0.0 {
            return Err(BoxError::InvalidLength {
                name: "Lz",
                value: lz,
            });
        }
        finite_tilt("xy", xy)?;
        finite_tilt("xz", xz)?;
        finite_tilt("yz", yz)?;
        Ok(Self {
            lx,
            ly,
            lz,
            xy,
            xz,
            yz,
        })
    }

    /// An orthorhombic cube with edge `length`.
    pub fn cube(length: f64) -> Result<Self, BoxError> {
        Self::new(length, length, length, 0.0, 0.0, 0.0)
    }

    /// A two-dimensional square with edge `length`.
    pub fn square(length: f64) -> Result<Self, BoxError> {
        Self::new(length, length, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn from_array(values: BoxArray) -> Result<Self, BoxError> {
        let [lx, ly, lz, xy, xz, yz] = values;
        Self::new(lx, ly, lz, xy, xz, yz)
    }

    pub fn to_array(&self) -> BoxArray {
        [self.lx, self.ly, self.lz, self.xy, self.xz, self.yz]
    }

    #[inline]
    pub fn lengths(&self) -> Vector3<f64> {
        Vector3::new(self.lx, self.ly, self.lz)
    }

    #[inline]
    pub fn tilts(&self) -> [f64; 3] {
        [self.xy, self.xz, self.yz]
    }

    #[inline]
    pub fn is_2d(&self) -> bool {
        self.lz == 0.0
    }

    /// Volume in 3D, area in 2D. Tilt factors never change it.
    pub fn volume(&self) -> f64 {
        if self.is_2d() {
            self.lx * self.ly
        } else {
            self.lx * self.ly * self.lz
        }
    }

    /// Wraps a separation vector to its nearest periodic image.
    ///
    /// Images are removed along `a3`, then `a2`, then `a1`, so the tilt
    /// couplings are applied before the lower-index directions are wrapped.
    pub fn min_image(&self, mut delta: Vector3<f64>) -> Vector3<f64> {
        if !self.is_2d() {
            let image = (delta.z / self.lz).round_ties_even();
            delta.z -= self.lz * image;
            delta.y -= self.yz * self.lz * image;
            delta.x -= self.xz * self.lz * image;
        }

        let image = (delta.y / self.ly).round_ties_even();
        delta.y -= self.ly * image;
        delta.x -= self.xy * self.ly * image;

        let image = (delta.x / self.lx).round_ties_even();
        delta.x -= self.lx * image;
        delta
    }
}

fn positive_length(name: &'static str, value: f64) -> Result<(), BoxError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BoxError::InvalidLength { name, value })
    }
}

fn finite_tilt(name: &'static str, value: f64) -> Result<(), BoxError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BoxError::InvalidTilt { name, value })
    }
}
