use nalgebra::Vector3;
use std::ops::AddAssign;

/// Per-particle virial components `[xx, xy, xz, yy, yz, zz]`.
pub type Virial = [f64; 6];

/// Virial `Σ r ⊗ F` of one pair with separation `dr` and force `force_divr * dr`.
#[inline]
pub fn pair_virial(force_divr: f64, dr: &Vector3<f64>) -> Virial {
    [
        force_divr * dr.x * dr.x,
        force_divr * dr.x * dr.y,
        force_divr * dr.x * dr.z,
        force_divr * dr.y * dr.y,
        force_divr * dr.y * dr.z,
        force_divr * dr.z * dr.z,
    ]
}

#[inline]
pub fn outer_virial(r: &Vector3<f64>, f: &Vector3<f64>) -> Virial {
    [
        r.x * f.x,
        r.x * f.y,
        r.x * f.z,
        r.y * f.y,
        r.y * f.z,
        r.z * f.z,
    ]
}

#[inline]
pub fn scale_virial(virial: &Virial, factor: f64) -> Virial {
    virial.map(|v| v * factor)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForceResult {
    forces: Vec<Vector3<f64>>,
    energies: Vec<f64>,
    virials: Vec<Virial>,
}

impl ForceResult {
    pub fn zeros(particle_count: usize) -> Self {
        Self {
            forces: vec![Vector3::zeros(); particle_count],
            energies: vec![0.0; particle_count],
            virials: vec![[0.0; 6]; particle_count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn virials(&self) -> &[Virial] {
        &self.virials
    }

    #[inline]
    pub fn add_force(&mut self, tag: usize, force: Vector3<f64>) {
        self.forces[tag] += force;
    }

    #[inline]
    pub fn add_energy(&mut self, tag: usize, energy: f64) {
        self.energies[tag] += energy;
    }

    #[inline]
    pub fn add_virial(&mut self, tag: usize, virial: &Virial) {
        for (acc, v) in self.virials[tag].iter_mut().zip(virial) {
            *acc += v;
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.energies.iter().sum()
    }

    pub fn net_force(&self) -> Vector3<f64> {
        self.forces.iter().sum()
    }

    pub fn total_virial(&self) -> Virial {
        let mut total = [0.0; 6];
        for virial in &self.virials {
            for (acc, v) in total.iter_mut().zip(virial) {
                *acc += v;
            }
        }
        total
    }

    fn grow_to(&mut self, particle_count: usize) {
        if particle_count > self.len() {
            self.forces.resize(particle_count, Vector3::zeros());
            self.energies.resize(particle_count, 0.0);
            self.virials.resize(particle_count, [0.0; 6]);
        }
    }
}

impl AddAssign<&ForceResult> for ForceResult {
    fn add_assign(&mut self, rhs: &ForceResult) {
        self.grow_to(rhs.len());
        for tag in 0..rhs.len() {
            self.forces[tag] += rhs.forces[tag];
            self.energies[tag] += rhs.energies[tag];
            self.add_virial(tag, &rhs.virials[tag]);
        }
    }
}
