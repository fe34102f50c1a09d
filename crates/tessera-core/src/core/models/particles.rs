use nalgebra::Point3;

/// Particle positions indexed by tag.
///
/// Tags are dense, starting at zero, and match the vertex indices used by
/// [`MeshTopology`](super::mesh::MeshTopology) triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleData {
    positions: Vec<Point3<f64>>,
}

impl ParticleData {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    pub fn from_arrays(positions: &[[f64; 3]]) -> Self {
        Self {
            positions: positions.iter().map(|p| Point3::from(*p)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn position(&self, tag: usize) -> Option<&Point3<f64>> {
        self.positions.get(tag)
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arrays_preserves_tag_order() {
        let particles = ParticleData::from_arrays(&[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]);
        assert_eq!(particles.len(), 2);
        assert_eq!(particles.position(1), Some(&Point3::new(3.0, 4.0, 5.0)));
    }

    #[test]
    fn position_returns_none_for_unknown_tag() {
        let particles = ParticleData::from_arrays(&[[0.0, 0.0, 0.0]]);
        assert!(particles.position(1).is_none());
    }

    #[test]
    fn positions_mut_allows_in_place_updates() {
        let mut particles = ParticleData::from_arrays(&[[0.0, 0.0, 0.0]]);
        particles.positions_mut()[0].x = 2.5;
        assert_eq!(particles.positions()[0], Point3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn default_is_empty() {
        assert!(ParticleData::default().is_empty());
    }
}
