use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the single mesh type every new topology starts with.
pub const DEFAULT_MESH_TYPE: &str = "mesh";

/// Three particle tags, stored in the order the caller supplied them.
pub type Triangle = [usize; 3];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Triangle {triangle} {vertices:?} repeats a vertex")]
    DegenerateTriangle { triangle: usize, vertices: Triangle },
    #[error(
        "Triangle {triangle} references particle {vertex}, but only {particle_count} particles exist"
    )]
    VertexOutOfRange {
        triangle: usize,
        vertex: usize,
        particle_count: usize,
    },
    #[error("Triangle {triangle} uses type id {type_id}, but the mesh declares {type_count} type(s)")]
    UnknownTypeId {
        triangle: usize,
        type_id: usize,
        type_count: usize,
    },
    #[error("Got {type_ids} type ids for {triangles} triangles")]
    TypeCountMismatch { triangles: usize, type_ids: usize },
    #[error("A mesh must declare at least one type")]
    NoTypes,
    #[error("Mesh type '{0}' is declared more than once")]
    DuplicateType(String),
}

/// A unique undirected edge of the mesh.
///
/// `a < b` always holds. The bond inherits the type of the first triangle
/// that introduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshBond {
    pub a: usize,
    pub b: usize,
    pub type_id: usize,
    /// The two triangles sharing this edge. Both entries are equal on a
    /// boundary edge.
    pub triangles: [usize; 2],
}

impl MeshBond {
    #[inline]
    pub fn tags(&self) -> [usize; 2] {
        [self.a, self.b]
    }

    pub fn contains(&self, tag: usize) -> bool {
        self.a == tag || self.b == tag
    }

    pub fn is_boundary(&self) -> bool {
        self.triangles[0] == self.triangles[1]
    }
}

/// The connectivity of a triangulated surface.
///
/// A topology owns the ordered triangle list, the per-triangle type ids and
/// the bond list derived from it. Bonds are rebuilt every time the triangle
/// list changes, so the two never disagree.
///
/// # Bond order
///
/// Bonds are listed in order of first appearance while walking the triangles
/// in order and, inside each triangle `(v0, v1, v2)`, the edges `(v0, v1)`,
/// `(v1, v2)`, `(v2, v0)`. Each edge is normalized to `(min, max)` and kept
/// once. Consumers that report per-bond results rely on this order.
///
/// # Revisions
///
/// Every successful mutation increments [`revision`](Self::revision).
/// Potentials compare revisions to tell whether cached results still belong
/// to the current connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTopology {
    types: Vec<String>,
    triangles: Vec<Triangle>,
    type_ids: Vec<usize>,
    bonds: Vec<MeshBond>,
    particle_count: Option<usize>,
    revision: u64,
}

impl Default for MeshTopology {
    fn default() -> Self {
        Self {
            types: vec![DEFAULT_MESH_TYPE.to_string()],
            triangles: Vec::new(),
            type_ids: Vec::new(),
            bonds: Vec::new(),
            particle_count: None,
            revision: 0,
        }
    }
}

impl MeshTopology {
    /// An empty topology with the single type `"mesh"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty topology declaring the given type names.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NoTypes`] for an empty list and
    /// [`TopologyError::DuplicateType`] if a name repeats.
    pub fn with_types<I, S>(types: I) -> Result<Self, TopologyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut topology = Self::default();
        topology.set_types(types.into_iter().map(Into::into).collect())?;
        Ok(topology)
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn type_id(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|t| t == name)
    }

    pub fn type_name(&self, type_id: usize) -> Option<&str> {
        self.types.get(type_id).map(String::as_str)
    }

    /// Replaces the declared type names.
    ///
    /// Existing triangles keep their type ids, so the new list must still
    /// cover every id in use.
    pub fn set_types(&mut self, types: Vec<String>) -> Result<(), TopologyError> {
        if types.is_empty() {
            return Err(TopologyError::NoTypes);
        }
        for (i, name) in types.iter().enumerate() {
            if types[..i].contains(name) {
                return Err(TopologyError::DuplicateType(name.clone()));
            }
        }
        check_type_ids(&self.type_ids, types.len())?;

        self.types = types;
        self.revision += 1;
        Ok(())
    }

    /// Binds the topology to a particle set of the given size.
    ///
    /// Once bound, every triangle written later is checked against the
    /// particle count. Binding fails if the current triangles already
    /// reference a tag outside the range.
    pub fn bind_particle_count(&mut self, particle_count: usize) -> Result<(), TopologyError> {
        check_vertices(&self.triangles, Some(particle_count))?;
        self.particle_count = Some(particle_count);
        Ok(())
    }

    pub fn particle_count(&self) -> Option<usize> {
        self.particle_count
    }

    /// Checks the current triangles against a particle count without binding.
    pub fn validate_against(&self, particle_count: usize) -> Result<(), TopologyError> {
        check_vertices(&self.triangles, Some(particle_count))
    }

    /// Number of triangles.
    #[inline]
    pub fn size(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces all triangles, giving each one type id `0`.
    ///
    /// On error the previous triangles and bonds are left untouched.
    pub fn set_triangles(&mut self, triangles: Vec<Triangle>) -> Result<(), TopologyError> {
        let type_ids = vec![0; triangles.len()];
        self.set_triangles_with_types(triangles, type_ids)
    }

    /// Replaces all triangles along with their type ids.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::TypeCountMismatch`] when the two lists differ in length
    /// - [`TopologyError::DegenerateTriangle`] when a triangle repeats a vertex
    /// - [`TopologyError::VertexOutOfRange`] when bound and a tag is out of range
    /// - [`TopologyError::UnknownTypeId`] when a type id has no declared name
    ///
    /// On error the previous triangles and bonds are left untouched.
    pub fn set_triangles_with_types(
        &mut self,
        triangles: Vec<Triangle>,
        type_ids: Vec<usize>,
    ) -> Result<(), TopologyError> {
        if triangles.len() != type_ids.len() {
            return Err(TopologyError::TypeCountMismatch {
                triangles: triangles.len(),
                type_ids: type_ids.len(),
            });
        }
        check_vertices(&triangles, self.particle_count)?;
        check_type_ids(&type_ids, self.types.len())?;

        self.bonds = derive_bonds(&triangles, &type_ids);
        self.triangles = triangles;
        self.type_ids = type_ids;
        self.revision += 1;

        debug!(
            triangles = self.triangles.len(),
            bonds = self.bonds.len(),
            revision = self.revision,
            "Mesh topology updated."
        );
        Ok(())
    }

    pub fn enumerate_triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_type_ids(&self) -> &[usize] {
        &self.type_ids
    }

    pub fn enumerate_bonds(&self) -> &[MeshBond] {
        &self.bonds
    }

    /// Indices of the triangles adjacent to bond `bond`.
    pub fn bond_triangles(&self, bond: usize) -> Option<[usize; 2]> {
        self.bonds.get(bond).map(|b| b.triangles)
    }
}

fn check_vertices(
    triangles: &[Triangle],
    particle_count: Option<usize>,
) -> Result<(), TopologyError> {
    for (index, tri) in triangles.iter().enumerate() {
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(TopologyError::DegenerateTriangle {
                triangle: index,
                vertices: *tri,
            });
        }
        if let Some(count) = particle_count {
            if let Some(&vertex) = tri.iter().find(|&&v| v >= count) {
                return Err(TopologyError::VertexOutOfRange {
                    triangle: index,
                    vertex,
                    particle_count: count,
                });
            }
        }
    }
    Ok(())
}

fn check_type_ids(type_ids: &[usize], type_count: usize) -> Result<(), TopologyError> {
    match type_ids.iter().position(|&t| t >= type_count) {
        Some(index) => Err(TopologyError::UnknownTypeId {
            triangle: index,
            type_id: type_ids[index],
            type_count,
        }),
        None => Ok(()),
    }
}

fn derive_bonds(triangles: &[Triangle], type_ids: &[usize]) -> Vec<MeshBond> {
    let mut index: HashMap<(usize, usize), usize> = HashMap::with_capacity(triangles.len() * 2);
    let mut bonds: Vec<MeshBond> = Vec::with_capacity(triangles.len() * 3 / 2 + 1);
    let mut overshared = 0usize;

    for (t, tri) in triangles.iter().enumerate() {
        for (u, v) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (u.min(v), u.max(v));
            match index.entry(key) {
                Entry::Occupied(slot) => {
                    let bond = &mut bonds[*slot.get()];
                    if bond.is_boundary() {
                        bond.triangles[1] = t;
                    } else {
                        overshared += 1;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(bonds.len());
                    bonds.push(MeshBond {
                        a: key.0,
                        b: key.1,
                        type_id: type_ids[t],
                        triangles: [t, t],
                    });
                }
            }
        }
    }

    if overshared > 0 {
        warn!(
            edges = overshared,
            "Mesh has edges shared by more than two triangles; only the first two are recorded as neighbors."
        );
    }
    bonds
}

/// A shared handle to a [`MeshTopology`].
///
/// Several potentials may evaluate the same mesh. They all hold clones of
/// one `Mesh`, so an edit through any handle is seen by every holder.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    inner: Arc<RwLock<MeshTopology>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_topology(topology: MeshTopology) -> Self {
        Self {
            inner: Arc::new(RwLock::new(topology)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, MeshTopology> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, MeshTopology> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether two handles refer to the same topology.
    pub fn ptr_eq(&self, other: &Mesh) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn revision(&self) -> u64 {
        self.read().revision()
    }

    pub fn set_triangles(&self, triangles: Vec<Triangle>) -> Result<(), TopologyError> {
        self.write().set_triangles(triangles)
    }
}
