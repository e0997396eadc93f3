//! Mesh validation
//!
//! Topology and quality checks for extracted meshes. The extractor
//! guarantees a closed 2-manifold; this module is how that guarantee is
//! checked, both by this crate's own tests and by downstream pipelines
//! that want to assert it before consuming the mesh.
//!
//! Author: Moroya Sakamoto

use crate::types::Mesh;
use std::collections::{HashMap, HashSet};

/// Mesh validation result
#[derive(Debug, Clone)]
pub struct MeshValidation {
    /// Is the mesh a closed manifold (every edge shared by exactly 2 triangles)?
    pub is_manifold: bool,
    /// Number of non-manifold edges (shared by more than 2 triangles)
    pub non_manifold_edges: usize,
    /// Number of boundary edges (shared by exactly 1 triangle)
    pub boundary_edges: usize,
    /// Number of degenerate triangles (zero area)
    pub degenerate_triangles: usize,
    /// Euler characteristic V − E + F over referenced vertices
    pub euler_characteristic: i64,
    /// Number of connected components
    pub connected_components: usize,
    /// Total vertex count
    pub vertex_count: usize,
    /// Total triangle count
    pub triangle_count: usize,
}

impl MeshValidation {
    /// Check if the mesh passes all quality checks
    pub fn is_clean(&self) -> bool {
        self.is_manifold && self.degenerate_triangles == 0
    }

    /// Genus of a closed connected orientable mesh, from χ = 2 − 2g.
    /// Meaningful only when `connected_components == 1` and the mesh is
    /// manifold.
    pub fn genus(&self) -> i64 {
        (2 - self.euler_characteristic) / 2
    }
}

impl std::fmt::Display for MeshValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Validation Report")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(
            f,
            "  Manifold: {}",
            if self.is_manifold { "YES" } else { "NO" }
        )?;
        writeln!(f, "  Non-manifold edges: {}", self.non_manifold_edges)?;
        writeln!(f, "  Boundary edges: {}", self.boundary_edges)?;
        writeln!(f, "  Degenerate triangles: {}", self.degenerate_triangles)?;
        writeln!(f, "  Euler characteristic: {}", self.euler_characteristic)?;
        writeln!(f, "  Components: {}", self.connected_components)?;
        write!(
            f,
            "  Status: {}",
            if self.is_clean() { "CLEAN" } else { "NEEDS REPAIR" }
        )
    }
}

/// Edge key for hash map lookup (order-independent)
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct EdgeKey(u32, u32);

impl EdgeKey {
    fn new(a: u32, b: u32) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// Validate a mesh for manifoldness and quality.
///
/// Performs a complete analysis of the mesh topology and geometry.
pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let mut edge_counts: HashMap<EdgeKey, u32> = HashMap::new();

    for &[a, b, c] in &mesh.tri_verts {
        *edge_counts.entry(EdgeKey::new(a, b)).or_insert(0) += 1;
        *edge_counts.entry(EdgeKey::new(b, c)).or_insert(0) += 1;
        *edge_counts.entry(EdgeKey::new(c, a)).or_insert(0) += 1;
    }

    let non_manifold_edges = edge_counts.values().filter(|&&c| c > 2).count();
    let boundary_edges = edge_counts.values().filter(|&&c| c == 1).count();
    let is_manifold =
        !mesh.tri_verts.is_empty() && non_manifold_edges == 0 && boundary_edges == 0;

    MeshValidation {
        is_manifold,
        non_manifold_edges,
        boundary_edges,
        degenerate_triangles: count_degenerate_triangles(mesh),
        euler_characteristic: euler_characteristic(mesh),
        connected_components: connected_components(mesh),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
    }
}

/// Euler characteristic V − E + F, counting only vertices and edges
/// referenced by triangles. For a closed connected orientable surface this
/// is 2 − 2·genus: 2 for a topological sphere, 0 for a torus.
pub fn euler_characteristic(mesh: &Mesh) -> i64 {
    let mut edges: HashSet<EdgeKey> = HashSet::new();
    let mut referenced = vec![false; mesh.vertex_count()];

    for &[a, b, c] in &mesh.tri_verts {
        edges.insert(EdgeKey::new(a, b));
        edges.insert(EdgeKey::new(b, c));
        edges.insert(EdgeKey::new(c, a));
        referenced[a as usize] = true;
        referenced[b as usize] = true;
        referenced[c as usize] = true;
    }

    let v = referenced.iter().filter(|&&r| r).count() as i64;
    v - edges.len() as i64 + mesh.triangle_count() as i64
}

/// Number of connected components of the triangle graph (union-find over
/// shared vertices).
pub fn connected_components(mesh: &Mesh) -> usize {
    let mut parent: Vec<u32> = (0..mesh.vertex_count() as u32).collect();

    fn find(parent: &mut [u32], mut x: u32) -> u32 {
        while parent[x as usize] != x {
            parent[x as usize] = parent[parent[x as usize] as usize];
            x = parent[x as usize];
        }
        x
    }

    let mut referenced = vec![false; mesh.vertex_count()];
    for &[a, b, c] in &mesh.tri_verts {
        referenced[a as usize] = true;
        referenced[b as usize] = true;
        referenced[c as usize] = true;
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        let rc = find(&mut parent, c);
        parent[rb as usize] = ra;
        parent[rc as usize] = ra;
    }

    (0..mesh.vertex_count() as u32)
        .filter(|&i| referenced[i as usize] && find(&mut parent, i) == i)
        .count()
}

/// Count degenerate triangles (zero or near-zero area)
fn count_degenerate_triangles(mesh: &Mesh) -> usize {
    mesh.tri_verts
        .iter()
        .filter(|&&[a, b, c]| {
            let v0 = mesh.vert_pos[a as usize];
            let v1 = mesh.vert_pos[b as usize];
            let v2 = mesh.vert_pos[c as usize];
            (v1 - v0).cross(v2 - v0).length_squared() < 1e-12
        })
        .count()
}
