//! Core types for levelset
//!
//! The bounding box handed to the extractor and the flat-array mesh it
//! returns.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    /// Create from center and half-extents
    pub fn from_center_extents(center: Vec3, half_extents: Vec3) -> Self {
        Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if point is inside
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// True if the box has no positive extent along some axis
    pub fn is_empty(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0)
    }
}

/// Triangle mesh as two flat arrays: vertex positions and index triples.
///
/// Meshes produced by [`level_set`](crate::level_set) are closed 2-manifolds
/// with outward-facing winding, so they can be fed directly to downstream
/// stages that require manifold input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    pub vert_pos: Vec<Vec3>,
    /// Triangle vertex indices, zero-based into `vert_pos`
    pub tri_verts: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Mesh {
            vert_pos: Vec::new(),
            tri_verts: Vec::new(),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vert_pos.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.tri_verts.len()
    }

    /// True if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.tri_verts.is_empty()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
