//! Body-centered cubic lattice geometry
//!
//! The sampling lattice is the union of a cubic grid (`w = 0`, shifted by
//! −½ in world space) and its body-centered copy (`w = 1`). Every lattice
//! point has 14 nearest neighbors across the two sub-lattices but owns only
//! 7 of them, so each lattice edge is visited exactly once.
//!
//! Author: Moroya Sakamoto

use glam::{IVec3, IVec4, Vec3};

/// The 7 owned neighbor offsets per grid vertex.
///
/// Applied to a `w = 0` vertex these land on `w = 1`; applied to a `w = 1`
/// vertex the same offsets produce `w = 2`, canonicalized by [`neighbor`]
/// back onto `w = 0` of the next cell. Offset 0 is the `(1,1,1)/2` diagonal
/// partner in the other sub-lattice.
pub const NEIGHBORS: [IVec4; 7] = [
    IVec4::new(0, 0, 0, 1),
    IVec4::new(1, 0, 0, 0),
    IVec4::new(0, 1, 0, 0),
    IVec4::new(0, 0, 1, 0),
    IVec4::new(-1, 0, 0, 1),
    IVec4::new(0, -1, 0, 1),
    IVec4::new(0, 0, -1, 1),
];

/// Cyclic successor of axis `i` in {0, 1, 2}
#[inline]
pub fn next3(i: usize) -> usize {
    [1, 2, 0][i]
}

/// Cyclic predecessor of axis `i` in {0, 1, 2}
#[inline]
pub fn prev3(i: usize) -> usize {
    [2, 0, 1][i]
}

/// Grid index of the vertex across owned edge `i`, canonicalized so the
/// sub-lattice selector stays in {0, 1}.
#[inline]
pub fn neighbor(index: IVec4, i: usize) -> IVec4 {
    let mut n = index + NEIGHBORS[i];
    if n.w == 2 {
        n += IVec4::ONE;
        n.w = 0;
    }
    n
}

/// World-space mapping of the BCC lattice over a bounding box.
#[derive(Debug, Clone, Copy)]
pub struct BccGrid {
    /// World position of the box minimum corner
    pub origin: Vec3,
    /// World-space distance between adjacent cells along each axis
    pub spacing: Vec3,
    /// Grid cells per axis plus the outer padding layer
    pub bound: IVec3,
}

impl BccGrid {
    /// World position of a grid index. The `w = 0` sub-lattice sits half a
    /// cell below the `w = 1` sub-lattice along every axis.
    #[inline]
    pub fn position(&self, index: IVec4) -> Vec3 {
        let offset = if index.w == 1 { 0.0 } else { -0.5 };
        self.origin + self.spacing * (index.truncate().as_vec3() + offset)
    }

    /// Clamp a field value so the padding layer always reads as outside.
    ///
    /// Any index on the lower bound, on or past the upper bound, or (for the
    /// body-centered sub-lattice) one cell short of the upper bound is forced
    /// non-positive. This closes the output surface on the box boundary.
    #[inline]
    pub fn clamp_to_bound(&self, index: IVec4, d: f32) -> f32 {
        let xyz = index.truncate();
        let on_lower_bound = xyz.cmple(IVec3::ZERO).any();
        let on_upper_bound = xyz.cmpge(self.bound).any();
        let on_half_bound = index.w == 1 && xyz.cmpge(self.bound - 1).any();
        if on_lower_bound || on_upper_bound || on_half_bound {
            d.min(0.0)
        } else {
            d
        }
    }
}
