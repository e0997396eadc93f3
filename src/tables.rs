//! Marching-tetrahedra case tables
//!
//! A tetrahedron is classified by the signs at its four corners into a
//! 4-bit case index. Each case yields zero, one, or two triangles whose
//! vertices are picked from the six tetrahedron edges; the entries are edge
//! indices into the caller's 6-element edge-vertex array and `-1` means no
//! triangle. The winding is chosen so every emitted triangle faces away
//! from the positive (interior) region, and the complement cases are exact
//! winding reversals, which is what makes faces shared between adjacent
//! tetrahedra come out edge-matched.

/// First triangle per case
pub const TET_TRI0: [[i32; 3]; 16] = [
    [-1, -1, -1],
    [0, 3, 4],
    [0, 1, 5],
    [1, 5, 3],
    [1, 4, 2],
    [1, 0, 3],
    [2, 5, 0],
    [5, 3, 2],
    [2, 3, 5],
    [0, 5, 2],
    [3, 0, 1],
    [2, 4, 1],
    [3, 5, 1],
    [5, 1, 0],
    [4, 3, 0],
    [-1, -1, -1],
];

/// Second triangle per case, present only for the two-triangle cases
pub const TET_TRI1: [[i32; 3]; 16] = [
    [-1, -1, -1],
    [-1, -1, -1],
    [-1, -1, -1],
    [3, 4, 1],
    [-1, -1, -1],
    [3, 2, 1],
    [0, 4, 2],
    [-1, -1, -1],
    [-1, -1, -1],
    [2, 4, 0],
    [1, 2, 3],
    [-1, -1, -1],
    [1, 4, 3],
    [-1, -1, -1],
    [-1, -1, -1],
    [-1, -1, -1],
];
