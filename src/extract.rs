//! Level-set surface extraction
//!
//! Marching tetrahedra on a body-centered cubic lattice, run as two
//! data-parallel passes over the grid:
//!
//! 1. **Vertex pass** — enumerate the dense Morton range, evaluate the
//!    field at every grid vertex, emit one interpolated output vertex per
//!    surface-crossing owned edge, and insert the vertex record into the
//!    grid-vertex hash table.
//! 2. **Triangle pass** — walk the occupied table slots; each record owns
//!    the six tetrahedra around its diagonal edge and emits their triangles
//!    from the case tables.
//!
//! The driver sizes the table from a surface-area heuristic, detects
//! saturation after pass 1, and grows and retries until the extraction
//! fits. Because the outer padding layer of the grid is clamped to read as
//! outside, the output mesh is always closed — an interior that exceeds the
//! bounds is capped against the box faces.
//!
//! Author: Moroya Sakamoto

use crate::grid::{neighbor, next3, prev3, BccGrid};
use crate::morton;
use crate::table::{GridVert, HashTable, OPEN};
use crate::tables::{TET_TRI0, TET_TRI1};
use crate::types::{Aabb, Mesh};
use glam::{IVec3, IVec4, Vec3};
use log::debug;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use thiserror::Error;

/// Errors from degenerate extraction input
#[derive(Error, Debug)]
pub enum LevelSetError {
    /// Edge length must be a positive finite number
    #[error("edge length must be positive and finite, got {edge_length}")]
    InvalidEdgeLength {
        /// The rejected value
        edge_length: f32,
    },

    /// Bounds must have positive extent along every axis
    #[error("bounds are empty: min {min}, max {max}")]
    EmptyBounds {
        /// Minimum corner of the rejected box
        min: Vec3,
        /// Maximum corner of the rejected box
        max: Vec3,
    },
}

/// Configuration for level-set extraction
#[derive(Debug, Clone, Copy)]
pub struct LevelSetConfig {
    /// Approximate maximum output edge length; controls grid spacing
    pub edge_length: f32,
    /// Isovalue offset: positive insets the surface, negative outsets it
    pub level: f32,
    /// Odd probe stride for the grid-vertex hash table
    pub hash_step: u32,
}

impl Default for LevelSetConfig {
    fn default() -> Self {
        LevelSetConfig {
            edge_length: 0.1,
            level: 0.0,
            hash_step: 127,
        }
    }
}

impl LevelSetConfig {
    /// Config with the given edge length and default everything else
    pub fn new(edge_length: f32) -> Self {
        LevelSetConfig {
            edge_length,
            ..Default::default()
        }
    }
}

/// Fixed-capacity triple buffer for scatter writes from parallel passes.
///
/// A worker reserves a slot with a fetch-add and is then the only writer of
/// that slot; the buffer is drained after the pass barrier.
struct ScatterBuffer {
    data: Box<[[AtomicU32; 3]]>,
    len: AtomicU32,
}

impl ScatterBuffer {
    fn with_capacity(capacity: usize) -> Self {
        let data: Vec<[AtomicU32; 3]> = (0..capacity)
            .map(|_| [(); 3].map(|_| AtomicU32::new(0)))
            .collect();
        ScatterBuffer {
            data: data.into_boxed_slice(),
            len: AtomicU32::new(0),
        }
    }

    #[inline]
    fn push(&self, value: [u32; 3]) -> usize {
        let idx = self.len.fetch_add(1, Ordering::Relaxed) as usize;
        debug_assert!(idx < self.data.len());
        let slot = &self.data[idx];
        slot[0].store(value[0], Ordering::Relaxed);
        slot[1].store(value[1], Ordering::Relaxed);
        slot[2].store(value[2], Ordering::Relaxed);
        idx
    }

    #[inline]
    fn push_vec3(&self, v: Vec3) -> usize {
        self.push([v.x.to_bits(), v.y.to_bits(), v.z.to_bits()])
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed) as usize
    }

    fn into_positions(self) -> Vec<Vec3> {
        let len = self.len();
        self.data
            .iter()
            .take(len)
            .map(|s| {
                Vec3::new(
                    f32::from_bits(s[0].load(Ordering::Relaxed)),
                    f32::from_bits(s[1].load(Ordering::Relaxed)),
                    f32::from_bits(s[2].load(Ordering::Relaxed)),
                )
            })
            .collect()
    }

    fn into_triples(self) -> Vec<[u32; 3]> {
        let len = self.len();
        self.data
            .iter()
            .take(len)
            .map(|s| {
                [
                    s[0].load(Ordering::Relaxed),
                    s[1].load(Ordering::Relaxed),
                    s[2].load(Ordering::Relaxed),
                ]
            })
            .collect()
    }
}

/// Pass 1: per-Morton-code vertex extraction.
struct ComputeVerts<'a, F> {
    sdf: &'a F,
    grid: &'a BccGrid,
    level: f32,
    verts: &'a ScatterBuffer,
    table: &'a HashTable,
    /// Highest Morton code inserted so far; sizes the retry table.
    high_water: &'a AtomicU64,
}

impl<F: Fn(Vec3) -> f32 + Sync> ComputeVerts<'_, F> {
    /// Field value at a grid index, shifted by the isolevel and clamped so
    /// the padding layer reads as outside.
    #[inline]
    fn bounded_sdf(&self, index: IVec4) -> f32 {
        self.grid
            .clamp_to_bound(index, (self.sdf)(self.grid.position(index)) - self.level)
    }

    fn run(&self, code: u64) {
        if self.table.full() {
            return;
        }

        let index = morton::decode(code);
        if index.truncate().cmpgt(self.grid.bound).any() {
            return;
        }

        let position = self.grid.position(index);
        let mut vert = GridVert {
            key: code,
            distance: self.bounded_sdf(index),
            edge_verts: [-1; 7],
        };

        // The seven owned edges of this grid vertex; each one that crosses
        // the surface emits an interpolated output vertex.
        let mut keep = false;
        for i in 0..7 {
            let neighbor_index = neighbor(index, i);
            let val = self.bounded_sdf(neighbor_index);
            if (val > 0.0) == (vert.distance > 0.0) {
                continue;
            }
            keep = true;

            let crossing = (val * position - vert.distance * self.grid.position(neighbor_index))
                / (val - vert.distance);
            vert.edge_verts[i] = self.verts.push_vec3(crossing) as i32;
        }

        if keep {
            self.table.insert(&vert);
            self.high_water.fetch_max(code, Ordering::Relaxed);
        }
    }
}

/// Pass 2: per-table-slot triangle emission.
struct BuildTris<'a> {
    table: &'a HashTable,
    tris: &'a ScatterBuffer,
}

impl BuildTris<'_> {
    #[inline]
    fn create_tri(&self, tri: [i32; 3], edges: &[i32; 6]) {
        if tri[0] < 0 {
            return;
        }
        let a = edges[tri[0] as usize];
        let b = edges[tri[1] as usize];
        let c = edges[tri[2] as usize];
        debug_assert!(
            a >= 0 && b >= 0 && c >= 0,
            "case table referenced an uncrossed edge"
        );
        self.tris.push([a as u32, b as u32, c as u32]);
    }

    /// Classify the four corner signs and emit this tetrahedron's triangles.
    #[inline]
    fn create_tris(&self, tet: IVec4, edges: &[i32; 6]) {
        let case = (tet.x > 0) as usize
            + ((tet.y > 0) as usize) * 2
            + ((tet.z > 0) as usize) * 4
            + ((tet.w > 0) as usize) * 8;
        self.create_tri(TET_TRI0[case], edges);
        self.create_tri(TET_TRI1[case], edges);
    }

    fn run(&self, idx: usize) {
        let base = self.table.at(idx);
        if base.key == OPEN {
            return;
        }

        let base_index = morton::decode(base.key);

        let mut lead_index = base_index;
        if lead_index.w == 0 {
            lead_index.w = 1;
        } else {
            lead_index += IVec4::ONE;
            lead_index.w = 0;
        }

        // This record owns the 6 tetrahedra surrounding its edge in the
        // (1,1,1) direction (edge 0). Corners and edges are carried from
        // one tetrahedron to the next so shared faces see identical data.
        let mut tet = IVec4::new(base.neighbor_inside(0), base.inside(), -2, -2);
        let mut this_index = base_index;
        this_index.x += 1;
        let mut this_vert = self.table.get(morton::encode(this_index));

        tet.z = base.neighbor_inside(1);
        for i in 0..3 {
            this_index = lead_index;
            this_index[prev3(i)] -= 1;
            // Morton codes take unsigned input, so the decrement needs a
            // negative check; out of grid means the empty boundary record.
            let next_vert = if this_index[prev3(i)] < 0 {
                GridVert::default()
            } else {
                self.table.get(morton::encode(this_index))
            };
            tet.w = base.neighbor_inside(prev3(i) + 4);

            let edges1 = [
                base.edge_verts[0],
                base.edge_verts[i + 1],
                next_vert.edge_verts[next3(i) + 4],
                next_vert.edge_verts[prev3(i) + 1],
                this_vert.edge_verts[i + 4],
                base.edge_verts[prev3(i) + 4],
            ];
            this_vert = next_vert;
            self.create_tris(tet, &edges1);

            this_index = base_index;
            this_index[next3(i)] += 1;
            let next_vert = self.table.get(morton::encode(this_index));
            tet.z = tet.w;
            tet.w = base.neighbor_inside(next3(i) + 1);

            let edges2 = [
                base.edge_verts[0],
                edges1[5],
                this_vert.edge_verts[i + 4],
                next_vert.edge_verts[next3(i) + 4],
                edges1[3],
                base.edge_verts[next3(i) + 1],
            ];
            this_vert = next_vert;
            self.create_tris(tet, &edges2);

            tet.z = tet.w;
        }
    }
}

/// Extract the level-set mesh of a signed-distance function.
///
/// Positive field values are inside, negative outside. The surface is
/// sampled on a body-centered cubic lattice over `bounds` and polygonized
/// with marching tetrahedra, which makes the result guaranteed 2-manifold:
/// closed, consistently outward-wound, every edge shared by exactly two
/// triangles. If the interior of the field extends past `bounds`, the mesh
/// is capped flush against the box in an egg-crate pattern that follows
/// the underlying grid.
///
/// The field must be defined over a slight dilation of `bounds` (one cell
/// beyond each face). It does not need to be a true distance — only the
/// sign matters for topology — but interpolated vertex placement is only
/// as good as the field values near the surface.
///
/// # Arguments
/// * `sdf` - The signed-distance function, evaluated in world space
/// * `bounds` - Axis-aligned extent of the sampling grid
/// * `config` - Edge length, isolevel and table tuning
///
/// # Returns
/// The extracted mesh, or an error for degenerate input.
///
/// # Example
/// ```
/// use levelset::prelude::*;
///
/// let mesh = level_set(
///     |p: Vec3| 1.0 - p.length(),
///     Aabb::new(Vec3::splat(-1.5), Vec3::splat(1.5)),
///     &LevelSetConfig::new(0.25),
/// )
/// .unwrap();
/// assert!(!mesh.is_empty());
/// ```
pub fn level_set<F>(sdf: F, bounds: Aabb, config: &LevelSetConfig) -> Result<Mesh, LevelSetError>
where
    F: Fn(Vec3) -> f32 + Sync,
{
    if !(config.edge_length > 0.0 && config.edge_length.is_finite()) {
        return Err(LevelSetError::InvalidEdgeLength {
            edge_length: config.edge_length,
        });
    }
    if bounds.is_empty() {
        return Err(LevelSetError::EmptyBounds {
            min: bounds.min,
            max: bounds.max,
        });
    }

    let dim = bounds.size();
    let grid_size = (dim / config.edge_length).as_ivec3().max(IVec3::ONE);
    let spacing = dim / grid_size.as_vec3();
    let bound = grid_size + IVec3::ONE;
    let max_morton = morton::encode(IVec4::new(bound.x, bound.y, bound.z, 1));
    let grid = BccGrid {
        origin: bounds.min,
        spacing,
        bound,
    };

    // Surface vertex count scales as the 2/3 power of the grid volume.
    let mut table_size = (2 * max_morton).min((10.0 * (max_morton as f64).powf(0.667)) as u64);

    let (table, vert_pos) = loop {
        let table = HashTable::new(table_size, config.hash_step);
        let verts = ScatterBuffer::with_capacity(table.size() * 7);
        let high_water = AtomicU64::new(0);
        let pass = ComputeVerts {
            sdf: &sdf,
            grid: &grid,
            level: config.level,
            verts: &verts,
            table: &table,
            high_water: &high_water,
        };
        (0..max_morton + 1)
            .into_par_iter()
            .for_each(|code| pass.run(code));

        if !table.full() {
            break (table, verts.into_positions());
        }

        // Saturated: estimate how far through the Morton range pass 1 got
        // before bailing, and invert that fraction to size the retry.
        let high = high_water.load(Ordering::Relaxed).max(1);
        let ratio = max_morton as f64 / high as f64;
        let requested = if ratio > 1000.0 {
            // Do not trust the ratio when the bail-out was this early.
            table_size * 2
        } else {
            (table_size as f64 * ratio) as u64
        };
        table_size = requested.max(table.size() as u64 * 2);
        debug!(
            "grid vertex table saturated at load {:.2}; retrying with {} slots",
            table.load_factor(),
            table_size
        );
    };

    // Worst case 12 triangles per grid vertex: 6 owned tetrahedra, 2 each.
    let tris = ScatterBuffer::with_capacity(table.entries() * 12);
    let pass = BuildTris {
        table: &table,
        tris: &tris,
    };
    (0..table.size())
        .into_par_iter()
        .for_each(|idx| pass.run(idx));

    let mesh = Mesh {
        vert_pos,
        tri_verts: tris.into_triples(),
    };
    debug!(
        "level set extracted: {} vertices, {} triangles ({} grid verts)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        table.entries()
    );
    Ok(mesh)
}
