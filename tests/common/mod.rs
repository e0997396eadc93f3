//! Common test helpers for levelset integration tests
//!
//! Author: Moroya Sakamoto

use levelset::prelude::*;

// ============================================================================
// Standard test fields (positive inside, negative outside)
// ============================================================================

/// Sphere of the given radius at the origin
pub fn sphere(radius: f32) -> impl Fn(Vec3) -> f32 + Sync {
    move |p: Vec3| radius - p.length()
}

/// Axis-aligned cube with the given half-extent
pub fn cube(half_extent: f32) -> impl Fn(Vec3) -> f32 + Sync {
    move |p: Vec3| half_extent - p.abs().max_element()
}

/// Torus in the XY plane: major radius `major`, tube radius `minor`
pub fn torus(major: f32, minor: f32) -> impl Fn(Vec3) -> f32 + Sync {
    move |p: Vec3| {
        let ring = (p.x * p.x + p.y * p.y).sqrt() - major;
        minor - (ring * ring + p.z * p.z).sqrt()
    }
}

/// Union of two disjoint spheres on the X axis
pub fn two_spheres(offset: f32, radius: f32) -> impl Fn(Vec3) -> f32 + Sync {
    move |p: Vec3| {
        let a = radius - (p - Vec3::new(-offset, 0.0, 0.0)).length();
        let b = radius - (p - Vec3::new(offset, 0.0, 0.0)).length();
        a.max(b)
    }
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert every triangle index is in range.
#[allow(dead_code)]
pub fn assert_indices_in_range(mesh: &Mesh) {
    for (t, tri) in mesh.tri_verts.iter().enumerate() {
        for &v in tri {
            assert!(
                (v as usize) < mesh.vertex_count(),
                "triangle {} references vertex {} of {}",
                t,
                v,
                mesh.vertex_count()
            );
        }
    }
}

/// Assert the mesh is a closed 2-manifold with no degenerate triangles.
#[allow(dead_code)]
pub fn assert_closed_manifold(mesh: &Mesh) {
    let report = validate_mesh(mesh);
    assert!(
        report.is_manifold,
        "mesh is not a closed manifold:\n{report}"
    );
}

/// Assert triangle normals point away from the interior: at each triangle
/// centroid, stepping along the normal must decrease the field.
#[allow(dead_code)]
pub fn assert_outward_normals<F: Fn(Vec3) -> f32>(mesh: &Mesh, sdf: F, step: f32) {
    let mut checked = 0;
    for tri in &mesh.tri_verts {
        let v0 = mesh.vert_pos[tri[0] as usize];
        let v1 = mesh.vert_pos[tri[1] as usize];
        let v2 = mesh.vert_pos[tri[2] as usize];

        let normal = (v1 - v0).cross(v2 - v0);
        if normal.length_squared() < 1e-10 {
            continue; // skip slivers; degeneracy is checked elsewhere
        }
        let normal = normal.normalize();
        let centroid = (v0 + v1 + v2) / 3.0;

        let ahead = sdf(centroid + normal * step);
        let behind = sdf(centroid - normal * step);
        assert!(
            ahead < behind,
            "normal at centroid {centroid} points into the interior (ahead={ahead}, behind={behind})"
        );
        checked += 1;
    }
    assert!(checked > 0, "no triangles with usable normals");
}

/// Largest absolute deviation of any vertex from the sphere of `radius`
/// around `center`.
#[allow(dead_code)]
pub fn max_sphere_deviation(mesh: &Mesh, center: Vec3, radius: f32) -> f32 {
    mesh.vert_pos
        .iter()
        .map(|v| ((*v - center).length() - radius).abs())
        .fold(0.0, f32::max)
}
