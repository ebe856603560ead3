//! Solid assembly from profile loops
//!
//! Each operation returns a standalone [`Mesh`]; composite solids are built by
//! merging parts. Quads and fans use unshared vertices per part so every part
//! carries its own UV projection.

use glam::{Vec2, Vec3};

use super::{Mesh, ProfileLoop};

/// Guards UV scale divisions against flat or point-sized extents
const UV_EPSILON: f32 = 1.0e-12;

/// Cylindrical projection: u from the angle around +Y, v from normalized height
fn cylindrical_uvs(points: &[Vec3]) -> Vec<Vec2> {
    let (y_min, y_max) = points
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let span = y_max - y_min + UV_EPSILON;

    points
        .iter()
        .map(|p| {
            let u = (p.z.atan2(p.x) / std::f32::consts::TAU).rem_euclid(1.0);
            Vec2::new(u, (p.y - y_min) / span)
        })
        .collect()
}

/// Planar projection of the XZ plane onto [0, 1]² around `centre`
fn planar_uv(p: Vec3, centre: Vec3, extent: f32) -> Vec2 {
    let scale = 2.0 * extent + UV_EPSILON;
    Vec2::new(0.5 + (p.x - centre.x) / scale, 0.5 + (p.z - centre.z) / scale)
}

/// Largest |dx| or |dz| from `centre` over the loop
fn extent_about(profile: &ProfileLoop, centre: Vec3) -> f32 {
    profile.points().iter().fold(0.0f32, |m, p| {
        m.max((p.x - centre.x).abs()).max((p.z - centre.z).abs())
    })
}

/// Loft a quad strip between two loops with matching point counts
///
/// Quad `i` is `(b_i, b_i+1, t_i+1, t_i)`; with counter-clockwise loops and
/// `top` above `bottom` the wall faces outward.
pub fn wall(bottom: &ProfileLoop, top: &ProfileLoop) -> Mesh {
    debug_assert_eq!(bottom.len(), top.len());
    let (b, t) = (bottom.points(), top.points());
    let n = b.len().min(t.len());

    let mut quads = Vec::with_capacity(n * 4);
    for i in 0..n {
        let j = (i + 1) % n;
        quads.extend_from_slice(&[b[i], b[j], t[j], t[i]]);
    }

    let mut uvs = cylindrical_uvs(&quads);
    for quad in uvs.chunks_mut(4) {
        // Keep quads that straddle the u seam contiguous
        let (lo, hi) = quad
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), uv| (lo.min(uv.x), hi.max(uv.x)));
        if hi - lo > 0.5 {
            for uv in quad.iter_mut().filter(|uv| uv.x < 0.5) {
                uv.x += 1.0;
            }
        }
    }

    let mut mesh = Mesh::with_capacity(n * 4, n * 2);
    for (q, (corners, uv)) in quads.chunks(4).zip(uvs.chunks(4)).enumerate() {
        for (p, uv) in corners.iter().zip(uv) {
            mesh.push_vertex(*p, *uv);
        }
        let base = (q * 4) as u32;
        mesh.push_triangle([base, base + 1, base + 2]);
        mesh.push_triangle([base, base + 2, base + 3]);
    }
    mesh
}

/// Fan-triangulate a convex loop at height `y` around its centroid
///
/// `up` selects a +Y facing cap; otherwise the cap faces -Y.
pub fn cap(profile: &ProfileLoop, y: f32, up: bool) -> Mesh {
    let ring = profile.at_height(y);
    let c = ring.centroid();
    let centre = Vec3::new(c.x, y, c.z);
    let extent = extent_about(&ring, centre);
    let n = ring.len() as u32;

    let mut mesh = Mesh::with_capacity(ring.len() + 1, ring.len());
    let c = mesh.push_vertex(centre, Vec2::splat(0.5));
    for p in ring.points() {
        mesh.push_vertex(*p, planar_uv(*p, centre, extent));
    }
    for i in 0..n {
        let (a, b) = (i + 1, (i + 1) % n + 1);
        if up {
            mesh.push_triangle([c, a, b]);
        } else {
            mesh.push_triangle([c, b, a]);
        }
    }
    mesh
}

/// Flat annulus between two loops at height `y`, facing +Y
///
/// Quad `i` is `(o_i, o_i+1, i_i+1, i_i)`; UVs are planar over the outer loop.
pub fn ring(outer: &ProfileLoop, inner: &ProfileLoop, y: f32) -> Mesh {
    debug_assert_eq!(outer.len(), inner.len());
    let outer = outer.at_height(y);
    let inner = inner.at_height(y);
    let (o, inn) = (outer.points(), inner.points());
    let n = o.len().min(inn.len());

    let centre = outer.centroid();
    let extent = extent_about(&outer, centre);

    let mut mesh = Mesh::with_capacity(n * 4, n * 2);
    for i in 0..n {
        let j = (i + 1) % n;
        let base = mesh.vertex_count() as u32;
        for p in [o[i], o[j], inn[j], inn[i]] {
            mesh.push_vertex(p, planar_uv(p, centre, extent));
        }
        mesh.push_triangle([base, base + 1, base + 2]);
        mesh.push_triangle([base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::rounded_octagon;

    fn face_normal(mesh: &Mesh, t: usize) -> Vec3 {
        let [a, b, c] = mesh.triangle_positions(t).unwrap();
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_wall_faces_outward() {
        let profile = rounded_octagon(1.0, 0.1, 2);
        let mesh = wall(&profile.at_height(0.0), &profile.at_height(0.5));

        assert_eq!(mesh.triangle_count(), 2 * profile.len());
        assert_eq!(mesh.uvs().len(), mesh.vertex_count());
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle_positions(t).unwrap();
            let mid = (a + b + c) / 3.0;
            let radial = Vec3::new(mid.x, 0.0, mid.z).normalize();
            assert!(face_normal(&mesh, t).dot(radial) > 0.5);
        }
    }

    #[test]
    fn test_wall_uv_range() {
        let profile = ProfileLoop::circle(1.0, 16);
        let mesh = wall(&profile.at_height(1.0), &profile.at_height(3.0));
        for uv in mesh.uvs() {
            assert!((0.0..=1.0).contains(&uv.y));
            assert!((0.0..1.5).contains(&uv.x));
        }
        // No quad spans more than half the texture horizontally
        for quad in mesh.uvs().chunks(4) {
            let lo = quad.iter().map(|uv| uv.x).fold(f32::MAX, f32::min);
            let hi = quad.iter().map(|uv| uv.x).fold(f32::MIN, f32::max);
            assert!(hi - lo <= 0.5);
        }
    }

    #[test]
    fn test_cap_orientation() {
        let profile = rounded_octagon(1.0, 0.1, 3);
        let up = cap(&profile, 0.2, true);
        let down = cap(&profile, 0.0, false);

        assert_eq!(up.triangle_count(), profile.len());
        assert_eq!(up.vertex_count(), profile.len() + 1);
        for t in 0..up.triangle_count() {
            assert!(face_normal(&up, t).abs_diff_eq(Vec3::Y, 1e-4));
            assert!(face_normal(&down, t).abs_diff_eq(-Vec3::Y, 1e-4));
        }
        assert_eq!(up.uvs()[0], Vec2::splat(0.5));
        assert!(up.positions().iter().all(|p| p.y == 0.2));
    }

    #[test]
    fn test_cap_planar_uvs_span_unit_square() {
        let profile = ProfileLoop::circle(3.0, 4).translated(Vec3::new(5.0, 0.0, 5.0));
        let mesh = cap(&profile, 1.0, true);
        let us: Vec<f32> = mesh.uvs().iter().map(|uv| uv.x).collect();
        let lo = us.iter().copied().fold(f32::MAX, f32::min);
        let hi = us.iter().copied().fold(f32::MIN, f32::max);
        assert!(lo.abs() < 1e-4);
        assert!((hi - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_faces_up() {
        let outer = rounded_octagon(1.55, 0.18, 3);
        let inner = outer.scaled(1.2 / 1.55);
        let mesh = ring(&outer, &inner, 0.6);

        assert_eq!(mesh.triangle_count(), 2 * outer.len());
        for t in 0..mesh.triangle_count() {
            assert!(face_normal(&mesh, t).abs_diff_eq(Vec3::Y, 1e-4));
        }
        for uv in mesh.uvs() {
            assert!((-1e-4..=1.0001).contains(&uv.x));
            assert!((-1e-4..=1.0001).contains(&uv.y));
        }
    }

    #[test]
    fn test_capped_cylinder_is_closed() {
        let profile = ProfileLoop::circle(0.5, 12);
        let solid = Mesh::merge([
            &wall(&profile.at_height(0.0), &profile.at_height(1.0)),
            &cap(&profile, 1.0, true),
            &cap(&profile, 0.0, false),
        ]);
        assert!(solid.is_closed());
        assert_eq!(solid.triangle_count(), 4 * 12);

        // Flipping one cap breaks edge pairing
        let broken = Mesh::merge([
            &wall(&profile.at_height(0.0), &profile.at_height(1.0)),
            &cap(&profile, 1.0, false),
            &cap(&profile, 0.0, false),
        ]);
        assert!(!broken.is_closed());
    }
}
