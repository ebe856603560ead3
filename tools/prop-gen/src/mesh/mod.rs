//! Mesh construction
//!
//! [`Mesh`] keeps positions, UVs and triangles behind one interface so the
//! vertex and UV arrays cannot drift apart. Profiles are lofted into solids
//! by the [`solid`] operations and merged with [`Mesh::merge`].

pub mod icosahedron;
pub mod profile;
pub mod solid;

pub use icosahedron::icosahedron;
pub use profile::{rounded_octagon, rounded_octagon_points, ProfileLoop};
pub use solid::{cap, ring, wall};

use std::collections::HashMap;

use glam::{Vec2, Vec3};

/// Indexed triangle mesh with one UV per vertex
///
/// Triangles wind counter-clockwise when seen from their front side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3, uv: Vec2) -> u32 {
        self.positions.push(position);
        self.uvs.push(uv);
        self.positions.len() as u32 - 1
    }

    /// Append a triangle
    ///
    /// # Panics
    /// Panics if any index does not refer to an existing vertex.
    pub fn push_triangle(&mut self, triangle: [u32; 3]) {
        let count = self.vertex_count();
        assert!(
            triangle.iter().all(|&i| (i as usize) < count),
            "triangle {triangle:?} references a vertex outside 0..{count}"
        );
        self.triangles.push(triangle);
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Corner positions of triangle `index`, if it exists
    pub fn triangle_positions(&self, index: usize) -> Option<[Vec3; 3]> {
        self.triangles
            .get(index)
            .map(|t| t.map(|i| self.positions[i as usize]))
    }

    /// Append another mesh, offsetting its indices by the current vertex count
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.uvs.extend_from_slice(&other.uvs);
        self.triangles
            .extend(other.triangles.iter().map(|t| t.map(|i| i + offset)));
    }

    /// Concatenate parts into a single mesh
    pub fn merge<'a, I>(parts: I) -> Mesh
    where
        I: IntoIterator<Item = &'a Mesh>,
    {
        let mut merged = Mesh::new();
        for part in parts {
            merged.append(part);
        }
        merged
    }

    /// Reverse the winding of every triangle
    pub fn flip_winding(mut self) -> Self {
        for t in &mut self.triangles {
            t.swap(1, 2);
        }
        self
    }

    /// Move every vertex by `offset`
    pub fn translate(mut self, offset: Vec3) -> Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    /// Unnormalized face normal of triangle `t` (length = twice its area)
    fn face_cross(&self, t: &[u32; 3]) -> Vec3 {
        let [a, b, c] = t.map(|i| self.positions[i as usize]);
        (b - a).cross(c - a)
    }

    /// Area-weighted vertex normals
    ///
    /// Vertices with no (or only degenerate) adjacent triangles get +Y.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for t in &self.triangles {
            let n = self.face_cross(t);
            for &i in t {
                normals[i as usize] += n;
            }
        }
        normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect()
    }

    /// True when every edge is shared by exactly two triangles with opposite
    /// winding, comparing vertices by position
    pub fn is_closed(&self) -> bool {
        // Quantize so coincident vertices from different parts weld
        let key = |i: u32| {
            let p = self.positions[i as usize] * 1.0e4;
            (p.x.round() as i64, p.y.round() as i64, p.z.round() as i64)
        };

        let mut edges: HashMap<_, i32> = HashMap::new();
        for t in &self.triangles {
            for k in 0..3 {
                let (a, b) = (key(t[k]), key(t[(k + 1) % 3]));
                if a == b {
                    continue;
                }
                *edges.entry((a, b)).or_default() += 1;
            }
        }

        !edges.is_empty()
            && edges
                .iter()
                .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
    }

    /// Flattened arrays for GPU-style export: positions, UVs, u32 indices
    pub fn to_arrays(&self) -> (Vec<[f32; 3]>, Vec<[f32; 2]>, Vec<u32>) {
        (
            self.positions.iter().map(|p| p.to_array()).collect(),
            self.uvs.iter().map(|uv| uv.to_array()).collect(),
            self.triangles.iter().flatten().copied().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0));
        let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0));
        let c = mesh.push_vertex(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0));
        let d = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0));
        mesh.push_triangle([a, b, c]);
        mesh.push_triangle([a, c, d]);
        mesh
    }

    #[test]
    fn test_push_and_access() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.uvs().len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(
            mesh.triangle_positions(1).unwrap()[2],
            Vec3::new(0.0, 1.0, 0.0)
        );
        assert!(mesh.triangle_positions(2).is_none());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_push_triangle_rejects_bad_index() {
        let mut mesh = quad();
        mesh.push_triangle([0, 1, 4]);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let a = quad();
        let b = quad().translate(Vec3::Z);
        let merged = Mesh::merge([&a, &b]);

        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.uvs().len(), merged.vertex_count());
        assert_eq!(merged.triangles()[2], [4, 5, 6]);
        assert!(merged
            .triangles()
            .iter()
            .flatten()
            .all(|&i| (i as usize) < merged.vertex_count()));
    }

    #[test]
    fn test_flip_winding_reverses_normals() {
        let mesh = quad();
        assert!(mesh.vertex_normals()[0].abs_diff_eq(Vec3::Z, 1e-6));
        let flipped = mesh.flip_winding();
        assert_eq!(flipped.triangles()[0], [0, 2, 1]);
        assert!(flipped.vertex_normals()[0].abs_diff_eq(-Vec3::Z, 1e-6));
    }

    #[test]
    fn test_open_quad_is_not_closed() {
        assert!(!quad().is_closed());
        assert!(!Mesh::new().is_closed());
    }

    #[test]
    fn test_to_arrays() {
        let (positions, uvs, indices) = quad().to_arrays();
        assert_eq!(positions.len(), 4);
        assert_eq!(uvs[2], [1.0, 1.0]);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }
}
