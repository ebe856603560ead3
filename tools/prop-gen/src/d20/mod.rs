//! Twenty-sided die
//!
//! The die is a regular icosahedron with unshared vertices, numbered so that
//! opposite faces sum to 21, textured with a gilded atlas holding one cell per
//! face, and accompanied by twenty `Face_<n>` marker nodes.

pub mod atlas;
pub mod glyph;
pub mod markers;
pub mod pairing;

pub use atlas::{gilded_gold, AtlasLayout, CompositePass, CELL_MARGIN};
pub use glyph::{BitmapDigits, GlyphMask, GlyphRasterizer};
pub use markers::{marker_nodes, marker_quad, marker_transform};
pub use pairing::{assign_numbers, pair_antipodal, FacePair, FACE_COUNT};

use std::path::{Path, PathBuf};

use glam::Vec3;
use tracing::{debug, info};

use crate::config::D20Params;
use crate::error::Result;
use crate::mesh::{icosahedron, Mesh};
use crate::scene::{PbrMaterial, Scene};

pub const DIE_MATERIAL: &str = "D20_Gold";
pub const MARKER_MATERIAL: &str = "FaceMarker";
const TEXTURE_PREFIX: &str = "D20";

/// One face of the die
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRecord {
    pub index: usize,
    /// Corners, counter-clockwise from outside
    pub vertices: [Vec3; 3],
    /// Outward unit normal
    pub normal: Vec3,
    pub centroid: Vec3,
    /// Printed number, 1-20
    pub number: u8,
}

/// Built die: scene plus the numbered faces
#[derive(Clone, Debug)]
pub struct D20Asset {
    pub scene: Scene,
    pub faces: Vec<FaceRecord>,
}

impl D20Asset {
    /// Write `D20_<Map>.png` into `dir`
    pub fn export_textures(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.scene
            .export_material_textures(DIE_MATERIAL, dir, TEXTURE_PREFIX)
    }

    /// Face showing `number`
    pub fn face(&self, number: u8) -> Option<&FaceRecord> {
        self.faces.iter().find(|f| f.number == number)
    }
}

/// Icosahedron faces with their geometry and assigned numbers
pub fn face_records(radius: f32) -> Result<Vec<FaceRecord>> {
    let triangles = icosahedron(radius);
    let centroids: Vec<Vec3> = triangles
        .iter()
        .map(|[a, b, c]| (*a + *b + *c) / 3.0)
        .collect();
    let numbers = assign_numbers(&centroids)?;

    Ok(triangles
        .into_iter()
        .zip(centroids)
        .zip(numbers)
        .enumerate()
        .map(|(index, ((vertices, centroid), number))| {
            let [a, b, c] = vertices;
            FaceRecord {
                index,
                vertices,
                normal: (b - a).cross(c - a).normalize_or_zero(),
                centroid,
                number,
            }
        })
        .collect())
}

/// Die mesh with three unshared vertices per face, UV-mapped into the atlas
pub fn die_mesh(faces: &[FaceRecord], layout: &AtlasLayout) -> Mesh {
    let mut mesh = Mesh::with_capacity(faces.len() * 3, faces.len());
    for face in faces {
        let uvs = layout.face_uvs(face.index);
        let corners: Vec<u32> = face
            .vertices
            .iter()
            .zip(uvs)
            .map(|(p, uv)| mesh.push_vertex(*p, uv))
            .collect();
        mesh.push_triangle([corners[0], corners[1], corners[2]]);
    }
    mesh
}

/// Build the die with the built-in digit font
pub fn build_d20(params: &D20Params) -> Result<D20Asset> {
    build_d20_with(params, &BitmapDigits)
}

/// Build the die, rendering face labels with `glyphs`
pub fn build_d20_with(params: &D20Params, glyphs: &dyn GlyphRasterizer) -> Result<D20Asset> {
    params.validate()?;

    let faces = face_records(params.radius)?;
    let layout = AtlasLayout::new(params.atlas_size, params.cols, params.rows);
    let mesh = die_mesh(&faces, &layout);
    debug!(
        radius = params.radius,
        vertices = mesh.vertex_count(),
        "built die mesh"
    );

    let numbers: Vec<u8> = faces.iter().map(|f| f.number).collect();
    let textures = gilded_gold(&layout, &numbers, params.seed, glyphs);

    let mut scene = Scene::new("D20");
    let gold = scene.add_material(PbrMaterial::textured(DIE_MATERIAL, textures, 1.0));
    scene.add_object("D20", mesh, gold);

    let marker_material = scene.add_material(PbrMaterial::flat(MARKER_MATERIAL, [1.0, 0.0, 1.0, 1.0]));
    let quad = scene.add_mesh("FaceMarker", marker_quad(params.marker_size), marker_material);
    for (name, matrix) in marker_nodes(&faces, params.marker_offset) {
        scene.add_node(&name, quad, Some(matrix));
    }

    info!(
        atlas = params.atlas_size,
        seed = params.seed,
        triangles = scene.triangle_count(),
        "built d20"
    );
    Ok(D20Asset { scene, faces })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> D20Params {
        D20Params {
            atlas_size: 80,
            ..Default::default()
        }
    }

    #[test]
    fn test_face_records() {
        let faces = face_records(0.5).unwrap();
        assert_eq!(faces.len(), FACE_COUNT);
        for face in &faces {
            assert!((face.normal.length() - 1.0).abs() < 1e-5);
            assert!(face.normal.dot(face.centroid) > 0.0);
            let opposite = faces.iter().find(|f| f.number == 21 - face.number).unwrap();
            assert!(face.normal.dot(opposite.normal) <= -0.99);
        }
    }

    #[test]
    fn test_die_mesh_unshared_vertices() {
        let faces = face_records(0.5).unwrap();
        let layout = AtlasLayout::new(1024, 5, 4);
        let mesh = die_mesh(&faces, &layout);
        assert_eq!(mesh.vertex_count(), 60);
        assert_eq!(mesh.triangle_count(), 20);
        assert!(mesh.is_closed());
        assert_eq!(mesh.uvs()[3..6], layout.face_uvs(1));
    }

    #[test]
    fn test_build_d20_scene() {
        let die = build_d20(&small()).unwrap();
        let nodes = die.scene.nodes();
        assert_eq!(nodes.len(), 21);
        assert_eq!(nodes[0].name, "D20");
        assert_eq!(nodes[1].name, "Face_1");
        assert_eq!(nodes[20].name, "Face_20");
        // Markers share one mesh
        assert!(nodes[1..].iter().all(|n| n.mesh == nodes[1].mesh));
        assert_eq!(die.scene.triangle_count(), 20 + 20 * 2);
        assert!(die.face(20).is_some());
        assert!(die.face(21).is_none());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = D20Params {
            cols: 3,
            ..small()
        };
        assert!(build_d20(&params).is_err());
    }
}
