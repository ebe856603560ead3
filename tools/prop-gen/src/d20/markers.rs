//! Face marker nodes
//!
//! Each face gets a tiny quad floating just above its centroid with local +Z
//! turned onto the face normal, so downstream tools can read which number is
//! up from the node transforms alone.

use glam::{Mat4, Quat, Vec2, Vec3};

use super::FaceRecord;
use crate::mesh::Mesh;

/// Square of edge `size` in the local XY plane, facing +Z
pub fn marker_quad(size: f32) -> Mesh {
    let h = size * 0.5;
    let mut mesh = Mesh::with_capacity(4, 2);
    for (p, uv) in [
        (Vec3::new(-h, -h, 0.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(h, -h, 0.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(h, h, 0.0), Vec2::new(1.0, 1.0)),
        (Vec3::new(-h, h, 0.0), Vec2::new(0.0, 1.0)),
    ] {
        mesh.push_vertex(p, uv);
    }
    mesh.push_triangle([0, 1, 2]);
    mesh.push_triangle([0, 2, 3]);
    mesh
}

/// Node transform placing a marker over `face`
pub fn marker_transform(face: &FaceRecord, offset: f32) -> Mat4 {
    let rotation = Quat::from_rotation_arc(Vec3::Z, face.normal);
    Mat4::from_rotation_translation(rotation, face.centroid + face.normal * offset)
}

/// `Face_<number>` name and transform for every face, in number order
pub fn marker_nodes(faces: &[FaceRecord], offset: f32) -> Vec<(String, Mat4)> {
    let mut ordered: Vec<&FaceRecord> = faces.iter().collect();
    ordered.sort_by_key(|f| f.number);
    ordered
        .into_iter()
        .map(|f| (format!("Face_{}", f.number), marker_transform(f, offset)))
        .collect()
}
