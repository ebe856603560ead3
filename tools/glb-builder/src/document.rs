//! GLTF document construction

use crate::material::PNG_MIME_TYPE;
use crate::{MeshAccessors, ViewIndex};
use gltf_json as json;
use gltf_json::validation::Checked::Valid;
use std::collections::BTreeMap;

/// Builder for complete GLTF documents
#[derive(Default)]
pub struct GltfBuilder {
    nodes: Vec<json::Node>,
    meshes: Vec<json::Mesh>,
    materials: Vec<json::Material>,
    images: Vec<json::Image>,
    textures: Vec<json::Texture>,
    scenes: Vec<json::Scene>,
    buffer_byte_length: u64,
}

/// Create a node instancing `mesh` at the origin
pub fn mesh_node(name: &str, mesh: u32) -> json::Node {
    json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: Some(json::Index::new(mesh)),
        name: Some(name.to_string()),
        rotation: None,
        scale: None,
        skin: None,
        translation: None,
        weights: None,
    }
}

/// Create a node instancing `mesh` under a column-major 4×4 transform
pub fn transformed_node(name: &str, mesh: u32, matrix: [f32; 16]) -> json::Node {
    json::Node {
        matrix: Some(matrix),
        ..mesh_node(name, mesh)
    }
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set buffer byte length (required before building)
    pub fn buffer_byte_length(mut self, length: u64) -> Self {
        self.buffer_byte_length = length;
        self
    }

    /// Add a node
    pub fn add_node(mut self, node: json::Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Get the current node count
    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Add an embedded PNG image and a texture sampling it
    pub fn add_texture_from_view(mut self, name: &str, view: ViewIndex) -> Self {
        self.images.push(json::Image {
            buffer_view: Some(view.as_json_index()),
            mime_type: Some(json::image::MimeType(PNG_MIME_TYPE.to_string())),
            name: Some(name.to_string()),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        });

        self.textures.push(json::Texture {
            name: Some(name.to_string()),
            sampler: None,
            source: json::Index::new(self.images.len() as u32 - 1),
            extensions: Default::default(),
            extras: Default::default(),
        });
        self
    }

    /// Get the index of the last added texture
    pub fn last_texture_index(&self) -> Option<u32> {
        (self.textures.len() as u32).checked_sub(1)
    }

    /// Add a material (see [`crate::MaterialBuilder`])
    pub fn add_material(mut self, material: json::Material) -> Self {
        self.materials.push(material);
        self
    }

    /// Get the index of the last added material
    pub fn last_material_index(&self) -> Option<u32> {
        (self.materials.len() as u32).checked_sub(1)
    }

    /// Add a mesh with a single triangle primitive
    pub fn add_mesh_from_accessors(
        mut self,
        name: &str,
        accessors: &MeshAccessors,
        material: Option<u32>,
    ) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            Valid(json::mesh::Semantic::Positions),
            accessors.positions.as_json_index(),
        );

        if let Some(normals) = accessors.normals {
            attributes.insert(
                Valid(json::mesh::Semantic::Normals),
                normals.as_json_index(),
            );
        }

        if let Some(uvs) = accessors.uvs {
            attributes.insert(
                Valid(json::mesh::Semantic::TexCoords(0)),
                uvs.as_json_index(),
            );
        }

        let primitive = json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: accessors.indices.map(|i| i.as_json_index()),
            material: material.map(json::Index::new),
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        };

        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives: vec![primitive],
            weights: None,
        });

        self
    }

    /// Get the index of the last added mesh
    pub fn last_mesh_index(&self) -> Option<u32> {
        (self.meshes.len() as u32).checked_sub(1)
    }

    /// Add a scene
    pub fn add_scene(mut self, name: &str, root_nodes: &[u32]) -> Self {
        self.scenes.push(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            nodes: root_nodes.iter().map(|n| json::Index::new(*n)).collect(),
        });
        self
    }

    /// Build final GLTF Root (requires buffer views and accessors from BufferBuilder)
    pub fn build(
        self,
        buffer_views: &[json::buffer::View],
        accessors: &[json::Accessor],
        generator: &str,
    ) -> json::Root {
        let buffers = if self.buffer_byte_length > 0 {
            vec![json::Buffer {
                byte_length: self.buffer_byte_length.into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            }]
        } else {
            Vec::new()
        };

        json::Root {
            accessors: accessors.to_vec(),
            animations: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(generator.to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers,
            buffer_views: buffer_views.to_vec(),
            cameras: Vec::new(),
            extensions: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            extras: Default::default(),
            images: self.images,
            materials: self.materials,
            meshes: self.meshes,
            nodes: self.nodes,
            samplers: Vec::new(),
            scene: if self.scenes.is_empty() {
                None
            } else {
                Some(json::Index::new(0))
            },
            scenes: self.scenes,
            skins: Vec::new(),
            textures: self.textures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferBuilder, MaterialBuilder, MeshBuilder};

    #[test]
    fn test_gltf_builder_basic() {
        let mut buffer = BufferBuilder::new();
        let mesh = MeshBuilder::new()
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]])
            .indices(&[0, 1, 2])
            .build(&mut buffer);

        let gltf = GltfBuilder::new()
            .buffer_byte_length(buffer.data().len() as u64)
            .add_mesh_from_accessors("Triangle", &mesh, None)
            .add_node(mesh_node("Triangle", 0))
            .add_scene("Scene", &[0]);

        let root = gltf.build(buffer.views(), buffer.accessors(), "test");

        assert_eq!(root.meshes.len(), 1);
        assert_eq!(root.scenes.len(), 1);
        assert_eq!(root.buffers.len(), 1);
        assert_eq!(root.asset.version, "2.0");
        assert!(root.meshes[0].primitives[0].material.is_none());
    }

    #[test]
    fn test_textured_material_wiring() {
        let mut buffer = BufferBuilder::new();
        let view = buffer.pack_image(&[0x89, b'P', b'N', b'G']);

        let gltf = GltfBuilder::new().add_texture_from_view("BaseColor", view);
        let texture = gltf.last_texture_index().unwrap();
        let gltf = gltf.add_material(
            MaterialBuilder::new("Textured")
                .base_color_texture(texture)
                .build(),
        );
        assert_eq!(gltf.last_material_index(), Some(0));

        let root = gltf
            .buffer_byte_length(buffer.data().len() as u64)
            .build(buffer.views(), buffer.accessors(), "test");

        assert_eq!(root.images.len(), 1);
        assert_eq!(root.textures.len(), 1);
        assert_eq!(root.textures[0].source.value(), 0);
        assert_eq!(
            root.images[0].mime_type.as_ref().map(|m| m.0.as_str()),
            Some(PNG_MIME_TYPE)
        );
    }

    #[test]
    fn test_transformed_node() {
        let mut matrix = [0.0; 16];
        for i in 0..4 {
            matrix[i * 5] = 1.0;
        }
        matrix[12] = 2.5;
        let node = transformed_node("Face_1", 3, matrix);
        assert_eq!(node.mesh.map(|m| m.value()), Some(3));
        assert_eq!(node.matrix.map(|m| m[12]), Some(2.5));
        assert!(node.translation.is_none());
        assert!(mesh_node("Plain", 0).matrix.is_none());
    }

    #[test]
    fn test_empty_indices() {
        let gltf = GltfBuilder::new();
        assert_eq!(gltf.last_mesh_index(), None);
        assert_eq!(gltf.last_texture_index(), None);
        assert_eq!(gltf.node_count(), 0);
    }
}
