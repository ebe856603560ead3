//! Scene assembly and GLB serialization
//!
//! A [`Scene`] owns meshes, materials and the nodes that instance them. It is
//! written out through `glb-builder`: each mesh becomes one primitive with
//! positions, area-weighted normals, TEXCOORD_0 and u32 indices, and each
//! textured material embeds its four maps as PNG images.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use glam::Mat4;
use glb_builder::{
    assemble_glb, mesh_node, transformed_node, BufferBuilder, GltfBuilder, MaterialBuilder,
    MeshBuilder,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{PropError, Result};
use crate::mesh::Mesh;
use crate::texture::{encode_png, MaterialTextures};

/// `asset.generator` written into every document
const GENERATOR: &str = concat!("prop-gen ", env!("CARGO_PKG_VERSION"));

/// PBR metallic-roughness material
#[derive(Clone, Debug)]
pub struct PbrMaterial {
    pub name: String,
    pub base_color_factor: [f32; 4],
    /// Base color, normal, metal-rough and occlusion maps, if any
    pub textures: Option<MaterialTextures>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
}

impl PbrMaterial {
    /// Fully textured material; the maps carry the detail, so roughness stays 1
    pub fn textured(name: &str, textures: MaterialTextures, metallic_factor: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color_factor: [1.0; 4],
            textures: Some(textures),
            metallic_factor,
            roughness_factor: 1.0,
        }
    }

    /// Untextured material with a flat color
    pub fn flat(name: &str, base_color_factor: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color_factor,
            textures: None,
            metallic_factor: 0.0,
            roughness_factor: 1.0,
        }
    }
}

/// Mesh with its material
#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub name: String,
    pub mesh: Mesh,
    /// Index into [`Scene::materials`]
    pub material: usize,
}

/// Root node instancing one mesh
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Index into [`Scene::meshes`]
    pub mesh: usize,
    /// Local transform; `None` leaves the node at the origin
    pub matrix: Option<Mat4>,
}

/// Static prop scene
#[derive(Clone, Debug)]
pub struct Scene {
    pub name: String,
    materials: Vec<PbrMaterial>,
    meshes: Vec<SceneMesh>,
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            materials: Vec::new(),
            meshes: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Add a material and return its index
    pub fn add_material(&mut self, material: PbrMaterial) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a mesh without instancing it and return its index
    pub fn add_mesh(&mut self, name: &str, mesh: Mesh, material: usize) -> usize {
        debug_assert!(material < self.materials.len());
        self.meshes.push(SceneMesh {
            name: name.to_string(),
            mesh,
            material,
        });
        self.meshes.len() - 1
    }

    /// Instance an existing mesh
    pub fn add_node(&mut self, name: &str, mesh: usize, matrix: Option<Mat4>) {
        debug_assert!(mesh < self.meshes.len());
        self.nodes.push(SceneNode {
            name: name.to_string(),
            mesh,
            matrix,
        });
    }

    /// Add a mesh and a node of the same name at the origin
    pub fn add_object(&mut self, name: &str, mesh: Mesh, material: usize) -> usize {
        let index = self.add_mesh(name, mesh, material);
        self.add_node(name, index, None);
        index
    }

    pub fn materials(&self) -> &[PbrMaterial] {
        &self.materials
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn material(&self, name: &str) -> Option<&PbrMaterial> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.name == name).map(|m| &m.mesh)
    }

    /// Triangles drawn by all nodes, counting each instance
    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| self.meshes[n.mesh].mesh.triangle_count())
            .sum()
    }

    /// Write the four maps of material `name` as `<prefix>_<Map>.png`
    pub fn export_material_textures(
        &self,
        name: &str,
        dir: &Path,
        prefix: &str,
    ) -> Result<Vec<PathBuf>> {
        let textures = self
            .material(name)
            .and_then(|m| m.textures.as_ref())
            .ok_or_else(|| anyhow!("material `{name}` has no textures"))?;
        textures.export(dir, prefix)
    }

    /// PNG-encode every texture map, materials in order
    fn encode_textures(&self) -> Result<Vec<Option<Vec<Vec<u8>>>>> {
        self.materials
            .par_iter()
            .map(|material| {
                material
                    .textures
                    .as_ref()
                    .map(|set| {
                        set.maps()
                            .iter()
                            .map(|(_, map)| encode_png(map))
                            .collect::<Result<Vec<_>>>()
                    })
                    .transpose()
            })
            .collect()
    }

    /// Serialize to a GLB container
    pub fn to_glb(&self) -> Result<Vec<u8>> {
        let encoded = self.encode_textures()?;
        let mut buffer = BufferBuilder::new();
        let mut gltf = GltfBuilder::new();

        for (material, images) in self.materials.iter().zip(encoded) {
            let mut builder = MaterialBuilder::new(&material.name)
                .base_color_factor(material.base_color_factor)
                .metallic_factor(material.metallic_factor)
                .roughness_factor(material.roughness_factor);

            if let (Some(set), Some(images)) = (&material.textures, images) {
                let mut slots = [0u32; 4];
                for ((slot, (suffix, _)), png) in slots.iter_mut().zip(set.maps()).zip(&images) {
                    let view = buffer.pack_image(png);
                    gltf = gltf.add_texture_from_view(&format!("{}_{suffix}", material.name), view);
                    *slot = gltf
                        .last_texture_index()
                        .ok_or_else(|| anyhow!("texture for `{}` was not registered", material.name))?;
                }
                let [base, normal, metal_rough, occlusion] = slots;
                builder = builder
                    .base_color_texture(base)
                    .normal_texture(normal)
                    .metallic_roughness_texture(metal_rough)
                    .occlusion_texture(occlusion);
            }
            gltf = gltf.add_material(builder.build());
        }

        for entry in &self.meshes {
            let (positions, uvs, indices) = entry.mesh.to_arrays();
            let normals: Vec<[f32; 3]> = entry
                .mesh
                .vertex_normals()
                .iter()
                .map(|n| n.to_array())
                .collect();
            let accessors = MeshBuilder::new()
                .positions(&positions)
                .normals(&normals)
                .uvs(&uvs)
                .indices(&indices)
                .build(&mut buffer);
            gltf = gltf.add_mesh_from_accessors(&entry.name, &accessors, Some(entry.material as u32));
            debug!(
                mesh = %entry.name,
                vertices = positions.len(),
                triangles = indices.len() / 3,
                "packed mesh"
            );
        }

        for node in &self.nodes {
            let json_node = match node.matrix {
                Some(matrix) => transformed_node(&node.name, node.mesh as u32, matrix.to_cols_array()),
                None => mesh_node(&node.name, node.mesh as u32),
            };
            gltf = gltf.add_node(json_node);
        }

        let roots: Vec<u32> = (0..gltf.node_count()).collect();
        let root = gltf
            .add_scene(&self.name, &roots)
            .buffer_byte_length(buffer.data().len() as u64)
            .build(buffer.views(), buffer.accessors(), GENERATOR);

        let glb = assemble_glb(&root, buffer.data()).map_err(PropError::Export)?;
        debug!(bytes = glb.len(), nodes = self.nodes.len(), "assembled GLB");
        Ok(glb)
    }

    /// Serialize and write to `path`
    pub fn write_glb(&self, path: &Path) -> Result<()> {
        let glb = self.to_glb()?;
        std::fs::write(path, &glb)?;
        info!(
            path = %path.display(),
            bytes = glb.len(),
            triangles = self.triangle_count(),
            "wrote scene"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{cap, ProfileLoop};
    use crate::texture::Recipe;

    fn scene() -> Scene {
        let mut scene = Scene::new("Test");
        let brass = scene.add_material(PbrMaterial::textured(
            "Brass",
            Recipe::Brass.synthesize(8, 1),
            1.0,
        ));
        let marker = scene.add_material(PbrMaterial::flat("Marker", [1.0, 0.0, 1.0, 1.0]));

        let disc = cap(&ProfileLoop::circle(1.0, 6), 0.0, true);
        scene.add_object("Disc", disc.clone(), brass);
        let shared = scene.add_mesh("Tiny", disc, marker);
        scene.add_node("Tiny_1", shared, Some(Mat4::from_translation(glam::Vec3::Y)));
        scene.add_node("Tiny_2", shared, Some(Mat4::IDENTITY));
        scene
    }

    #[test]
    fn test_triangle_count_counts_instances() {
        let scene = scene();
        assert_eq!(scene.meshes().len(), 2);
        assert_eq!(scene.nodes().len(), 3);
        assert_eq!(scene.triangle_count(), 18);
    }

    #[test]
    fn test_lookup_by_name() {
        let scene = scene();
        assert!(scene.material("Brass").unwrap().textures.is_some());
        assert!(scene.material("Marker").unwrap().textures.is_none());
        assert_eq!(scene.mesh("Disc").unwrap().triangle_count(), 6);
        assert!(scene.mesh("Missing").is_none());
    }

    #[test]
    fn test_glb_parses() {
        let glb = scene().to_glb().unwrap();
        let gltf = gltf::Gltf::from_slice(&glb).unwrap();

        let names: Vec<_> = gltf.nodes().filter_map(|n| n.name()).collect();
        assert_eq!(names, ["Disc", "Tiny_1", "Tiny_2"]);
        assert_eq!(gltf.images().count(), 4);
        assert_eq!(gltf.textures().count(), 4);

        let brass = gltf.materials().next().unwrap();
        assert!(brass.normal_texture().is_some());
        assert!(brass.occlusion_texture().is_some());
        assert_eq!(brass.pbr_metallic_roughness().metallic_factor(), 1.0);

        let marker = gltf.materials().nth(1).unwrap();
        assert!(marker.pbr_metallic_roughness().base_color_texture().is_none());
        assert_eq!(
            marker.pbr_metallic_roughness().base_color_factor(),
            [1.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_missing_textures_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scene()
            .export_material_textures("Marker", dir.path(), "marker")
            .is_err());
        let written = scene()
            .export_material_textures("Brass", dir.path(), "metal")
            .unwrap();
        assert_eq!(written.len(), 4);
        assert!(dir.path().join("metal_AO.png").exists());
    }
}
