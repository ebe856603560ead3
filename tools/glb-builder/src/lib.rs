//! GLB/glTF scene assembly for the prop generators
//!
//! This library provides builder-pattern APIs for constructing GLB files:
//! - BufferBuilder: Pack vertex data and embedded images with automatic alignment
//! - MeshBuilder: Positions, normals, UVs and u32 indices for one primitive
//! - MaterialBuilder: PBR metallic-roughness materials referencing textures
//! - GltfBuilder: Top-level document (images, textures, materials, meshes, nodes, scenes)
//!
//! # Example
//!
//! ```no_run
//! use glb_builder::*;
//!
//! let mut buffer = BufferBuilder::new();
//! let mesh = MeshBuilder::new()
//!     .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]])
//!     .uvs(&[[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]])
//!     .indices(&[0, 1, 2])
//!     .build(&mut buffer);
//!
//! let material = MaterialBuilder::new("Flat").metallic_factor(0.0).build();
//! let gltf = GltfBuilder::new().add_material(material);
//! let material_index = gltf.last_material_index();
//! let gltf = gltf
//!     .add_mesh_from_accessors("Triangle", &mesh, material_index)
//!     .add_node(mesh_node("Triangle", 0))
//!     .add_scene("Scene", &[0])
//!     .buffer_byte_length(buffer.data().len() as u64);
//!
//! let root = gltf.build(buffer.views(), buffer.accessors(), "glb-builder");
//! let glb_bytes = assemble_glb(&root, buffer.data())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod buffer;
pub mod document;
pub mod material;
pub mod mesh;
pub mod utils;

pub use buffer::{AccessorIndex, BufferBuilder, ViewIndex};
pub use document::{mesh_node, transformed_node, GltfBuilder};
pub use material::{MaterialBuilder, PNG_MIME_TYPE};
pub use mesh::{MeshAccessors, MeshBuilder};
pub use utils::{align_buffer, assemble_glb, compute_bounds};

// Re-export commonly used gltf-json types
pub use gltf_json as json;
pub use gltf_json::validation::Checked::Valid;
