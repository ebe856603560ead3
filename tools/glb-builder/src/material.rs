//! PBR metallic-roughness material construction

use gltf_json as json;
use gltf_json::validation::Checked::Valid;

/// MIME type for embedded PNG images
pub const PNG_MIME_TYPE: &str = "image/png";

/// Builder for a glTF PBR metallic-roughness material
///
/// Texture arguments are indices into the document's texture array
/// (see [`crate::GltfBuilder::last_texture_index`]).
pub struct MaterialBuilder {
    name: String,
    base_color_factor: [f32; 4],
    metallic_factor: f32,
    roughness_factor: f32,
    base_color_texture: Option<u32>,
    normal_texture: Option<u32>,
    metallic_roughness_texture: Option<u32>,
    occlusion_texture: Option<u32>,
    double_sided: bool,
}

fn texture_info(index: u32) -> json::texture::Info {
    json::texture::Info {
        index: json::Index::new(index),
        tex_coord: 0,
        extensions: Default::default(),
        extras: Default::default(),
    }
}

impl MaterialBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
            normal_texture: None,
            metallic_roughness_texture: None,
            occlusion_texture: None,
            double_sided: false,
        }
    }

    pub fn base_color_factor(mut self, factor: [f32; 4]) -> Self {
        self.base_color_factor = factor;
        self
    }

    /// Multiplier for the metallic (blue) channel
    pub fn metallic_factor(mut self, factor: f32) -> Self {
        self.metallic_factor = factor;
        self
    }

    /// Multiplier for the roughness (green) channel
    pub fn roughness_factor(mut self, factor: f32) -> Self {
        self.roughness_factor = factor;
        self
    }

    pub fn base_color_texture(mut self, texture: u32) -> Self {
        self.base_color_texture = Some(texture);
        self
    }

    pub fn normal_texture(mut self, texture: u32) -> Self {
        self.normal_texture = Some(texture);
        self
    }

    /// Packed texture: G = roughness, B = metallic
    pub fn metallic_roughness_texture(mut self, texture: u32) -> Self {
        self.metallic_roughness_texture = Some(texture);
        self
    }

    pub fn occlusion_texture(mut self, texture: u32) -> Self {
        self.occlusion_texture = Some(texture);
        self
    }

    pub fn double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn build(self) -> json::Material {
        let pbr = json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor(self.base_color_factor),
            base_color_texture: self.base_color_texture.map(texture_info),
            metallic_factor: json::material::StrengthFactor(self.metallic_factor),
            roughness_factor: json::material::StrengthFactor(self.roughness_factor),
            metallic_roughness_texture: self.metallic_roughness_texture.map(texture_info),
            extensions: Default::default(),
            extras: Default::default(),
        };

        json::Material {
            name: Some(self.name),
            alpha_mode: Valid(json::material::AlphaMode::Opaque),
            double_sided: self.double_sided,
            pbr_metallic_roughness: pbr,
            normal_texture: self.normal_texture.map(|index| json::material::NormalTexture {
                index: json::Index::new(index),
                scale: 1.0,
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            occlusion_texture: self.occlusion_texture.map(|index| {
                json::material::OcclusionTexture {
                    index: json::Index::new(index),
                    strength: json::material::StrengthFactor(1.0),
                    tex_coord: 0,
                    extensions: Default::default(),
                    extras: Default::default(),
                }
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untextured_material() {
        let material = MaterialBuilder::new("Marker")
            .base_color_factor([1.0, 0.0, 1.0, 1.0])
            .metallic_factor(0.0)
            .build();

        assert_eq!(material.name.as_deref(), Some("Marker"));
        assert!(material.pbr_metallic_roughness.base_color_texture.is_none());
        assert!(material.normal_texture.is_none());
        assert_eq!(material.pbr_metallic_roughness.metallic_factor.0, 0.0);
        assert_eq!(
            material.pbr_metallic_roughness.base_color_factor.0,
            [1.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_full_texture_set() {
        let material = MaterialBuilder::new("Wood")
            .base_color_texture(0)
            .normal_texture(1)
            .metallic_roughness_texture(2)
            .occlusion_texture(3)
            .build();

        let pbr = &material.pbr_metallic_roughness;
        assert_eq!(pbr.base_color_texture.as_ref().unwrap().index.value(), 0);
        assert_eq!(
            pbr.metallic_roughness_texture.as_ref().unwrap().index.value(),
            2
        );
        assert_eq!(material.normal_texture.as_ref().unwrap().index.value(), 1);
        assert_eq!(material.occlusion_texture.as_ref().unwrap().index.value(), 3);
        assert!(!material.double_sided);
    }
}
