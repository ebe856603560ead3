//! Material recipes producing co-registered PBR texture sets
//!
//! Each recipe turns a seed into four square maps: base color, tangent-space
//! normal, packed metallic-roughness (G = roughness, B = metallic) and ambient
//! occlusion. Signals stay in floating point until the final quantization.

use tracing::{debug, warn};

use super::{block_noise, normal_map, to_byte, Field, PixelFormat, TextureBuffer};

/// Four co-registered maps for one PBR material
#[derive(Clone, Debug)]
pub struct MaterialTextures {
    pub base_color: TextureBuffer,
    pub normal: TextureBuffer,
    /// R unused, G = roughness, B = metallic
    pub metal_rough: TextureBuffer,
    pub ambient_occlusion: TextureBuffer,
}

impl MaterialTextures {
    /// The maps as `(suffix, buffer)` pairs in export order
    pub fn maps(&self) -> [(&'static str, &TextureBuffer); 4] {
        [
            ("BaseColor", &self.base_color),
            ("Normal", &self.normal),
            ("MetalRough", &self.metal_rough),
            ("AO", &self.ambient_occlusion),
        ]
    }

    /// True when all four maps share one size
    pub fn is_coregistered(&self) -> bool {
        self.maps()
            .iter()
            .all(|(_, map)| map.same_size(&self.base_color))
    }
}

/// Texture recipe selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipe {
    /// Dark walnut with sinusoidal grain
    Wood,
    /// Speckled felt in the given sRGB hue
    Felt { color: [u8; 3] },
    /// Dull brass for studs
    Brass,
}

impl Recipe {
    /// Synthesize a `size × size` texture set
    pub fn synthesize(self, size: u32, seed: u64) -> MaterialTextures {
        if !size.is_power_of_two() {
            warn!(size, "texture size is not a power of two");
        }
        debug!(recipe = ?self, size, seed, "synthesizing material");
        match self {
            Recipe::Wood => wood(size, seed),
            Recipe::Felt { color } => felt(size, seed, color),
            Recipe::Brass => brass(size, seed),
        }
    }
}

/// Quantize three channel fields into an RGB texture
pub(crate) fn rgb_texture(r: &Field, g: &Field, b: &Field) -> TextureBuffer {
    let pixels = r
        .data()
        .iter()
        .zip(g.data())
        .zip(b.data())
        .flat_map(|((&r, &g), &b)| [to_byte(r), to_byte(g), to_byte(b)])
        .collect();
    TextureBuffer {
        width: r.width,
        height: r.height,
        format: PixelFormat::Rgb,
        pixels,
    }
}

/// Pack roughness into G and a constant metallic into B
pub(crate) fn pack_metal_rough(roughness: &Field, metallic: f32) -> TextureBuffer {
    let metal = to_byte(metallic);
    let pixels = roughness
        .data()
        .iter()
        .flat_map(|&r| [0, to_byte(r), metal])
        .collect();
    TextureBuffer {
        width: roughness.width,
        height: roughness.height,
        format: PixelFormat::Rgb,
        pixels,
    }
}

/// Generate dark walnut-like wood
///
/// Two noise fields (blocks 10 and 26) are averaged; vertical stripes
/// `0.5 + 0.5·sin((28x + 2n)π)` are perturbed by the noise of the first row
/// and blended 55/45 with the noise into the grain signal.
pub fn wood(size: u32, seed: u64) -> MaterialTextures {
    let n1 = block_noise(size, size, 10, seed);
    let n2 = block_noise(size, size, 26, seed + 13);
    let n = n1.zip_with(&n2, |a, b| (a + b) * 0.5);

    let span = (size.max(2) - 1) as f32;
    let stripes: Vec<f32> = (0..size)
        .map(|x| {
            let t = x as f32 / span;
            0.5 + 0.5 * ((t * 28.0 + n.get(x, 0) * 2.0) * std::f32::consts::PI).sin()
        })
        .collect();

    let grain = Field::from_fn(size, size, |x, y| {
        (0.55 * stripes[x as usize] + 0.45 * n.get(x, y)).clamp(0.0, 1.0)
    });

    let base_color = rgb_texture(
        &grain.map(|g| 0.30 + 0.20 * g),
        &grain.map(|g| 0.17 + 0.14 * g),
        &grain.map(|g| 0.09 + 0.10 * g),
    );
    let normal = normal_map(&grain.gaussian_blur(1.0), 6.0);
    let rough = n.map(|v| (0.55 + 0.25 * (v - 0.5)).clamp(0.35, 0.85));
    let ao = n.map(|v| (0.90 - 0.10 * (v - 0.5)).clamp(0.75, 1.0));

    MaterialTextures {
        base_color,
        normal,
        metal_rough: pack_metal_rough(&rough, 0.0),
        ambient_occlusion: ao.to_luma(),
    }
}

/// Generate felt with power-curved speckle over `color`
pub fn felt(size: u32, seed: u64, color: [u8; 3]) -> MaterialTextures {
    let n = block_noise(size, size, 6, seed);
    let speck = n.map(|v| v.powf(1.4));
    let variation = speck.map(|s| (0.85 + 0.30 * (s - 0.5)).clamp(0.6, 1.15));

    let hue = color.map(|c| c as f32 / 255.0);
    let base_color = rgb_texture(
        &variation.map(|v| hue[0] * v),
        &variation.map(|v| hue[1] * v),
        &variation.map(|v| hue[2] * v),
    );
    let normal = normal_map(&speck.gaussian_blur(0.6), 2.5);
    let rough = n.map(|v| (0.88 + 0.08 * (v - 0.5)).clamp(0.78, 0.95));
    let ao = n.map(|v| (0.95 - 0.08 * (v - 0.5)).clamp(0.85, 1.0));

    MaterialTextures {
        base_color,
        normal,
        metal_rough: pack_metal_rough(&rough, 0.0),
        ambient_occlusion: ao.to_luma(),
    }
}

/// Generate dull brass
pub fn brass(size: u32, seed: u64) -> MaterialTextures {
    let n = block_noise(size, size, 12, seed);

    let base_color = rgb_texture(
        &n.map(|v| 0.70 + 0.10 * (v - 0.5)),
        &n.map(|v| 0.56 + 0.08 * (v - 0.5)),
        &n.map(|v| 0.26 + 0.06 * (v - 0.5)),
    );
    let normal = normal_map(&n.gaussian_blur(1.2), 1.5);
    let rough = n.map(|v| (0.42 + 0.18 * (v - 0.5)).clamp(0.30, 0.65));
    let ao = n.map(|v| (0.98 - 0.05 * (v - 0.5)).clamp(0.90, 1.0));

    MaterialTextures {
        base_color,
        normal,
        metal_rough: pack_metal_rough(&rough, 1.0),
        ambient_occlusion: ao.to_luma(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(tex: &TextureBuffer, c: usize) -> impl Iterator<Item = u8> + '_ {
        tex.pixels.iter().skip(c).step_by(3).copied()
    }

    #[test]
    fn test_recipes_coregistered() {
        for recipe in [
            Recipe::Wood,
            Recipe::Felt { color: [68, 10, 18] },
            Recipe::Brass,
        ] {
            let set = recipe.synthesize(32, 5);
            assert!(set.is_coregistered());
            assert_eq!(set.base_color.width, 32);
            assert_eq!(set.base_color.format, PixelFormat::Rgb);
            assert_eq!(set.ambient_occlusion.format, PixelFormat::Luma);
        }
    }

    #[test]
    fn test_wood_ranges() {
        let set = wood(48, 11);
        assert!(channel(&set.metal_rough, 0).all(|v| v == 0));
        assert!(channel(&set.metal_rough, 2).all(|v| v == 0));
        // clip(0.35..0.85) * 255, truncated
        assert!(channel(&set.metal_rough, 1).all(|v| (89..=216).contains(&v)));
        assert!(set.ambient_occlusion.pixels.iter().all(|&v| v >= 191));
        // Red channel stays within 0.30..0.50
        assert!(channel(&set.base_color, 0).all(|v| (76..=127).contains(&v)));
    }

    #[test]
    fn test_felt_follows_color() {
        let set = felt(32, 21, [68, 10, 18]);
        assert!(channel(&set.base_color, 0).all(|v| v <= 79));
        assert!(channel(&set.base_color, 0).all(|v| v >= 40));
        assert!(channel(&set.metal_rough, 1).all(|v| (198..=242).contains(&v)));

        let white = felt(32, 21, [255, 255, 255]);
        assert!(channel(&white.base_color, 0).any(|v| v > 170));
    }

    #[test]
    fn test_brass_is_metallic() {
        let set = brass(32, 31);
        assert!(channel(&set.metal_rough, 2).all(|v| v == 255));
        assert!(channel(&set.metal_rough, 1).all(|v| (76..=165).contains(&v)));
        assert!(set.ambient_occlusion.pixels.iter().all(|&v| v >= 229));
    }

    #[test]
    fn test_recipes_deterministic() {
        let a = wood(24, 3);
        let b = wood(24, 3);
        assert_eq!(a.base_color.pixels, b.base_color.pixels);
        assert_eq!(a.normal.pixels, b.normal.pixels);
    }

    #[test]
    fn test_map_order() {
        let set = brass(8, 0);
        let names: Vec<_> = set.maps().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["BaseColor", "Normal", "MetalRough", "AO"]);
    }
}
