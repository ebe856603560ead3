//! Tangent-space normal maps from height fields
//!
//! Gradients are central differences; the outermost rows and columns have a
//! zero gradient along the axis they border.

use glam::Vec3;
use rayon::prelude::*;

use super::{Field, PixelFormat, TextureBuffer};

/// Unit normals for every sample of `height`, row-major
///
/// # Arguments
/// * `height` - Height field in [0, 1]
/// * `strength` - Embossing intensity (wood ~6, felt ~2.5, metal ~1.5)
pub fn normal_vectors(height: &Field, strength: f32) -> Vec<Vec3> {
    let (w, h) = (height.width, height.height);
    if height.is_empty() {
        return Vec::new();
    }

    (0..h)
        .into_par_iter()
        .flat_map_iter(|y| {
            (0..w).map(move |x| {
                let gx = if x == 0 || x + 1 >= w {
                    0.0
                } else {
                    (height.get(x + 1, y) - height.get(x - 1, y)) * 0.5
                };
                let gy = if y == 0 || y + 1 >= h {
                    0.0
                } else {
                    (height.get(x, y + 1) - height.get(x, y - 1)) * 0.5
                };
                Vec3::new(-strength * gx, -strength * gy, 1.0).normalize()
            })
        })
        .collect()
}

/// Encode a height field as an RGB normal map, `(n * 0.5 + 0.5) * 255`
pub fn normal_map(height: &Field, strength: f32) -> TextureBuffer {
    let pixels = normal_vectors(height, strength)
        .into_iter()
        .flat_map(|n| {
            let e = n * 0.5 + Vec3::splat(0.5);
            [
                (e.x * 255.0) as u8,
                (e.y * 255.0) as u8,
                (e.z * 255.0) as u8,
            ]
        })
        .collect();

    TextureBuffer {
        width: height.width,
        height: height.height,
        format: PixelFormat::Rgb,
        pixels,
    }
}
