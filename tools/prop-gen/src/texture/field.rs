//! Single-channel floating-point planes
//!
//! Every intermediate texture signal (noise, grain, height, masks) lives in a
//! [`Field`] and is quantized only once the recipe is finished.

use rayon::prelude::*;

use super::{to_byte, PixelFormat, TextureBuffer};

/// Row-major f32 plane, top row first
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub width: u32,
    pub height: u32,
    data: Vec<f32>,
}

impl Field {
    /// Zero-filled field
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Field with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Build a field by evaluating `f(x, y)` for each sample, rows in parallel
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> f32 + Sync,
    {
        let mut field = Self::new(width, height);
        if field.is_empty() {
            return field;
        }
        field
            .data
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = f(x as u32, y as u32);
                }
            });
        field
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw samples, row-major
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let w = self.width as usize;
        self.data[y as usize * w + x as usize] = value;
    }

    /// Sample with coordinates clamped to the field bounds
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(cx, cy)
    }

    /// Apply `f` to every sample
    pub fn map<F>(&self, f: F) -> Field
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        Field {
            width: self.width,
            height: self.height,
            data: self.data.par_iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two same-sized fields sample by sample
    pub fn zip_with<F>(&self, other: &Field, f: F) -> Field
    where
        F: Fn(f32, f32) -> f32 + Sync + Send,
    {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        Field {
            width: self.width,
            height: self.height,
            data: self
                .data
                .par_iter()
                .zip(other.data.par_iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Separable gaussian blur with clamped edges
    ///
    /// The kernel spans `ceil(3σ)` samples either side of the centre and is
    /// normalized to sum to one. `sigma <= 0` returns an unchanged copy.
    pub fn gaussian_blur(&self, sigma: f32) -> Field {
        if sigma <= 0.0 || self.is_empty() {
            return self.clone();
        }

        let kernel = gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as i64;
        let w = self.width as usize;

        // Horizontal pass
        let mut horizontal = Field::new(self.width, self.height);
        horizontal
            .data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out = kernel
                        .iter()
                        .enumerate()
                        .map(|(k, weight)| {
                            weight * self.get_clamped(x as i64 + k as i64 - radius, y as i64)
                        })
                        .sum();
                }
            });

        // Vertical pass
        let mut result = Field::new(self.width, self.height);
        result
            .data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out = kernel
                        .iter()
                        .enumerate()
                        .map(|(k, weight)| {
                            weight * horizontal.get_clamped(x as i64, y as i64 + k as i64 - radius)
                        })
                        .sum();
                }
            });

        result
    }

    /// Quantize to an 8-bit grayscale texture
    pub fn to_luma(&self) -> TextureBuffer {
        TextureBuffer {
            width: self.width,
            height: self.height,
            format: PixelFormat::Luma,
            pixels: self.data.iter().map(|&v| to_byte(v)).collect(),
        }
    }
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as i64;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized() {
        for sigma in [0.3, 1.0, 2.2, 9.1] {
            let kernel = gaussian_kernel(sigma);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            assert_eq!(kernel.len() % 2, 1);
        }
        assert_eq!(gaussian_kernel(1.0).len(), 7);
    }

    #[test]
    fn test_blur_preserves_constant() {
        let field = Field::filled(16, 9, 0.4);
        let blurred = field.gaussian_blur(2.0);
        for &v in blurred.data() {
            assert!((v - 0.4).abs() < 1e-5);
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut field = Field::new(11, 11);
        field.set(5, 5, 1.0);
        let blurred = field.gaussian_blur(1.0);

        assert!(blurred.get(5, 5) < 1.0);
        assert!(blurred.get(6, 5) > 0.0);
        assert!((blurred.get(4, 5) - blurred.get(6, 5)).abs() < 1e-6);
        assert!((blurred.get(5, 4) - blurred.get(5, 6)).abs() < 1e-6);
        let total: f32 = blurred.data().iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_positive_sigma_is_identity() {
        let field = Field::from_fn(5, 4, |x, y| (x * 3 + y) as f32 / 20.0);
        assert_eq!(field.gaussian_blur(0.0), field);
        assert_eq!(field.gaussian_blur(-1.0), field);
    }

    #[test]
    fn test_empty_field() {
        let field = Field::new(0, 12);
        assert!(field.is_empty());
        assert!(field.gaussian_blur(3.0).is_empty());
        assert!(Field::from_fn(7, 0, |_, _| 1.0).is_empty());
    }

    #[test]
    fn test_to_luma() {
        let field = Field::from_fn(2, 1, |x, _| x as f32);
        let tex = field.to_luma();
        assert_eq!(tex.format, PixelFormat::Luma);
        assert_eq!(tex.pixels, vec![0, 255]);
    }
}
