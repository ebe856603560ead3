//! Coarse block noise
//!
//! Each `block × block` tile gets one value drawn from a PCG generator seeded
//! by hashing `(seed, block_x, block_y)`, so any tile can be recomputed on its
//! own and the result never depends on evaluation order. The tiled field is
//! then softened with a gaussian of `σ = 0.35 · block`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use super::Field;

/// Blur radius relative to block size
const BLUR_PER_BLOCK: f32 = 0.35;

/// Mix seed and block coordinates into one 64-bit generator key
fn block_key(seed: u64, bx: u32, by: u32) -> u64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    for v in [bx as u64, by as u64] {
        h = h.wrapping_add(v).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 31;
        h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
        h ^= h >> 29;
    }
    h
}

/// Value in [0, 1] for one block
fn block_value(seed: u64, bx: u32, by: u32) -> f32 {
    let mut rng = Pcg32::seed_from_u64(block_key(seed, bx, by));
    rng.random::<u8>() as f32 / 255.0
}

/// Generate blurred block noise in [0, 1]
///
/// A `block` of 0 is treated as 1. Zero width or height yields an empty field.
pub fn block_noise(width: u32, height: u32, block: u32, seed: u64) -> Field {
    let block = block.max(1);
    debug!(width, height, block, seed, "block noise");

    let tiles = Field::from_fn(width, height, |x, y| block_value(seed, x / block, y / block));
    tiles.gaussian_blur(BLUR_PER_BLOCK * block as f32)
}
