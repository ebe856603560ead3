//! Digit glyph rasterization

/// Coverage mask of a rendered label, tightly bounded
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Row-major coverage in [0, 1]
    coverage: Vec<f32>,
}

impl GlyphMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0.0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32, value: f32) {
        let w = self.width as usize;
        self.coverage[y as usize * w + x as usize] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0.0)
    }

    /// Number of fully covered pixels
    pub fn covered(&self) -> usize {
        self.coverage.iter().filter(|&&c| c >= 1.0).count()
    }
}

/// Turns a short label into a coverage mask sized for an atlas cell
pub trait GlyphRasterizer: Send + Sync {
    /// Render `text` for a `cell_width × cell_height` pixel cell
    fn rasterize(&self, text: &str, cell_width: u32, cell_height: u32) -> GlyphMask;
}

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
/// Two digits plus the gap between them
const LABEL_COLUMNS: u32 = 2 * GLYPH_W + 1;

/// 5×7 digits, MSB is the left column
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Built-in blocky digit font scaled by a whole-pixel factor
///
/// The scale keeps glyphs about 22% of the cell height and a two-digit label
/// within 34% of the cell width. Characters other than digits render as gaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapDigits;

impl BitmapDigits {
    pub fn scale_for(cell_width: u32, cell_height: u32) -> u32 {
        let by_height = cell_height as f32 * 0.22 / GLYPH_H as f32;
        let by_width = cell_width as f32 * 0.34 / LABEL_COLUMNS as f32;
        (by_height.min(by_width).floor() as u32).max(1)
    }
}

impl GlyphRasterizer for BitmapDigits {
    fn rasterize(&self, text: &str, cell_width: u32, cell_height: u32) -> GlyphMask {
        let scale = Self::scale_for(cell_width, cell_height);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return GlyphMask::new(0, 0);
        }

        let columns = chars.len() as u32 * (GLYPH_W + 1) - 1;
        let mut mask = GlyphMask::new(columns * scale, GLYPH_H * scale);

        for (slot, ch) in chars.iter().enumerate() {
            let Some(rows) = ch.to_digit(10).map(|d| DIGITS[d as usize]) else {
                continue;
            };
            let left = slot as u32 * (GLYPH_W + 1);
            for (py, bits) in rows.iter().enumerate() {
                for px in 0..GLYPH_W {
                    if (bits >> (GLYPH_W - 1 - px)) & 1 == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            mask.set(
                                (left + px) * scale + sx,
                                py as u32 * scale + sy,
                                1.0,
                            );
                        }
                    }
                }
            }
        }
        mask
    }
}
