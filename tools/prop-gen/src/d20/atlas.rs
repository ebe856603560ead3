//! Face atlas layout and the gilded gold material
//!
//! Faces are packed row-major into a `cols × rows` grid. Each face maps onto
//! an inscribed triangle of its cell (apex top-centre, base corners inset by
//! [`CELL_MARGIN`]) so sampling never bleeds into a neighbour. UVs follow the
//! glTF convention: origin top-left, v down.
//!
//! The base color and height of the gold are built first, then digit labels
//! are composited by an ordered list of [`CompositePass`]es.

use glam::Vec2;
use tracing::{debug, warn};

use super::glyph::{GlyphMask, GlyphRasterizer};
use crate::texture::{
    block_noise, normal_map, pack_metal_rough, rgb_texture, Field, MaterialTextures,
};

/// Inset of the inscribed triangle, as a fraction of the cell
pub const CELL_MARGIN: f32 = 0.10;

/// Label color (240, 236, 220)
const IVORY: [f32; 3] = [240.0 / 255.0, 236.0 / 255.0, 220.0 / 255.0];

/// Triangle corners inside a unit cell
const LOCAL_TRIANGLE: [Vec2; 3] = [
    Vec2::new(0.5, CELL_MARGIN),
    Vec2::new(CELL_MARGIN, 1.0 - CELL_MARGIN),
    Vec2::new(1.0 - CELL_MARGIN, 1.0 - CELL_MARGIN),
];

/// Pixel rectangle, half-open on the right and bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CellRect {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x0..self.x1).contains(&x) && (self.y0..self.y1).contains(&y)
    }
}

/// Grid of per-face cells over a square atlas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    pub size: u32,
    pub cols: u32,
    pub rows: u32,
}

impl AtlasLayout {
    pub fn new(size: u32, cols: u32, rows: u32) -> Self {
        Self { size, cols, rows }
    }

    /// (column, row) of a face's cell
    pub fn cell_of(&self, face: usize) -> (u32, u32) {
        let face = face as u32;
        (face % self.cols, face / self.cols)
    }

    /// Pixel bounds of a face's cell
    pub fn cell_rect(&self, face: usize) -> CellRect {
        let (ci, ri) = self.cell_of(face);
        let edge = |i: u32, n: u32| (i as u64 * self.size as u64 / n as u64) as u32;
        CellRect {
            x0: edge(ci, self.cols),
            y0: edge(ri, self.rows),
            x1: edge(ci + 1, self.cols),
            y1: edge(ri + 1, self.rows),
        }
    }

    /// UV rectangle `(min, max)` of a face's cell
    pub fn cell_uv_rect(&self, face: usize) -> (Vec2, Vec2) {
        let (ci, ri) = self.cell_of(face);
        let (cols, rows) = (self.cols as f32, self.rows as f32);
        (
            Vec2::new(ci as f32 / cols, ri as f32 / rows),
            Vec2::new((ci + 1) as f32 / cols, (ri + 1) as f32 / rows),
        )
    }

    /// UVs for the three corners of a face, in vertex order
    pub fn face_uvs(&self, face: usize) -> [Vec2; 3] {
        let (ci, ri) = self.cell_of(face);
        let cell = Vec2::new(ci as f32, ri as f32);
        let grid = Vec2::new(self.cols as f32, self.rows as f32);
        LOCAL_TRIANGLE.map(|local| (cell + local) / grid)
    }

    /// Pixel position of the inscribed triangle's centroid
    pub fn label_anchor(&self, face: usize) -> Vec2 {
        let rect = self.cell_rect(face);
        let local = (LOCAL_TRIANGLE[0] + LOCAL_TRIANGLE[1] + LOCAL_TRIANGLE[2]) / 3.0;
        Vec2::new(
            rect.x0 as f32 + local.x * rect.width() as f32,
            rect.y0 as f32 + local.y * rect.height() as f32,
        )
    }

    /// Grid cell covering pixel (x, y), in face order
    fn cell_at(&self, columns: &[u32], rows: &[u32], x: u32, y: u32) -> usize {
        (rows[y as usize] * self.cols + columns[x as usize]) as usize
    }

    /// Cell column of every pixel column and cell row of every pixel row
    fn index_tables(&self) -> (Vec<u32>, Vec<u32>) {
        let mut columns = vec![0; self.size as usize];
        let mut rows = vec![0; self.size as usize];
        for ci in 0..self.cols {
            let rect = self.cell_rect(ci as usize);
            columns[rect.x0 as usize..rect.x1 as usize].fill(ci);
        }
        for ri in 0..self.rows {
            let rect = self.cell_rect((ri * self.cols) as usize);
            rows[rect.y0 as usize..rect.y1 as usize].fill(ri);
        }
        (columns, rows)
    }
}

/// Float planes a label pass draws into
#[derive(Clone, Debug)]
pub struct AtlasLayers {
    pub red: Field,
    pub green: Field,
    pub blue: Field,
    pub height: Field,
}

impl AtlasLayers {
    fn map_color<F>(&mut self, f: F)
    where
        F: Fn(usize, &Field) -> Field,
    {
        self.red = f(0, &self.red);
        self.green = f(1, &self.green);
        self.blue = f(2, &self.blue);
    }
}

/// One step of label compositing
pub trait CompositePass {
    fn name(&self) -> &'static str;
    fn apply(&self, layers: &mut AtlasLayers);
}

/// Soft shadow: the mask at 200/255, blurred, shifted down-right and subtracted
pub struct DropShadow<'a> {
    pub mask: &'a Field,
    pub sigma: f32,
    pub offset: u32,
}

impl CompositePass for DropShadow<'_> {
    fn name(&self) -> &'static str {
        "drop-shadow"
    }

    fn apply(&self, layers: &mut AtlasLayers) {
        let blurred = self.mask.map(|m| m * 200.0 / 255.0).gaussian_blur(self.sigma);
        let off = self.offset;
        let shadow = Field::from_fn(blurred.width, blurred.height, |x, y| {
            if x >= off && y >= off {
                blurred.get(x - off, y - off)
            } else {
                0.0
            }
        });
        layers.map_color(|_, c| c.zip_with(&shadow, |v, s| (v - s).clamp(0.0, 1.0)));
    }
}

/// Paints the mask in a flat color
pub struct GlyphFill<'a> {
    pub mask: &'a Field,
    pub color: [f32; 3],
}

impl CompositePass for GlyphFill<'_> {
    fn name(&self) -> &'static str {
        "glyph-fill"
    }

    fn apply(&self, layers: &mut AtlasLayers) {
        let color = self.color;
        layers.map_color(|i, c| c.zip_with(self.mask, |v, m| v * (1.0 - m) + color[i] * m));
    }
}

/// Raises the height under a softened mask
pub struct Emboss<'a> {
    pub mask: &'a Field,
    pub sigma: f32,
    pub amount: f32,
}

impl CompositePass for Emboss<'_> {
    fn name(&self) -> &'static str {
        "emboss"
    }

    fn apply(&self, layers: &mut AtlasLayers) {
        let soft = self.mask.gaussian_blur(self.sigma);
        let amount = self.amount;
        layers.height = layers
            .height
            .zip_with(&soft, |h, m| (h + amount * m).clamp(0.0, 1.0));
    }
}

/// Run passes in order
pub fn composite(layers: &mut AtlasLayers, passes: &[&dyn CompositePass]) {
    for pass in passes {
        debug!(pass = pass.name(), "compositing");
        pass.apply(layers);
    }
}

/// Stamp `glyph` centred on `centre` into `mask`, clipped to the field
fn stamp(mask: &mut Field, glyph: &GlyphMask, centre: Vec2) {
    let left = (centre.x - glyph.width as f32 * 0.5).round() as i64;
    let top = (centre.y - glyph.height as f32 * 0.5).round() as i64;
    for gy in 0..glyph.height {
        for gx in 0..glyph.width {
            let (x, y) = (left + gx as i64, top + gy as i64);
            if x < 0 || y < 0 || x >= mask.width as i64 || y >= mask.height as i64 {
                continue;
            }
            let c = glyph.get(gx, gy);
            if c > 0.0 {
                let (x, y) = (x as u32, y as u32);
                mask.set(x, y, mask.get(x, y).max(c));
            }
        }
    }
}

/// Coverage of every face label over the whole atlas
pub fn label_mask(layout: &AtlasLayout, numbers: &[u8], glyphs: &dyn GlyphRasterizer) -> Field {
    let mut mask = Field::new(layout.size, layout.size);
    for (face, number) in numbers.iter().enumerate() {
        let rect = layout.cell_rect(face);
        let glyph = glyphs.rasterize(&number.to_string(), rect.width(), rect.height());
        stamp(&mut mask, &glyph, layout.label_anchor(face));
    }
    mask
}

/// Ambient occlusion darkened per grid cell and again along cell borders
fn cell_occlusion(layout: &AtlasLayout, n: &Field) -> Field {
    let (columns, rows) = layout.index_tables();
    Field::from_fn(layout.size, layout.size, |x, y| {
        let rect = layout.cell_rect(layout.cell_at(&columns, &rows, x, y));
        let band = (0.05 * rect.width() as f32) as u32;
        let near_border = x < rect.x0 + band
            || x + band >= rect.x1
            || y < rect.y0 + band
            || y + band >= rect.y1;
        let ao = if near_border { 0.97 - 0.03 - 0.04 } else { 0.97 - 0.03 };
        (ao + 0.03 * (n.get(x, y) - 0.5)).clamp(0.75, 1.0)
    })
}

/// Generate the gilded gold atlas with a label for every face
///
/// `numbers[i]` is the number printed in face `i`'s cell.
pub fn gilded_gold(
    layout: &AtlasLayout,
    numbers: &[u8],
    seed: u64,
    glyphs: &dyn GlyphRasterizer,
) -> MaterialTextures {
    let size = layout.size;
    if !size.is_power_of_two() {
        warn!(size, "atlas size is not a power of two");
    }
    let n1 = block_noise(size, size, 10, seed);
    let n2 = block_noise(size, size, 28, seed + 11);
    let n = n1.zip_with(&n2, |a, b| (a + b) * 0.5);
    let fine = block_noise(size, size, 6, seed + 3);

    let mut layers = AtlasLayers {
        red: n.map(|v| 0.62 + 0.20 * (v - 0.5)),
        green: n.map(|v| 0.50 + 0.16 * (v - 0.5)),
        blue: n.map(|v| 0.18 + 0.10 * (v - 0.5)),
        height: n.zip_with(&fine, |a, b| (0.45 * a + 0.55 * b).clamp(0.0, 1.0)),
    };

    let mask = label_mask(layout, numbers, glyphs);
    let shadow = DropShadow {
        mask: &mask,
        sigma: 2.2,
        offset: (size / 512).max(1),
    };
    let fill = GlyphFill {
        mask: &mask,
        color: IVORY,
    };
    let emboss = Emboss {
        mask: &mask,
        sigma: 1.2,
        amount: 0.25,
    };
    composite(&mut layers, &[&shadow, &fill, &emboss]);

    let rough = n.map(|v| (0.48 + 0.12 * (v - 0.5)).clamp(0.35, 0.70));
    let ao = cell_occlusion(layout, &n);

    MaterialTextures {
        base_color: rgb_texture(&layers.red, &layers.green, &layers.blue),
        normal: normal_map(&layers.height, 5.0),
        metal_rough: pack_metal_rough(&rough, 1.0),
        ambient_occlusion: ao.to_luma(),
    }
}
