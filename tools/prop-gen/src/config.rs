//! Generator parameters and TOML configuration
//!
//! Parameters carry documented defaults and may be loaded from a TOML file with
//! optional `[tray]` and `[d20]` tables. Validation runs once, before any
//! geometry or texture work.

use std::f32::consts::PI;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PropError, Result};

/// Inset from the inner wall to the floor loop
pub const FLOOR_INSET: f32 = 0.10;

/// Dice tray parameters (scene units, +Y up)
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrayParams {
    /// Radius of the octagon corners on the inner wall
    pub inner_radius: f32,
    /// Frame width, outer radius = inner + border
    pub border: f32,
    pub rim_height: f32,
    pub floor_height: f32,
    pub felt_thickness: f32,

    /// Corner rounding radius
    pub fillet: f32,
    /// Samples per rounded corner
    pub arc_segments: u32,

    /// Studs on the rim; multiple of 8, 0 disables them
    pub stud_count: u32,
    pub stud_radius: f32,
    pub stud_height: f32,
    pub stud_sections: u32,

    /// Felt hue, sRGB
    pub felt_color: [u8; 3],

    /// Wood and felt texture size
    pub texture_size: u32,
    /// Brass texture size
    pub metal_texture_size: u32,
    /// Base seed; materials offset it by 11, 21 and 31
    pub seed: u64,
}

impl Default for TrayParams {
    fn default() -> Self {
        Self {
            inner_radius: 1.20,
            border: 0.35,
            rim_height: 0.60,
            floor_height: 0.10,
            felt_thickness: 0.03,
            fillet: 0.18,
            arc_segments: 3,
            stud_count: 16,
            stud_radius: 0.05,
            stud_height: 0.04,
            stud_sections: 12,
            felt_color: [68, 10, 18],
            texture_size: 1024,
            metal_texture_size: 512,
            seed: 0,
        }
    }
}

fn require_positive(name: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PropError::invalid(name, format!("must be > 0, got {value}")))
    }
}

impl TrayParams {
    pub fn outer_radius(&self) -> f32 {
        self.inner_radius + self.border
    }

    /// Profile points per loop
    pub fn loop_len(&self) -> usize {
        8 * self.arc_segments as usize
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("inner_radius", self.inner_radius)?;
        require_positive("border", self.border)?;
        require_positive("rim_height", self.rim_height)?;
        require_positive("floor_height", self.floor_height)?;
        require_positive("felt_thickness", self.felt_thickness)?;
        require_positive("stud_radius", self.stud_radius)?;
        require_positive("stud_height", self.stud_height)?;

        if !(self.fillet >= 0.0 && self.fillet.is_finite()) {
            return Err(PropError::invalid(
                "fillet",
                format!("must be >= 0, got {}", self.fillet),
            ));
        }
        if self.inner_radius <= FLOOR_INSET {
            return Err(PropError::invalid(
                "inner_radius",
                format!("must exceed the floor inset {FLOOR_INSET}"),
            ));
        }
        if self.rim_height <= self.floor_height + self.felt_thickness {
            return Err(PropError::invalid(
                "rim_height",
                "must be above floor_height + felt_thickness",
            ));
        }
        if self.arc_segments == 0 {
            return Err(PropError::invalid("arc_segments", "must be at least 1"));
        }

        // Fillet tangent length vs half of an octagon side
        let half_side = self.outer_radius() * (PI / 8.0).sin();
        let tangent = self.fillet / (3.0 * PI / 8.0).tan();
        if tangent > half_side {
            return Err(PropError::invalid(
                "fillet",
                format!("too large for outer radius {}", self.outer_radius()),
            ));
        }

        if self.stud_count % 8 != 0 {
            return Err(PropError::invalid(
                "stud_count",
                format!("must be a multiple of 8, got {}", self.stud_count),
            ));
        }
        if self.stud_sections < 3 {
            return Err(PropError::invalid("stud_sections", "must be at least 3"));
        }
        if 2.0 * self.stud_radius >= self.border {
            return Err(PropError::invalid(
                "stud_radius",
                "studs must fit on the rim (2 * stud_radius < border)",
            ));
        }
        if self.texture_size == 0 {
            return Err(PropError::invalid("texture_size", "must be > 0"));
        }
        if self.metal_texture_size == 0 {
            return Err(PropError::invalid("metal_texture_size", "must be > 0"));
        }
        Ok(())
    }
}

/// Twenty-sided die parameters
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct D20Params {
    /// Circumscribed radius
    pub radius: f32,
    /// Atlas width and height in pixels
    pub atlas_size: u32,
    pub cols: u32,
    pub rows: u32,
    pub seed: u64,
    /// Edge length of the face marker quads
    pub marker_size: f32,
    /// Marker distance above each face
    pub marker_offset: f32,
}

impl Default for D20Params {
    fn default() -> Self {
        Self {
            radius: 0.5,
            atlas_size: 1024,
            cols: 5,
            rows: 4,
            seed: 9,
            marker_size: 0.008,
            marker_offset: 0.003,
        }
    }
}

impl D20Params {
    pub fn validate(&self) -> Result<()> {
        require_positive("radius", self.radius)?;
        require_positive("marker_size", self.marker_size)?;
        require_positive("marker_offset", self.marker_offset)?;

        if (self.cols as u64) * (self.rows as u64) < 20 {
            return Err(PropError::invalid(
                "cols",
                format!(
                    "a {}x{} grid cannot hold 20 faces",
                    self.cols, self.rows
                ),
            ));
        }
        let min_atlas = self.cols.max(self.rows).saturating_mul(8);
        if self.atlas_size < min_atlas {
            return Err(PropError::invalid(
                "atlas_size",
                format!("must be at least {min_atlas} for a {}x{} grid", self.cols, self.rows),
            ));
        }
        Ok(())
    }
}

/// Parameters for both generators, as read from a TOML file
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    pub tray: TrayParams,
    pub d20: D20Params,
}

impl GenConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| PropError::Config(e.to_string()))
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// Parse an `R,G,B` color string with components 0-255
pub fn parse_rgb(text: &str) -> Result<[u8; 3]> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(PropError::invalid(
            "felt_color",
            format!("expected R,G,B, got `{text}`"),
        ));
    }

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            PropError::invalid(
                "felt_color",
                format!("`{part}` is not an integer in 0..=255"),
            )
        })?;
    }
    Ok(rgb)
}
