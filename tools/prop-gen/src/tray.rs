//! Octagonal dice tray
//!
//! The tray is three meshes: a closed wooden frame with a sunken floor, a
//! felt insert resting on that floor, and brass studs along the top of the
//! rim. All three share the same rounded-octagon outline.

use std::f32::consts::{PI, TAU};
use std::path::{Path, PathBuf};

use glam::Vec3;
use tracing::{debug, info};

use crate::config::{TrayParams, FLOOR_INSET};
use crate::error::Result;
use crate::mesh::{cap, ring, rounded_octagon, wall, Mesh, ProfileLoop};
use crate::scene::{PbrMaterial, Scene};
use crate::texture::{MaterialTextures, Recipe};

pub const WOOD_MATERIAL: &str = "Wood_Frame";
pub const FELT_MATERIAL: &str = "Felt_Insert";
pub const STUD_MATERIAL: &str = "Metal_Studs";

/// Felt loop shrink so the insert clears the inner wall
const FELT_SCALE: f32 = 0.98;

/// Outlines shared by the tray parts, all at y = 0
#[derive(Clone, Debug)]
pub struct TrayLoops {
    pub outer: ProfileLoop,
    /// Top edge of the inner wall
    pub inner: ProfileLoop,
    /// Edge of the sunken floor
    pub floor: ProfileLoop,
}

impl TrayLoops {
    pub fn new(params: &TrayParams) -> Self {
        let outer_radius = params.outer_radius();
        let outer = rounded_octagon(outer_radius, params.fillet, params.arc_segments);
        let inner = outer.scaled(params.inner_radius / outer_radius);
        let floor = outer.scaled((params.inner_radius - FLOOR_INSET) / outer_radius);
        Self { outer, inner, floor }
    }
}

/// Closed wooden frame: outer wall, rim, inner wall, floor and bottom
pub fn wood_frame(params: &TrayParams, loops: &TrayLoops) -> Mesh {
    let rim = params.rim_height;
    let floor = params.floor_height;

    let outer_wall = wall(&loops.outer.at_height(0.0), &loops.outer.at_height(rim));
    let top = ring(&loops.outer, &loops.inner, rim);
    // Lofted upward like an outer wall, then turned to face the cavity
    let inner_wall =
        wall(&loops.floor.at_height(floor), &loops.inner.at_height(rim)).flip_winding();
    let floor_cap = cap(&loops.floor, floor, true);
    let bottom = cap(&loops.outer, 0.0, false);

    Mesh::merge([&outer_wall, &top, &inner_wall, &floor_cap, &bottom])
}

/// Felt slab resting on the floor
pub fn felt_insert(params: &TrayParams, loops: &TrayLoops) -> Mesh {
    let outline = loops.floor.scaled(FELT_SCALE);
    let bottom = params.floor_height;
    let top = bottom + params.felt_thickness;

    Mesh::merge([
        &wall(&outline.at_height(bottom), &outline.at_height(top)),
        &cap(&outline, top, true),
        &cap(&outline, bottom, false),
    ])
}

/// Distance from the centre to the middle of the rim in direction `angle`
///
/// Follows the octagon's sides, so a stud stays centred on the rim whether it
/// sits mid-side or at a corner.
fn rim_midline(params: &TrayParams, angle: f32) -> f32 {
    let sector = TAU / 8.0;
    // Side normals point at multiples of π/4
    let off_normal = (angle + sector * 0.5).rem_euclid(sector) - sector * 0.5;
    let mid_corner = (params.inner_radius + params.outer_radius()) * 0.5;
    mid_corner * (PI / 8.0).cos() / off_normal.cos()
}

/// Evenly spaced cylinders standing on the rim
pub fn studs(params: &TrayParams) -> Mesh {
    let profile = ProfileLoop::circle(params.stud_radius, params.stud_sections);
    let base = params.rim_height;
    let top = base + params.stud_height;
    let stud = Mesh::merge([
        &wall(&profile.at_height(base), &profile.at_height(top)),
        &cap(&profile, top, true),
        &cap(&profile, base, false),
    ]);

    let count = params.stud_count;
    let mut all = Mesh::with_capacity(
        stud.vertex_count() * count as usize,
        stud.triangle_count() * count as usize,
    );
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        let r = rim_midline(params, angle);
        let position = Vec3::new(r * angle.cos(), 0.0, -r * angle.sin());
        all.append(&stud.clone().translate(position));
    }
    all
}

/// Built tray
#[derive(Clone, Debug)]
pub struct TrayAsset {
    pub scene: Scene,
}

impl TrayAsset {
    /// Write `wood_*.png`, `felt_*.png` and, with studs, `metal_*.png` into `dir`
    pub fn export_textures(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (material, prefix) in [
            (WOOD_MATERIAL, "wood"),
            (FELT_MATERIAL, "felt"),
            (STUD_MATERIAL, "metal"),
        ] {
            if self.scene.material(material).is_some() {
                written.extend(self.scene.export_material_textures(material, dir, prefix)?);
            }
        }
        Ok(written)
    }
}

/// Synthesize wood, felt and brass sets in parallel
fn tray_textures(
    params: &TrayParams,
) -> (MaterialTextures, MaterialTextures, Option<MaterialTextures>) {
    let seed = params.seed;
    let (wood, (felt, brass)) = rayon::join(
        || Recipe::Wood.synthesize(params.texture_size, seed + 11),
        || {
            rayon::join(
                || {
                    Recipe::Felt {
                        color: params.felt_color,
                    }
                    .synthesize(params.texture_size, seed + 21)
                },
                || {
                    (params.stud_count > 0)
                        .then(|| Recipe::Brass.synthesize(params.metal_texture_size, seed + 31))
                },
            )
        },
    );
    (wood, felt, brass)
}

/// Build the tray scene
///
/// A stud count of zero leaves out the `Tray_Studs` node and its material.
pub fn build_tray(params: &TrayParams) -> Result<TrayAsset> {
    params.validate()?;

    let loops = TrayLoops::new(params);
    let wood_mesh = wood_frame(params, &loops);
    let felt_mesh = felt_insert(params, &loops);
    let stud_mesh = studs(params);
    debug!(
        loop_points = loops.outer.len(),
        wood = wood_mesh.triangle_count(),
        felt = felt_mesh.triangle_count(),
        studs = stud_mesh.triangle_count(),
        "built tray meshes"
    );

    let (wood, felt, brass) = tray_textures(params);

    let mut scene = Scene::new("DiceTray");
    let wood = scene.add_material(PbrMaterial::textured(WOOD_MATERIAL, wood, 0.0));
    scene.add_object("Tray_Wood", wood_mesh, wood);
    let felt = scene.add_material(PbrMaterial::textured(FELT_MATERIAL, felt, 0.0));
    scene.add_object("Tray_Felt", felt_mesh, felt);
    if let Some(brass) = brass {
        let metal = scene.add_material(PbrMaterial::textured(STUD_MATERIAL, brass, 1.0));
        scene.add_object("Tray_Studs", stud_mesh, metal);
    }

    info!(
        outer_radius = params.outer_radius(),
        triangles = scene.triangle_count(),
        "built tray"
    );
    Ok(TrayAsset { scene })
}
