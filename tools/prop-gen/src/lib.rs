//! Procedural prop generation for tabletop dice assets
//!
//! This library builds two static props, a casino-style octagonal dice tray
//! and a numbered twenty-sided die, as triangulated meshes with synthesized
//! PBR texture sets (base color, normal, metallic-roughness, occlusion), and
//! serializes them as self-contained GLB scenes.
//!
//! # Tray Example
//! ```no_run
//! use prop_gen::{build_tray, TrayParams};
//!
//! let params = TrayParams::default();
//! params.validate()?;
//! let tray = build_tray(&params)?;
//! std::fs::write("tray.glb", tray.scene.to_glb()?)?;
//! # Ok::<(), prop_gen::PropError>(())
//! ```
//!
//! # Die Example
//! ```no_run
//! use prop_gen::{build_d20, D20Params};
//!
//! let die = build_d20(&D20Params::default())?;
//! for face in &die.faces {
//!     println!("face {} shows {}", face.index, face.number);
//! }
//! # Ok::<(), prop_gen::PropError>(())
//! ```

pub mod config;
pub mod d20;
pub mod error;
pub mod mesh;
pub mod scene;
pub mod texture;
pub mod tray;

pub use config::{parse_rgb, D20Params, GenConfig, TrayParams};
pub use d20::{build_d20, build_d20_with, D20Asset, FaceRecord, GlyphRasterizer};
pub use error::{PropError, Result};
pub use mesh::Mesh;
pub use scene::{PbrMaterial, Scene, SceneMesh, SceneNode};
pub use tray::{build_tray, TrayAsset, TrayLoops};
