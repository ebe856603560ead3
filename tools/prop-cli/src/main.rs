//! propgen - procedural dice prop generator
//!
//! Builds a casino-style dice tray or a numbered d20 and writes it as a GLB
//! scene, optionally exporting the synthesized texture maps as PNG files.
//! Parameters resolve as defaults < `--config` file < command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use prop_gen::{build_d20, build_tray, parse_rgb, D20Params, GenConfig, Scene, TrayParams};

#[derive(Parser)]
#[command(name = "propgen")]
#[command(about = "Generate procedural dice props as GLB scenes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Octagonal wooden dice tray with felt insert and brass studs
    Tray(TrayArgs),
    /// Gilded twenty-sided die with per-face marker nodes
    D20(D20Args),
}

#[derive(Args)]
struct TrayArgs {
    /// Output GLB file
    #[arg(long, default_value = "casino_dice_tray.glb")]
    out: PathBuf,

    /// Also write the texture maps as PNG files into this directory
    #[arg(long)]
    export_textures: Option<PathBuf>,

    /// TOML file with a [tray] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wood and felt texture size
    #[arg(long)]
    tex: Option<u32>,

    /// Brass texture size
    #[arg(long)]
    metal_tex: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    inner_radius: Option<f32>,

    #[arg(long)]
    border: Option<f32>,

    #[arg(long)]
    rim_height: Option<f32>,

    #[arg(long)]
    floor_height: Option<f32>,

    #[arg(long)]
    felt_thickness: Option<f32>,

    /// Number of studs, a multiple of 8 (0 for none)
    #[arg(long)]
    stud_count: Option<u32>,

    #[arg(long)]
    stud_radius: Option<f32>,

    #[arg(long)]
    stud_height: Option<f32>,

    /// Felt color as R,G,B
    #[arg(long)]
    felt_color: Option<String>,
}

#[derive(Args)]
struct D20Args {
    /// Output GLB file
    #[arg(long, default_value = "d20_with_face_nodes.glb")]
    out: PathBuf,

    /// Also write the atlas maps as PNG files into this directory
    #[arg(long)]
    export_textures: Option<PathBuf>,

    /// TOML file with a [d20] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Circumscribed radius
    #[arg(long)]
    radius: Option<f32>,

    /// Atlas size in pixels
    #[arg(long)]
    atlas: Option<u32>,

    /// Atlas grid columns
    #[arg(long)]
    cols: Option<u32>,

    /// Atlas grid rows
    #[arg(long)]
    rows: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,
}

fn load_config(path: Option<&Path>) -> Result<GenConfig> {
    match path {
        Some(path) => GenConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GenConfig::default()),
    }
}

/// Overwrite `slot` when a flag was given
fn set<T>(slot: &mut T, flag: Option<T>) {
    if let Some(value) = flag {
        *slot = value;
    }
}

impl TrayArgs {
    fn params(&self) -> Result<TrayParams> {
        let mut p = load_config(self.config.as_deref())?.tray;
        set(&mut p.texture_size, self.tex);
        set(&mut p.metal_texture_size, self.metal_tex);
        set(&mut p.seed, self.seed);
        set(&mut p.inner_radius, self.inner_radius);
        set(&mut p.border, self.border);
        set(&mut p.rim_height, self.rim_height);
        set(&mut p.floor_height, self.floor_height);
        set(&mut p.felt_thickness, self.felt_thickness);
        set(&mut p.stud_count, self.stud_count);
        set(&mut p.stud_radius, self.stud_radius);
        set(&mut p.stud_height, self.stud_height);
        if let Some(color) = &self.felt_color {
            p.felt_color = parse_rgb(color)?;
        }
        p.validate()?;
        Ok(p)
    }
}

impl D20Args {
    fn params(&self) -> Result<D20Params> {
        let mut p = load_config(self.config.as_deref())?.d20;
        set(&mut p.radius, self.radius);
        set(&mut p.atlas_size, self.atlas);
        set(&mut p.cols, self.cols);
        set(&mut p.rows, self.rows);
        set(&mut p.seed, self.seed);
        p.validate()?;
        Ok(p)
    }
}

fn write_scene(scene: &Scene, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    scene
        .write_glb(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {}", out.display());
    println!("Triangles: {}", scene.triangle_count());
    Ok(())
}

fn run_tray(args: &TrayArgs) -> Result<()> {
    let params = args.params()?;
    let tray = build_tray(&params).context("Failed to build tray")?;
    write_scene(&tray.scene, &args.out)?;

    if let Some(dir) = &args.export_textures {
        let written = tray
            .export_textures(dir)
            .with_context(|| format!("Failed to export textures to {}", dir.display()))?;
        info!(count = written.len(), dir = %dir.display(), "exported textures");
    }
    Ok(())
}

fn run_d20(args: &D20Args) -> Result<()> {
    let params = args.params()?;
    let die = build_d20(&params).context("Failed to build d20")?;
    write_scene(&die.scene, &args.out)?;

    if let Some(dir) = &args.export_textures {
        let written = die
            .export_textures(dir)
            .with_context(|| format!("Failed to export textures to {}", dir.display()))?;
        info!(count = written.len(), dir = %dir.display(), "exported textures");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Tray(args) => run_tray(args),
        Commands::D20(args) => run_d20(args),
    }
}
