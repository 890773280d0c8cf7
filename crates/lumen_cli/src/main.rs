//! `lumen` - render one of the built-in scenes to an image file.

mod output;
mod scenes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::RenderSettings;
use lumen_renderer::{render, RenderConfig};
use scenes::SceneKind;

#[derive(Parser)]
#[command(name = "lumen", version, about = "CPU path tracer for built-in demo scenes")]
struct Cli {
    #[arg(long, value_enum, default_value_t = SceneKind::RandomSpheres)]
    scene: SceneKind,

    /// JSON render settings; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    samples: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads, 0 = one per core
    #[arg(long)]
    threads: Option<usize>,

    /// Equirectangular image for the globe scene
    #[arg(long, default_value = "earthmap.jpg")]
    texture: PathBuf,

    /// Output file; `.ppm` writes plain text, other extensions pick an encoder
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,
}

impl Cli {
    fn settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.config {
            Some(path) => RenderSettings::load(path)
                .with_context(|| format!("reading settings from {}", path.display()))?,
            None => RenderSettings::default(),
        };

        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    log::info!("Starting lumen: scene {:?}", cli.scene);

    let scene = scenes::build(cli.scene, settings.aspect_ratio(), settings.seed, &cli.texture)?;
    let shutter = scene.camera.shutter();
    let world = scene
        .world
        .into_bvh(shutter)
        .context("building scene hierarchy")?;

    let config = RenderConfig::from_settings(&settings, scene.background);
    let image = render(&scene.camera, &world, &config)?;

    output::save(&image, &cli.output)
}
