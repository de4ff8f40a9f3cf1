#![deny(clippy::all, clippy::pedantic)]

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use runtime::{simulate, RunOptions};
use scene::Scene;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boxdyn")]
#[command(about = "Steps a box dynamics scene headlessly and logs body poses")]
struct Cli {
    /// Scene file; the built-in demo when omitted
    #[arg(long)]
    scene: Option<PathBuf>,
    #[arg(long, default_value_t = 300)]
    frames: usize,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 30.0)]
    frame_dt: f32,
    /// Log poses every N frames (0 = never)
    #[arg(long, default_value_t = 50)]
    log_every: usize,
    /// Override the scene's steps per frame
    #[arg(long)]
    substeps: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let cli = Cli::parse();

    let scene = match &cli.scene {
        Some(path) => Scene::from_path(path)?,
        None => Scene::demo()?,
    };
    let mut loaded = scene.into_world()?;
    if let Some(substeps) = cli.substeps {
        let config = dynamics::WorldConfig {
            substeps,
            ..*loaded.world.config()
        };
        loaded
            .world
            .set_config(config)
            .context("applying --substeps")?;
    }

    let options = RunOptions {
        frames: cli.frames,
        frame_dt: cli.frame_dt,
        log_every: cli.log_every,
    };
    simulate(&mut loaded.world, &options)?;

    for (id, handle) in loaded.named_handles() {
        if let Some(body) = loaded.world.body(handle) {
            tracing::info!(id = %id, position = ?body.position, "final pose");
        }
    }
    Ok(())
}
