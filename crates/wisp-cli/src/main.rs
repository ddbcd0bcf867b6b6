//! Wisp CLI - Command-line interface for the Wisp particle engine

mod commands;
mod raster;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, mask, run};

#[derive(Parser)]
#[command(name = "wisp")]
#[command(about = "Cursor-reactive particle effects spawned inside a mask", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a number of frames headlessly and render the last one to PNG
    Run {
        /// Path to a config TOML file (defaults are used for missing keys)
        #[arg(long)]
        config: Option<String>,

        /// Mask image (SVG or any raster format); particles spawn on its opaque pixels
        #[arg(long, conflicts_with = "shapes")]
        mask: Option<String>,

        /// Shape document (SVG or TOML); particles spawn inside its shapes
        #[arg(long)]
        shapes: Option<String>,

        /// Canvas width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Number of frames to simulate
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Milliseconds per frame
        #[arg(long, default_value = "16.7")]
        delta: f32,

        /// Config overrides applied before init (key=value, repeatable)
        #[arg(long = "set")]
        set: Vec<String>,

        /// Frame at which the --tune overrides are applied
        #[arg(long, requires = "tune")]
        tune_at: Option<u32>,

        /// Config overrides applied live at --tune-at (key=value, repeatable)
        #[arg(long)]
        tune: Vec<String>,

        /// Cursor position over the canvas (comma-separated x,y)
        #[arg(long, value_parser = parse_vec2)]
        cursor: Option<[f32; 2]>,

        /// Frame at which the cursor enters the canvas
        #[arg(long, default_value = "0")]
        cursor_from: u32,

        /// Fixed RNG seed
        #[arg(long)]
        seed: Option<u32>,

        /// Output image path
        #[arg(short, long, default_value = "wisp.png")]
        output: String,
    },

    /// Rasterize a mask image and report its eligible spawn points
    Mask {
        /// Mask image path
        image: String,

        /// Canvas width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Inset in pixels
        #[arg(long, default_value = "20")]
        padding: u32,
    },

    /// Print the configuration as TOML
    Config {
        /// Path to a config TOML file to start from
        #[arg(long)]
        config: Option<String>,

        /// Overrides (key=value, repeatable)
        #[arg(long = "set")]
        set: Vec<String>,
    },
}

fn parse_vec2(s: &str) -> Result<[f32; 2], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok([x, y])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            mask,
            shapes,
            width,
            height,
            frames,
            delta,
            set,
            tune_at,
            tune,
            cursor,
            cursor_from,
            seed,
            output,
        } => run::run(run::RunArgs {
            config,
            mask,
            shapes,
            width,
            height,
            frames,
            delta,
            set,
            tune_at,
            tune,
            cursor,
            cursor_from,
            seed,
            output,
        }),
        Commands::Mask {
            image,
            width,
            height,
            padding,
        } => mask::run(&image, width, height, padding),
        Commands::Config { config, set } => config::run(config.as_deref(), &set),
    }
}
