//! Headless simulation command

use crate::raster::RasterSurface;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use wisp_core::{ParticleRng, Vec2, WispError};
use wisp_mask::{ImageSource, ShapeDocument};
use wisp_particles::{ConfigPatch, ParticleState, ParticleSystem, RegionSource, SystemStatus};

pub struct RunArgs {
    pub config: Option<String>,
    pub mask: Option<String>,
    pub shapes: Option<String>,
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub delta: f32,
    pub set: Vec<String>,
    pub tune_at: Option<u32>,
    pub tune: Vec<String>,
    pub cursor: Option<[f32; 2]>,
    pub cursor_from: u32,
    pub seed: Option<u32>,
    pub output: String,
}

pub fn run(args: RunArgs) -> Result<()> {
    if args.mask.is_none() && args.shapes.is_none() {
        bail!("Either --mask or --shapes is required");
    }
    if !args.delta.is_finite() || args.delta < 0.0 {
        bail!("--delta must be a non-negative number of milliseconds");
    }

    let config = super::config::resolve(args.config.as_deref(), &args.set)?;
    let tune = ConfigPatch::from_assignments(&args.tune).context("Invalid --tune override")?;

    let rng = args
        .seed
        .map(ParticleRng::new)
        .unwrap_or_else(ParticleRng::from_clock);
    let mut system = ParticleSystem::new(config, (args.width, args.height)).with_rng(rng);

    init_system(&mut system, &args)?;
    match system.status() {
        SystemStatus::Inert => bail!("Particle system could not be initialized"),
        SystemStatus::Degraded(reason) => {
            log::warn!("Running degraded ({:?}), frames will be empty", reason)
        }
        SystemStatus::Running => {}
    }

    println!(
        "Simulating {} frame(s) of {}ms on a {}x{} canvas",
        args.frames, args.delta, args.width, args.height
    );

    let mut surface = RasterSurface::new(args.width, args.height);
    for frame in 0..args.frames {
        if args.tune_at == Some(frame) && !tune.is_empty() {
            match system.set_config(&tune) {
                Ok(()) => log::info!("Applied config overrides at frame {}", frame),
                Err(e) => log::error!("Config overrides at frame {} rejected: {}", frame, e),
            }
        }
        if frame == args.cursor_from {
            if let Some([x, y]) = args.cursor {
                system.pointer_move(Vec2::new(x, y), Vec2::ZERO);
            }
        }

        system
            .tick(args.delta, &mut surface)
            .with_context(|| format!("Simulation failed at frame {}", frame))?;
    }

    surface
        .image()
        .save(&args.output)
        .with_context(|| format!("Failed to write '{}'", args.output))?;

    print_stats(&system);
    println!("Wrote {}", args.output);
    Ok(())
}

fn region_source(args: &RunArgs) -> Result<Option<RegionSource>> {
    if let Some(mask) = &args.mask {
        return Ok(Some(RegionSource::Mask(ImageSource::Path(PathBuf::from(mask)))));
    }
    if let Some(shapes) = &args.shapes {
        let document = ShapeDocument::load(Path::new(shapes))
            .with_context(|| format!("Failed to load shapes '{}'", shapes))?;
        return Ok(Some(RegionSource::Shapes(document)));
    }
    Ok(None)
}

/// Initialize, shrinking `max_particles` to fit a mask with too few opaque pixels
fn init_system(system: &mut ParticleSystem, args: &RunArgs) -> Result<()> {
    match system.init(region_source(args)?) {
        Err(WispError::InsufficientPopulation {
            requested,
            available,
        }) if available > 0 => {
            log::warn!(
                "Mask has only {} eligible point(s), lowering max_particles from {}",
                available,
                requested
            );
            let patch = ConfigPatch {
                max_particles: Some(available),
                ..Default::default()
            };
            system.set_config(&patch)?;
            system
                .init(region_source(args)?)
                .context("Failed to initialize particle system")
        }
        other => other.context("Failed to initialize particle system"),
    }
}

fn print_stats(system: &ParticleSystem) {
    let particles = system.particles();
    let count = |state: ParticleState| particles.iter().filter(|p| p.state == state).count();

    println!("Status: {:?}", system.status());
    println!(
        "Particles: {} / {}",
        particles.len(),
        system.config().max_particles
    );
    println!("  fade-in:      {}", count(ParticleState::FadeIn));
    println!("  idle:         {}", count(ParticleState::Idle));
    println!("  fade-out:     {}", count(ParticleState::FadeOut));
    println!("  annihilation: {}", count(ParticleState::Annihilation));
}
