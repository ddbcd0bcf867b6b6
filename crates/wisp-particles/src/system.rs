//! Owns the population, the spawn region, the cursor and the frame loop

use crate::clock::FrameClock;
use crate::config::{ConfigPatch, ParticleConfig};
use crate::particle::{Cursor, Environment, Particle};
use crate::spawn::{MaskPoints, Reconcile, ShapeSpawner, SpawnStrategy};
use crate::surface::DrawSurface;
use wisp_core::{ParticleRng, Result, Vec2, WispError};
use wisp_mask::{ImageSource, PixelMask, ShapeDocument, ShapeRegion};

/// Largest number of particles spawned in one tick under `Reconcile::Regrow`
const MAX_SPAWN_BATCH: f32 = 49.0;

/// What the spawn region is built from
pub enum RegionSource {
    /// Image rasterized into a canvas-sized mask, inset by `config.padding`
    Mask(ImageSource),
    /// Vector shapes tested on demand
    Shapes(ShapeDocument),
    /// Eligible canvas pixels computed elsewhere
    Points(Vec<Vec2>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DegradedReason {
    MaskLoadFailed(String),
    NoSpawnRegion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// Not initialized, or initialization found required elements missing
    Inert,
    Running,
    /// Initialized but unable to spawn anything
    Degraded(DegradedReason),
}

pub struct ParticleSystem {
    config: ParticleConfig,
    canvas_size: (u32, u32),
    particles: Vec<Particle>,
    spawner: Option<Box<dyn SpawnStrategy>>,
    reconcile: Option<Reconcile>,
    cursor: Cursor,
    clock: FrameClock,
    rng: ParticleRng,
    status: SystemStatus,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig, canvas_size: (u32, u32)) -> Self {
        Self {
            config,
            canvas_size,
            particles: Vec::new(),
            spawner: None,
            reconcile: None,
            cursor: Cursor::default(),
            clock: FrameClock::new(),
            rng: ParticleRng::from_clock(),
            status: SystemStatus::Inert,
        }
    }

    pub fn with_rng(mut self, rng: ParticleRng) -> Self {
        self.rng = rng;
        self
    }

    /// Override the policy the spawn strategy would otherwise pick
    pub fn with_reconcile(mut self, reconcile: Reconcile) -> Self {
        self.reconcile = Some(reconcile);
        self
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas_size
    }

    /// Distinct spawn points available, if the region is finite
    pub fn capacity(&self) -> Option<usize> {
        self.spawner.as_ref().and_then(|s| s.capacity())
    }

    /// Active reconciliation policy, once a spawn region exists
    pub fn reconcile(&self) -> Option<Reconcile> {
        self.reconcile
            .or_else(|| self.spawner.as_ref().map(|s| s.default_reconcile()))
    }

    /// Build the spawn region and the initial population.
    ///
    /// Missing required elements leave the system inert, a mask that fails to load leaves
    /// it degraded; both are logged and return `Ok`. An invalid config and sampling
    /// errors propagate and leave the system inert.
    pub fn init(&mut self, source: Option<RegionSource>) -> Result<()> {
        self.config.validate()?;
        let (width, height) = self.canvas_size;
        if width == 0 || height == 0 {
            log::error!("[particles] Required elements not found: canvas is {width}x{height}");
            return Ok(());
        }
        let Some(source) = source else {
            log::error!("[particles] Required elements not found: no spawn region source");
            return Ok(());
        };

        let strategy: Box<dyn SpawnStrategy> = match source {
            RegionSource::Mask(image) => {
                let mut mask = PixelMask::new(width, height);
                match mask.render_inset(&image, self.config.padding) {
                    Ok(()) => Box::new(MaskPoints::new(mask.extract_opaque_points())),
                    Err(err) => {
                        log::error!("[particles] Mask failed to load, no particles will spawn: {err}");
                        self.particles.clear();
                        self.spawner = None;
                        self.status = SystemStatus::Degraded(DegradedReason::MaskLoadFailed(
                            err.to_string(),
                        ));
                        return Ok(());
                    }
                }
            }
            RegionSource::Shapes(document) => {
                Box::new(ShapeSpawner::new(ShapeRegion::new(document), self.canvas_size))
            }
            RegionSource::Points(points) => Box::new(MaskPoints::new(points)),
        };

        self.init_with_strategy(strategy)
    }

    /// `init` for a caller-supplied spawn strategy
    pub fn init_with_strategy(&mut self, strategy: Box<dyn SpawnStrategy>) -> Result<()> {
        self.config.validate()?;
        let empty = strategy.is_empty();
        let name = strategy.name().to_string();
        self.spawner = Some(strategy);
        self.particles.clear();

        if empty {
            log::warn!("[particles] The {name} region has no eligible points");
            self.status = SystemStatus::Degraded(DegradedReason::NoSpawnRegion);
            return Ok(());
        }

        if self.reconcile() == Some(Reconcile::Resample) {
            self.set_points()?;
        }

        self.clock = FrameClock::new();
        self.status = SystemStatus::Running;
        log::info!(
            "[particles] Initialized {name} region ({:?}) with {} particle(s)",
            self.reconcile(),
            self.particles.len()
        );
        Ok(())
    }

    /// Replace the population with one particle per distinct spawn point,
    /// `max_particles` of them
    pub fn set_points(&mut self) -> Result<()> {
        let spawner = self
            .spawner
            .as_deref()
            .ok_or_else(|| WispError::MissingElement("spawn region".into()))?;

        let anchors = spawner.sample_unique(&mut self.rng, self.config.max_particles)?;
        let particles = anchors
            .into_iter()
            .map(|anchor| Particle::new(anchor, &self.config, &mut self.rng))
            .collect::<Result<Vec<_>>>()?;

        self.particles = particles;
        Ok(())
    }

    /// Merge `patch` into the live config and reconcile the population.
    /// On error the previous config and population are kept.
    pub fn set_config(&mut self, patch: &ConfigPatch) -> Result<()> {
        let previous = self.config.clone();
        self.config.apply(patch);

        if let Err(err) = self.reconcile_population() {
            self.config = previous;
            return Err(err);
        }
        Ok(())
    }

    fn reconcile_population(&mut self) -> Result<()> {
        self.config.validate()?;
        if self.status != SystemStatus::Running {
            return Ok(());
        }

        match self.reconcile() {
            Some(Reconcile::Resample) => {
                self.set_points()?;
                log::debug!("[particles] Resampled {} particle(s)", self.particles.len());
            }
            Some(Reconcile::Regrow) => {
                if self.config.max_particles < self.particles.len() {
                    self.particles.truncate(self.config.max_particles);
                    log::debug!("[particles] Truncated to {} particle(s)", self.particles.len());
                }
            }
            None => {}
        }
        Ok(())
    }

    /// Pointer moved; `client` and `canvas_origin` share a coordinate space
    pub fn pointer_move(&mut self, client: Vec2, canvas_origin: Vec2) {
        self.cursor.over = true;
        self.cursor.position = client - canvas_origin;
    }

    pub fn pointer_leave(&mut self) {
        self.cursor.over = false;
    }

    /// One display frame, timed by the wall clock
    pub fn animate(&mut self, surface: &mut dyn DrawSurface) -> Result<()> {
        let delta_ms = self.clock.tick();
        self.tick(delta_ms, surface)
    }

    /// One frame of `delta_ms` milliseconds: clear, grow, then update and draw each particle
    pub fn tick(&mut self, delta_ms: f32, surface: &mut dyn DrawSurface) -> Result<()> {
        if self.status == SystemStatus::Inert {
            return Ok(());
        }

        let (width, height) = self.canvas_size;
        surface.clear_rect(0.0, 0.0, width as f32, height as f32);

        if self.status == SystemStatus::Running && self.reconcile() == Some(Reconcile::Regrow) {
            self.grow()?;
        }

        let env = Environment {
            config: &self.config,
            cursor: &self.cursor,
        };
        // A failed reset only happens with an unvalidated config; the frame is still
        // finished so every particle is drawn exactly once
        let mut first_error = None;
        for particle in &mut self.particles {
            if let Err(err) = particle.update(delta_ms, &env, &mut self.rng) {
                first_error.get_or_insert(err);
            }
            particle.draw(surface);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Spawn a random batch toward `max_particles`
    fn grow(&mut self) -> Result<()> {
        let headroom = self.config.max_particles.saturating_sub(self.particles.len());
        if headroom == 0 {
            return Ok(());
        }
        let Some(spawner) = self.spawner.as_deref() else {
            return Ok(());
        };

        let batch = (self.rng.uniform_int(0.0, MAX_SPAWN_BATCH) as usize).min(headroom);
        for _ in 0..batch {
            let anchor = spawner.sample_one(&mut self.rng)?;
            self.particles
                .push(Particle::new(anchor, &self.config, &mut self.rng)?);
        }
        Ok(())
    }
}
