//! One particle: lifecycle state machine and force integration

use crate::config::ParticleConfig;
use crate::surface::DrawSurface;
use wisp_core::{ParticleRng, Result, Rgb, Vec2};

/// Milliseconds per internal physics time unit
const TIME_SCALE: f32 = 20.0;
/// Opacity gained per millisecond while fading in
const FADE_IN_RATE: f32 = 0.002;
/// Opacity lost per millisecond while fading out
const FADE_OUT_RATE: f32 = 0.001;
/// Fading particles at or above this line are recycled
const TOP_EDGE_GUARD: f32 = 5.0;
/// Per-tick velocity decay while annihilating, independent of friction
const ANNIHILATION_DAMPING: f32 = 0.9;
/// Floor on squared cursor distance, keeps attraction finite near the cursor
const MIN_DISTANCE_SQUARED: f32 = 100.0;
const MIN_SIZE: f32 = 0.1;
const ANNIHILATION_RADIUS_DEVIATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleState {
    FadeIn,
    Idle,
    FadeOut,
    Annihilation,
}

/// Cursor position in canvas-local pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cursor {
    pub position: Vec2,
    /// Whether the pointer is currently over the canvas
    pub over: bool,
}

/// Shared, read-only view of the owning system for one tick
pub struct Environment<'a> {
    pub config: &'a ParticleConfig,
    pub cursor: &'a Cursor,
}

#[derive(Debug, Clone)]
pub struct Particle {
    anchor: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radius in pixels
    pub size: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub max_opacity: f32,
    pub state: ParticleState,
    /// Milliseconds since the last reset
    pub life: f32,
    pub max_life: f32,
    pub annihilation_radius: f32,
}

impl Particle {
    /// A freshly reset particle anchored at `anchor`
    pub fn new(anchor: Vec2, config: &ParticleConfig, rng: &mut ParticleRng) -> Result<Self> {
        let mut particle = Self {
            anchor,
            position: anchor,
            velocity: Vec2::ZERO,
            size: MIN_SIZE,
            color: Rgb::default(),
            opacity: 0.0,
            max_opacity: 1.0,
            state: ParticleState::FadeIn,
            life: 0.0,
            max_life: 0.0,
            annihilation_radius: 0.0,
        };
        particle.reset(config, rng)?;
        Ok(particle)
    }

    /// The spawn point this particle returns to on every reset
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Re-roll every randomized attribute and return to the anchor in `FadeIn`
    pub fn reset(&mut self, config: &ParticleConfig, rng: &mut ParticleRng) -> Result<()> {
        self.color = Rgb::from_hex_str(rng.choose_one(&config.base_colors)?)?;

        self.size = rng.gaussian(config.base_size, config.size_deviation).max(MIN_SIZE);
        // Particles larger than the base size are drawn dimmer
        self.max_opacity = (config.base_size / self.size).min(1.0);

        self.position = self.anchor;
        self.velocity = rng.random_direction() * config.drift_speed;

        self.state = ParticleState::FadeIn;
        self.opacity = 0.0;
        self.life = 0.0;
        self.max_life = rng.gaussian(config.base_life, config.life_deviation);
        self.annihilation_radius =
            rng.gaussian(config.base_annihilation_radius, ANNIHILATION_RADIUS_DEVIATION);
        Ok(())
    }

    /// Advance one tick of `delta_ms` milliseconds
    pub fn update(
        &mut self,
        delta_ms: f32,
        env: &Environment<'_>,
        rng: &mut ParticleRng,
    ) -> Result<()> {
        self.life += delta_ms;
        let dt = delta_ms / TIME_SCALE;

        match self.state {
            ParticleState::FadeIn => {
                self.opacity += delta_ms * FADE_IN_RATE;
                if self.opacity >= self.max_opacity {
                    self.opacity = self.max_opacity;
                    self.state = ParticleState::Idle;
                }
            }
            ParticleState::Idle => {
                if self.life > self.max_life {
                    self.state = ParticleState::FadeOut;
                }
                self.integrate(dt, env);
            }
            ParticleState::FadeOut => {
                self.opacity -= delta_ms * FADE_OUT_RATE;
                self.integrate(dt, env);

                if self.opacity <= 0.0 || self.position.y <= TOP_EDGE_GUARD {
                    self.reset(env.config, rng)?;
                }
            }
            ParticleState::Annihilation => {
                self.opacity -= env.config.annihilation_speed;
                self.velocity *= ANNIHILATION_DAMPING;
                self.position += self.velocity * dt;

                if self.opacity <= 0.0 {
                    self.reset(env.config, rng)?;
                }
            }
        }
        Ok(())
    }

    fn apply_force(&mut self, force: Vec2, mass: f32) {
        self.velocity += force * mass;
    }

    /// Upward drift, cursor attraction, friction, then position.
    /// Entering annihilation ends the step early.
    fn integrate(&mut self, dt: f32, env: &Environment<'_>) {
        let config = env.config;
        self.apply_force(Vec2::new(0.0, -config.upward_force), config.mass);

        if env.cursor.over {
            let to_cursor = env.cursor.position - self.position;
            let distance_squared = to_cursor.length_squared();
            let distance = distance_squared.sqrt();

            if distance < config.attraction_radius {
                if distance < self.annihilation_radius
                    && self.state != ParticleState::Annihilation
                {
                    self.state = ParticleState::Annihilation;
                    return;
                }

                let force = config.cursor_gravity / distance_squared.max(MIN_DISTANCE_SQUARED);
                self.apply_force(to_cursor * force, config.mass);
            }
        }

        self.velocity *= config.friction;
        self.position += self.velocity * dt;
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.fill_circle(self.position, self.size, self.color.with_alpha(self.opacity));
    }
}
