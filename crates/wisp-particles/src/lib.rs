//! Wisp Particles - cursor-reactive 2D particle simulation
//!
//! Provides a frame-driven particle system with:
//! - Per-particle lifecycle: fade in, idle, fade out, annihilation near the cursor
//! - Upward drift, cursor attraction and friction integrated each tick
//! - Pluggable spawn strategies (rasterized pixel mask or vector shapes)
//! - Live config merging with full resample or lazy regrowth
//!
//! Rendering goes through the `DrawSurface` trait; the crate never rasterizes itself.

pub mod clock;
pub mod config;
pub mod particle;
pub mod spawn;
pub mod surface;
pub mod system;

pub use clock::FrameClock;
pub use config::{ConfigPatch, ParticleConfig};
pub use particle::{Cursor, Environment, Particle, ParticleState};
pub use spawn::{MaskPoints, Reconcile, ShapeSpawner, SpawnStrategy};
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};
pub use system::{DegradedReason, ParticleSystem, RegionSource, SystemStatus};
pub use wisp_core::ParticleRng;
