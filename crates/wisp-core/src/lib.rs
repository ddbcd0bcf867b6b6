//! Wisp Core - Foundational types for the Wisp particle engine
//!
//! This crate provides the core types that all other Wisp crates depend on:
//! - `Vec2` - Canvas-space positions and velocities (y-down, x-right)
//! - `Rgb`, `Rgba` - Particle colors and fill styles
//! - `ParticleRng` - xorshift PRNG with gaussian, uniform and without-replacement sampling
//! - Error types and Result alias

mod error;
pub mod rand;
mod types;

pub use error::{Result, WispError};
pub use rand::ParticleRng;
pub use types::{Rgb, Rgba, Vec2};
