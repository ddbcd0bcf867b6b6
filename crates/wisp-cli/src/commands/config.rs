//! Config dump command

use anyhow::{Context, Result};
use std::path::Path;
use wisp_particles::{ConfigPatch, ParticleConfig};

/// Load a config (or the defaults) and apply `key=value` overrides
pub fn resolve(path: Option<&str>, overrides: &[String]) -> Result<ParticleConfig> {
    let mut config = match path {
        Some(path) => ParticleConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => ParticleConfig::default(),
    };

    let patch = ConfigPatch::from_assignments(overrides).context("Invalid --set override")?;
    config.apply(&patch);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn run(path: Option<&str>, overrides: &[String]) -> Result<()> {
    let config = resolve(path, overrides)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
