//! Simulation constants (parsed from TOML) and partial updates for live tuning

use serde::{Deserialize, Serialize};
use std::path::Path;
use wisp_core::{Result, Rgb, WispError};

/// Tunable constants shared by every particle in a system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub max_particles: usize,
    pub base_size: f32,
    pub size_deviation: f32,
    /// Idle-phase budget in milliseconds
    pub base_life: f32,
    pub life_deviation: f32,
    pub mass: f32,
    pub cursor_gravity: f32,
    pub attraction_radius: f32,
    pub upward_force: f32,
    /// Per-tick velocity multiplier, (0, 1]
    pub friction: f32,
    pub base_annihilation_radius: f32,
    /// Opacity lost per tick while annihilating
    pub annihilation_speed: f32,
    pub drift_speed: f32,
    /// `#rrggbb` strings
    pub base_colors: Vec<String>,
    /// Mask inset in pixels
    pub padding: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 10_000,
            base_size: 0.7,
            size_deviation: 0.8,
            base_life: 1000.0,
            life_deviation: 800.0,
            mass: 1.0,
            cursor_gravity: 1.0,
            attraction_radius: 100.0,
            upward_force: 0.005,
            friction: 0.99,
            base_annihilation_radius: 10.0,
            annihilation_speed: 0.05,
            drift_speed: 0.1,
            base_colors: vec!["#d4e4ff".to_string(), "#bddaff".to_string()],
            padding: 20,
        }
    }
}

impl ParticleConfig {
    /// Parse from TOML; missing keys keep their defaults
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the invariants every particle relies on
    pub fn validate(&self) -> Result<()> {
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(WispError::ValueOutOfRange {
                field: "friction".into(),
                min: 0.0,
                max: 1.0,
                value: self.friction as f64,
            });
        }

        let non_negative = [
            ("size_deviation", self.size_deviation),
            ("life_deviation", self.life_deviation),
            ("attraction_radius", self.attraction_radius),
            ("annihilation_speed", self.annihilation_speed),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(WispError::InvalidConfig(format!(
                    "{field} must be >= 0, got {value}"
                )));
            }
        }

        let finite = [
            ("base_size", self.base_size),
            ("base_life", self.base_life),
            ("mass", self.mass),
            ("cursor_gravity", self.cursor_gravity),
            ("upward_force", self.upward_force),
            ("base_annihilation_radius", self.base_annihilation_radius),
            ("drift_speed", self.drift_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(WispError::InvalidConfig(format!(
                    "{field} must be finite, got {value}"
                )));
            }
        }

        if self.base_colors.is_empty() {
            return Err(WispError::EmptyCollection);
        }
        for color in &self.base_colors {
            Rgb::from_hex_str(color)?;
        }
        Ok(())
    }

    /// Shallow merge: every field set in `patch` overwrites the current value
    pub fn apply(&mut self, patch: &ConfigPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = &patch.$field {
                    self.$field = v.clone();
                })*
            };
        }
        merge!(
            max_particles,
            base_size,
            size_deviation,
            base_life,
            life_deviation,
            mass,
            cursor_gravity,
            attraction_radius,
            upward_force,
            friction,
            base_annihilation_radius,
            annihilation_speed,
            drift_speed,
            base_colors,
            padding,
        );
    }
}

/// A partial `ParticleConfig`; unset fields are left alone on merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigPatch {
    pub max_particles: Option<usize>,
    pub base_size: Option<f32>,
    pub size_deviation: Option<f32>,
    pub base_life: Option<f32>,
    pub life_deviation: Option<f32>,
    pub mass: Option<f32>,
    pub cursor_gravity: Option<f32>,
    pub attraction_radius: Option<f32>,
    pub upward_force: Option<f32>,
    pub friction: Option<f32>,
    pub base_annihilation_radius: Option<f32>,
    pub annihilation_speed: Option<f32>,
    pub drift_speed: Option<f32>,
    pub base_colors: Option<Vec<String>>,
    pub padding: Option<u32>,
}

impl ConfigPatch {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Build a patch from `key=value` pairs, e.g. `friction=0.95` or
    /// `base_colors=#ff0000,#00ff00`. Bare strings and comma lists are quoted for you.
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self> {
        let mut lines = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let Some((key, value)) = assignment.split_once('=') else {
                return Err(WispError::InvalidConfig(format!(
                    "expected key=value, got '{assignment}'"
                )));
            };
            let key = key.trim();
            lines.push(format!("{} = {}", key, toml_literal(key, value.trim())));
        }
        Self::from_toml(&lines.join("\n"))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Pass numbers and arrays through; quote anything else
fn toml_literal(key: &str, value: &str) -> String {
    if value.starts_with('[') || value.starts_with('"') || value.parse::<f64>().is_ok() {
        return value.to_string();
    }
    if key == "base_colors" || value.contains(',') {
        let items: Vec<String> = value
            .split(',')
            .map(|item| format!("\"{}\"", item.trim()))
            .collect();
        return format!("[{}]", items.join(", "));
    }
    format!("\"{value}\"")
}
