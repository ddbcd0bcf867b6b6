//! Error types for Wisp

use thiserror::Error;

/// The main error type for Wisp operations
#[derive(Debug, Error)]
pub enum WispError {
    #[error("Cannot pick a random element from an empty collection")]
    EmptyCollection,

    #[error("Sample size {requested} is larger than the population of {available}")]
    InsufficientPopulation { requested: usize, available: usize },

    #[error("Failed to load resource: {0}")]
    ResourceLoad(String),

    #[error("No spawn point found after {attempts} attempts")]
    NoSpawnPointFound { attempts: u32 },

    #[error("Required element not found: {0}")]
    MissingElement(String),

    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Wisp operations
pub type Result<T> = std::result::Result<T, WispError>;

impl From<toml::de::Error> for WispError {
    fn from(err: toml::de::Error) -> Self {
        WispError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for WispError {
    fn from(err: toml::ser::Error) -> Self {
        WispError::TomlSerError(err.to_string())
    }
}
