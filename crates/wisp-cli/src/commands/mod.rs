//! CLI command implementations

pub mod config;
pub mod mask;
pub mod run;
