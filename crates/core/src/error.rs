//! Error types for encounter construction and configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or running an encounter.
#[derive(Debug, Error, PartialEq)]
pub enum EncounterError {
    #[error("boss {boss} has no attack patterns in phase {phase}")]
    NoAttackPatterns { boss: String, phase: u8 },
}

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config TOML")]
    ParseToml(#[from] toml::de::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}
