// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Note what is *not* here: a missing log file, a failed read in the middle
//! of a scan and a timeout are all part of normal waiting and never surface
//! as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogwaitError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Trigger action failed: {0:#}")]
    Trigger(anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LogwaitError>;
