// src/config/mod.rs

//! Configuration loading and validation for logwait.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate that a wait can actually run (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, MatchResult, PatternConfig, RawConfigFile, WaitSection};
pub use validate::validate_config;
