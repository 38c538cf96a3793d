#![allow(dead_code)]

use std::path::Path;

use logwait::config::{ConfigFile, PatternConfig, RawConfigFile};
use logwait::errors::Result;
use logwait::types::PatternKind;

/// Builder for `RawConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.wait.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn timeout(mut self, duration: &str) -> Self {
        self.config.wait.timeout = Some(duration.to_string());
        self
    }

    pub fn scan_interval(mut self, duration: &str) -> Self {
        self.config.wait.scan_interval = Some(duration.to_string());
        self
    }

    pub fn trigger(mut self, cmd: &str) -> Self {
        self.config.wait.trigger = Some(cmd.to_string());
        self
    }

    pub fn literal(mut self, text: &str, result: &str) -> Self {
        self.config
            .pattern
            .push(PatternConfig::new(PatternKind::Literal, text, result));
        self
    }

    pub fn regex(mut self, text: &str, result: &str) -> Self {
        self.config
            .pattern
            .push(PatternConfig::new(PatternKind::Regex, text, result));
        self
    }

    /// Set the exit code of the most recently added pattern.
    pub fn exit_code(mut self, code: i32) -> Self {
        if let Some(p) = self.config.pattern.last_mut() {
            p.exit_code = Some(code);
        }
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
