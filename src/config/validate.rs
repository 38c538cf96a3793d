// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LogwaitError, Result};
use crate::waiter::WaitOptions;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LogwaitError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let options = WaitOptions {
            timeout: raw.wait.effective_timeout()?,
            scan_interval: raw.wait.effective_scan_interval()?,
        };
        let path = raw.wait.path.ok_or_else(missing_path)?;

        Ok(ConfigFile::new_unchecked(
            path,
            options,
            raw.wait.trigger,
            raw.pattern,
        ))
    }
}

/// Run every check against a raw (possibly CLI-merged) config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_path(cfg)?;
    ensure_has_patterns(cfg)?;
    validate_wait_section(cfg)?;
    validate_patterns(cfg)?;
    Ok(())
}

fn missing_path() -> LogwaitError {
    LogwaitError::ConfigError(
        "no log file given: set [wait].path or pass --file".to_string(),
    )
}

fn ensure_has_path(cfg: &RawConfigFile) -> Result<()> {
    match &cfg.wait.path {
        Some(p) if !p.as_os_str().is_empty() => Ok(()),
        _ => Err(missing_path()),
    }
}

fn ensure_has_patterns(cfg: &RawConfigFile) -> Result<()> {
    if cfg.pattern.is_empty() {
        return Err(LogwaitError::ConfigError(
            "config must contain at least one [[pattern]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_wait_section(cfg: &RawConfigFile) -> Result<()> {
    let options = WaitOptions {
        timeout: cfg.wait.effective_timeout()?,
        scan_interval: cfg.wait.effective_scan_interval()?,
    };
    options.validate()
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<()> {
    for p in &cfg.pattern {
        if p.text.is_empty() {
            return Err(LogwaitError::ConfigError(format!(
                "pattern with result '{}' has an empty `match`",
                p.result
            )));
        }
    }

    // Compiling catches duplicates and bad regexes with the same errors the
    // waiter would produce.
    ConfigFile::new_unchecked(Default::default(), WaitOptions::default(), None, cfg.pattern.clone())
        .pattern_table()
        .map(|_| ())
}
