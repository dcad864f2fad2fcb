//! Runtime configuration.
//!
//! Settings come from an optional JSON file named by `LOCKSTEP_CONFIG`,
//! then per-field environment overrides. Missing fields take their defaults.
//!
//! ```json
//! { "strict_masked_read": true, "flush_denormals": false, "log_features": true }
//! ```

use crate::fastmath::FastMathGuard;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the path of a JSON config file.
pub const CONFIG_PATH_ENV: &str = "LOCKSTEP_CONFIG";
pub const STRICT_MASKED_READ_ENV: &str = "LOCKSTEP_STRICT_MASKED_READ";
pub const FLUSH_DENORMALS_ENV: &str = "LOCKSTEP_FLUSH_DENORMALS";

/// Process-wide configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match Config::load() {
    Ok(config) => config,
    Err(e) => {
        log::warn!("falling back to default config: {e:#}");
        Config::default()
    }
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Panic on out-of-range indexed reads in every build, not only under
    /// debug assertions.
    pub strict_masked_read: bool,
    /// Have [`Config::fast_math`] enable flush-to-zero.
    pub flush_denormals: bool,
    /// Log the detected CPU features once at debug level.
    pub log_features: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_masked_read: false,
            flush_denormals: false,
            log_features: true,
        }
    }
}

impl Config {
    /// File named by `LOCKSTEP_CONFIG` (if set), then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        log::debug!("config loaded: {config:?}");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply overrides from `lookup`, which maps an environment variable
    /// name to its value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup(STRICT_MASKED_READ_ENV) {
            self.strict_masked_read = parse_flag(STRICT_MASKED_READ_ENV, &v)?;
        }
        if let Some(v) = lookup(FLUSH_DENORMALS_ENV) {
            self.flush_denormals = parse_flag(FLUSH_DENORMALS_ENV, &v)?;
        }
        Ok(())
    }

    /// A flush-to-zero guard when `flush_denormals` is set.
    ///
    /// # Safety
    ///
    /// Same contract as [`FastMathGuard::new`].
    #[must_use]
    pub unsafe fn fast_math(&self) -> Option<FastMathGuard> {
        // SAFETY: forwarded to the caller.
        self.flush_denormals.then(|| unsafe { FastMathGuard::new() })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("{key}: expected a boolean, got {other:?}"),
    }
}
