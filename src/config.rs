//! Tunables for debounce delays, viewport slack and the diff primitive.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GutterConfig {
    /// Debounce for edits that change the line count
    pub fast_delay_ms: u64,
    /// Debounce for everything else
    pub slow_delay_ms: u64,
    /// How far the viewport may move away from the annotated window before
    /// annotations are rebuilt from scratch
    pub viewport_slack: usize,
    pub show_differences: bool,
    pub diff_timeout_ms: u64,
}

impl Default for GutterConfig {
    fn default() -> Self {
        GutterConfig {
            fast_delay_ms: 20,
            slow_delay_ms: 250,
            viewport_slack: 20,
            show_differences: true,
            diff_timeout_ms: 1000,
        }
    }
}

impl GutterConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn fast_delay(&self) -> Duration {
        Duration::from_millis(self.fast_delay_ms)
    }

    pub fn slow_delay(&self) -> Duration {
        Duration::from_millis(self.slow_delay_ms)
    }

    pub fn diff_timeout(&self) -> Duration {
        Duration::from_millis(self.diff_timeout_ms)
    }
}
