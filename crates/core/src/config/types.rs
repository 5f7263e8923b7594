use std::path::PathBuf;

use serde::Deserialize;

use crate::datemath::DEFAULT_PATTERN;
use crate::options::{Clock, InterpolationOptions};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `[interpolation]` table, before validation.
#[derive(Debug, Deserialize, Clone)]
pub struct InterpolationConfig {
    /// Pattern for markers without a format argument.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Day that `start of week` snaps to ("sunday", "mon", ...).
    #[serde(default = "default_week_start")]
    pub week_start: String,
    #[serde(default)]
    pub clock: Clock,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            week_start: default_week_start(),
            clock: Clock::default(),
        }
    }
}

fn default_format() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_week_start() -> String {
    "sunday".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// File the settings were read from; `None` when running on defaults.
    pub source: Option<PathBuf>,
    pub options: InterpolationOptions,
    pub logging: LoggingConfig,
}
