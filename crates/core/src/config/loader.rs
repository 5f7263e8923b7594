use crate::config::types::{ConfigFile, LoggingConfig, ResolvedConfig};
use crate::datemath::FormatPattern;
use crate::options::InterpolationOptions;
use chrono::Weekday;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("default_format '{0}' is not a valid date pattern")]
    InvalidDefaultFormat(String),

    #[error("week_start '{0}' is not a weekday")]
    UnknownWeekday(String),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and built-in defaults are used if nothing is there.
    pub fn load(config_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = default_config_path();
                if !p.exists() {
                    return Ok(ResolvedConfig::default());
                }
                p
            }
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }

        let mut resolved = Self::resolve(&cf)?;
        resolved.source = Some(path);
        Ok(resolved)
    }

    fn resolve(cf: &ConfigFile) -> Result<ResolvedConfig, ConfigError> {
        let interp = &cf.interpolation;

        let default_format = FormatPattern::parse(&interp.default_format)
            .ok_or_else(|| ConfigError::InvalidDefaultFormat(interp.default_format.clone()))?;
        let week_start: Weekday = interp
            .week_start
            .parse()
            .map_err(|_| ConfigError::UnknownWeekday(interp.week_start.clone()))?;

        // Resolve log file path if present
        let logging = if let Some(ref file) = cf.logging.file {
            LoggingConfig {
                level: cf.logging.level.clone(),
                file_level: cf.logging.file_level.clone(),
                file: Some(expand_path(&file.to_string_lossy())?),
            }
        } else {
            cf.logging.clone()
        };

        Ok(ResolvedConfig {
            source: None,
            options: InterpolationOptions { default_format, week_start, clock: interp.clock },
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("datefill").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("datefill").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
