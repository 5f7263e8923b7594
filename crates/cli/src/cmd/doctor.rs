use datefill_core::config::{default_config_path, ConfigError, ResolvedConfig};
use std::path::Path;

pub fn run(cfg_path: Option<&Path>, loaded: Result<ResolvedConfig, ConfigError>) -> i32 {
    match loaded {
        Ok(rc) => {
            println!("OK   datefill doctor");
            println!(
                "path: {}",
                rc.source
                    .as_ref()
                    .map_or_else(|| "(built-in defaults)".to_string(), |p| p.display().to_string())
            );
            println!("default_format: {}", rc.options.default_format);
            println!("week_start: {}", rc.options.week_start);
            println!("clock: {}", rc.options.clock.as_str());
            println!("logging.level: {}", rc.logging.level);
            println!(
                "logging.file: {}",
                rc.logging
                    .file
                    .as_ref()
                    .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
            );
            0
        }
        Err(e) => {
            println!("FAIL datefill doctor");
            println!("{e}");
            if cfg_path.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            1
        }
    }
}
