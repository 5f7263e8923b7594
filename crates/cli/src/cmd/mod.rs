pub mod doctor;
pub mod document;
pub mod eval;
pub mod render;

use datefill_core::config::{ConfigError, ResolvedConfig};
use tracing::error;

/// Run `f` with the loaded config, or report the load failure.
///
/// Returns the process exit code.
pub fn with_config(
    loaded: Result<ResolvedConfig, ConfigError>,
    f: impl FnOnce(&ResolvedConfig) -> i32,
) -> i32 {
    match loaded {
        Ok(rc) => f(&rc),
        Err(e) => {
            error!("Failed to load config: {e}");
            1
        }
    }
}
