//! Render command: interpolate a whole JSON or YAML document.

use datefill_core::config::ResolvedConfig;
use datefill_core::Interpolator;
use tracing::debug;

use super::document;
use crate::{DocFormat, RenderArgs};

pub fn run(rc: &ResolvedConfig, args: &RenderArgs) -> i32 {
    let input_format = args
        .input
        .or_else(|| args.file.as_deref().and_then(DocFormat::from_path))
        .unwrap_or(DocFormat::Json);
    let output_format = args.output.unwrap_or(input_format);

    let value = match document::read(args.file.as_deref(), input_format) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return 1;
        }
    };

    let reference = args.at.unwrap_or_else(|| rc.options.clock.now());
    debug!(?input_format, ?output_format, %reference, "rendering document");

    let rendered = match Interpolator::new(rc.options.clone()).interpolate_at(&value, reference)
    {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    match document::write(&rendered, output_format) {
        Ok(out) => {
            print!("{out}");
            0
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}
