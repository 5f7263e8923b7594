//! Interpolation of `{{date(...)}}` markers in strings and structured values.
//!
//! ```
//! use datefill_core::{TemplateValue, interpolate};
//!
//! let value = TemplateValue::from("2015-01-01");
//! assert_eq!(interpolate(&value).unwrap(), value);
//! ```

pub mod scanner;
pub mod value;
mod walker;

pub use scanner::substitute;
pub use value::TemplateValue;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Result;
use crate::options::InterpolationOptions;
use walker::Walker;

/// Interpolates markers using a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    options: InterpolationOptions,
}

impl Interpolator {
    #[must_use]
    pub fn new(options: InterpolationOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &InterpolationOptions {
        &self.options
    }

    /// Interpolate `value` against the current time of the configured clock.
    ///
    /// The clock is read once; every marker in the value sees the same
    /// reference instant.
    pub fn interpolate(&self, value: &TemplateValue) -> Result<TemplateValue> {
        self.interpolate_at(value, self.options.clock.now())
    }

    /// Interpolate `value` against an explicit reference instant.
    pub fn interpolate_at(
        &self,
        value: &TemplateValue,
        reference: NaiveDateTime,
    ) -> Result<TemplateValue> {
        debug!(%reference, "interpolating value");
        Walker::new(reference, &self.options).walk(value)
    }

    /// Interpolate a single string against an explicit reference instant.
    pub fn interpolate_str(&self, input: &str, reference: NaiveDateTime) -> Result<String> {
        Ok(substitute(input, reference, &self.options)?.into_owned())
    }
}

/// Interpolate `value` with default options and the local clock.
///
/// Values without markers (including null, numbers and booleans) are
/// returned unchanged. The first malformed marker anywhere in the value
/// fails the whole call.
pub fn interpolate(value: &TemplateValue) -> Result<TemplateValue> {
    Interpolator::default().interpolate(value)
}
