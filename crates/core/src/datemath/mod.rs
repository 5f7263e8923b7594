//! The `date(...)` expression language.
//!
//! A marker's argument list is processed in three stages:
//! - [`tokenizer`] splits the raw text into arguments (syntax errors)
//! - [`operation`] classifies each argument into an [`Operation`]
//!   (invalid-expression errors)
//! - [`evaluator`] folds the operations over a reference instant and renders
//!   the result with a [`FormatPattern`]
//!
//! Supported arguments:
//! - `'-1days'`, `'+2months'` (seconds through years)
//! - `'start of week'`, `'end of year'` (year through second)
//! - `'YYYY-MM-DD HH:mm'` as the last argument

pub mod evaluator;
pub mod format;
pub mod operation;
pub mod tokenizer;

pub use evaluator::{apply, evaluate};
pub use format::{DEFAULT_PATTERN, FormatPattern};
pub use operation::{CalendarUnit, DateExpr, DurationUnit, Operation, Sign, classify};
pub use tokenizer::split_arguments;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::options::InterpolationOptions;

/// Tokenize, classify and evaluate the text inside `date(...)`.
pub fn evaluate_arguments(
    raw: &str,
    reference: NaiveDateTime,
    options: &InterpolationOptions,
) -> Result<String> {
    let args = split_arguments(raw)?;
    let expr = DateExpr::parse(&args)?;
    evaluate(&expr, reference, options)
}
