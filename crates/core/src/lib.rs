#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod datemath;
pub mod error;
pub mod interpolate;
pub mod options;

pub use datemath::FormatPattern;
pub use error::{ErrorKind, InterpolateError};
pub use interpolate::{Interpolator, TemplateValue, interpolate};
pub use options::{Clock, InterpolationOptions};
