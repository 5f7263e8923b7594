//! Error types for marker scanning and date expression evaluation.

use thiserror::Error;

/// Errors raised while interpolating `{{date(...)}}` markers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterpolateError {
    /// Malformed marker or argument list (unbalanced quotes, missing `)}}`,
    /// empty arguments).
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    /// An argument is not an offset, a start/end anchor, or a format pattern.
    #[error("invalid date expression: {0}")]
    InvalidDateExpression(String),

    /// Applying an operation moved the date outside the representable range.
    #[error("date out of range while applying '{0}'")]
    OutOfRange(String),

    /// A failure inside a structured value, located by its path.
    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<InterpolateError>,
    },
}

/// The category of an [`InterpolateError`], ignoring any location wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    InvalidDateExpression,
    OutOfRange,
}

impl InterpolateError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax { position, message: message.into() }
    }

    /// Underlying category, looking through `At` wrappers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::InvalidDateExpression(_) => ErrorKind::InvalidDateExpression,
            Self::OutOfRange(_) => ErrorKind::OutOfRange,
            Self::At { source, .. } => source.kind(),
        }
    }

    /// Shift a syntax error position by `offset` bytes.
    ///
    /// The tokenizer reports positions relative to the argument text; the
    /// scanner rebases them onto the full string.
    #[must_use]
    pub(crate) fn offset_by(self, offset: usize) -> Self {
        match self {
            Self::Syntax { position, message } => {
                Self::Syntax { position: position + offset, message }
            }
            other => other,
        }
    }

    /// Prefix the location of a failure with one more path segment.
    ///
    /// Called on the way out of the value walker, so the outermost segment
    /// is prepended last.
    #[must_use]
    pub(crate) fn nested(self, segment: &str) -> Self {
        match self {
            Self::At { path, source } => Self::At { path: format!("{segment}{path}"), source },
            other => Self::At { path: segment.to_string(), source: Box::new(other) },
        }
    }
}

pub type Result<T> = std::result::Result<T, InterpolateError>;
