//! Finds `{{date(...)}}` markers in a string and substitutes them.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::datemath::evaluate_arguments;
use crate::error::{InterpolateError, Result};
use crate::options::InterpolationOptions;

const OPEN: &str = "{{date(";
const CLOSE: &str = "}}";

/// Replace every marker in `input` with its evaluated date.
///
/// Markers are matched with a balanced, quote-aware parenthesis scan, so a
/// `)` or `}}` inside a quoted argument does not end the marker early.
/// Returns the input borrowed when it contains no markers.
pub fn substitute<'a>(
    input: &'a str,
    reference: NaiveDateTime,
    options: &InterpolationOptions,
) -> Result<Cow<'a, str>> {
    let mut out = String::new();
    let mut cursor = 0;

    while let Some(found) = input[cursor..].find(OPEN) {
        let marker_start = cursor + found;
        let args_start = marker_start + OPEN.len();
        let close = find_closing_paren(input, marker_start, args_start)?;

        if !input[close + 1..].starts_with(CLOSE) {
            return Err(InterpolateError::syntax(close + 1, "expected `}}` after `)`"));
        }
        let marker_end = close + 1 + CLOSE.len();

        let value = evaluate_arguments(&input[args_start..close], reference, options)
            .map_err(|e| e.offset_by(args_start))?;
        debug!(marker = &input[marker_start..marker_end], result = %value, "evaluated date marker");

        out.push_str(&input[cursor..marker_start]);
        out.push_str(&value);
        cursor = marker_end;
    }

    if cursor == 0 {
        return Ok(Cow::Borrowed(input));
    }
    out.push_str(&input[cursor..]);
    Ok(Cow::Owned(out))
}

/// Byte index of the `)` matching the `(` that ends `{{date(`.
fn find_closing_paren(input: &str, marker_start: usize, args_start: usize) -> Result<usize> {
    let mut depth = 1usize;
    let mut quote: Option<(char, usize)> = None;

    for (i, c) in input[args_start..].char_indices() {
        let pos = args_start + i;
        if let Some((q, _)) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some((c, pos)),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
            }
            _ => {}
        }
    }

    match quote {
        Some((_, pos)) => Err(InterpolateError::syntax(pos, "unterminated quote in date marker")),
        None => Err(InterpolateError::syntax(marker_start, "unterminated date marker")),
    }
}
