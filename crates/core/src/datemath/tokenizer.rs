//! Splits the text inside `date(...)` into individual arguments.

use crate::error::{InterpolateError, Result};

/// Split a raw argument list on top-level commas.
///
/// Commas inside a quoted run (`'...'` or `"..."`) or inside nested
/// parentheses do not split. Each argument is trimmed and one pair of
/// surrounding matching quotes is removed. Blank input yields no arguments.
///
/// Error positions are byte offsets into `input`.
pub fn split_arguments(input: &str) -> Result<Vec<&str>> {
    let mut args = Vec::new();
    if input.trim().is_empty() {
        return Ok(args);
    }

    let mut quote: Option<(char, usize)> = None;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if let Some((q, _)) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some((c, i)),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(take_argument(input, start, i)?);
                start = i + 1;
            }
            _ => {}
        }
    }

    if let Some((_, pos)) = quote {
        return Err(InterpolateError::syntax(pos, "unterminated quote"));
    }
    args.push(take_argument(input, start, input.len())?);

    Ok(args)
}

fn take_argument(input: &str, start: usize, end: usize) -> Result<&str> {
    let trimmed = input[start..end].trim();
    if trimmed.is_empty() {
        return Err(InterpolateError::syntax(start, "empty argument"));
    }
    Ok(strip_quotes(trimmed))
}

fn strip_quotes(s: &str) -> &str {
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_quoted_arguments() {
        let args = split_arguments("'-1days', 'YYYY-MM-DD'").unwrap();
        assert_eq!(args, vec!["-1days", "YYYY-MM-DD"]);
    }

    #[test]
    fn test_split_double_quotes_and_bare_words() {
        let args = split_arguments(r#""start of year" , -1years"#).unwrap();
        assert_eq!(args, vec!["start of year", "-1years"]);
    }

    #[test]
    fn test_comma_inside_quotes_is_not_a_split() {
        let args = split_arguments("'year,-1,GETDATE()'").unwrap();
        assert_eq!(args, vec!["year,-1,GETDATE()"]);
    }

    #[test]
    fn test_comma_inside_parens_is_not_a_split() {
        let args = split_arguments("year, GETDATE(a, b)").unwrap();
        assert_eq!(args, vec!["year", "GETDATE(a, b)"]);
    }

    #[test]
    fn test_blank_input_has_no_arguments() {
        assert!(split_arguments("").unwrap().is_empty());
        assert!(split_arguments("   ").unwrap().is_empty());
    }

    #[test]
    fn test_empty_quoted_argument_is_kept() {
        let args = split_arguments("''").unwrap();
        assert_eq!(args, vec![""]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = split_arguments("'-1days', 'YYYY").unwrap_err();
        assert_eq!(err, InterpolateError::syntax(10, "unterminated quote"));
    }

    #[test]
    fn test_trailing_comma() {
        let err = split_arguments("'YYYY',").unwrap_err();
        assert_eq!(err, InterpolateError::syntax(7, "empty argument"));
    }

    #[test]
    fn test_leading_and_doubled_commas() {
        assert!(split_arguments(", 'YYYY'").is_err());
        assert!(split_arguments("'-1days',,'YYYY'").is_err());
    }

    #[test]
    fn test_mismatched_quotes_are_not_stripped() {
        let args = split_arguments(r#"'abc""#);
        // the single quote never closes
        assert!(args.is_err());

        let args = split_arguments(r#"a'b'"#).unwrap();
        assert_eq!(args, vec!["a'b'"]);
    }
}
