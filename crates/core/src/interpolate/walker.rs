//! Recursive traversal of structured values.

use chrono::NaiveDateTime;

use super::scanner::substitute;
use super::value::TemplateValue;
use crate::error::{InterpolateError, Result};
use crate::options::InterpolationOptions;

/// Walks a value, substituting markers in every string it contains.
pub(crate) struct Walker<'a> {
    reference: NaiveDateTime,
    options: &'a InterpolationOptions,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(reference: NaiveDateTime, options: &'a InterpolationOptions) -> Self {
        Self { reference, options }
    }

    /// Build a new value with every string interpolated.
    ///
    /// Failures inside a mapping or sequence are reported with their path
    /// from the root (`$.items[2].due`).
    pub(crate) fn walk(&self, value: &TemplateValue) -> Result<TemplateValue> {
        self.transform(value).map_err(|e| match e {
            located @ InterpolateError::At { .. } => located.nested("$"),
            other => other,
        })
    }

    fn transform(&self, value: &TemplateValue) -> Result<TemplateValue> {
        match value {
            TemplateValue::String(s) => {
                let rendered = substitute(s, self.reference, self.options)?;
                Ok(TemplateValue::String(rendered.into_owned()))
            }
            TemplateValue::Sequence(items) => {
                let rendered = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.transform(item).map_err(|e| e.nested(&format!("[{i}]")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(TemplateValue::Sequence(rendered))
            }
            TemplateValue::Mapping(map) => {
                let rendered = map
                    .iter()
                    .map(|(k, v)| -> Result<(String, TemplateValue)> {
                        let v = self.transform(v).map_err(|e| e.nested(&key_segment(k)))?;
                        Ok((k.clone(), v))
                    })
                    .collect::<Result<_>>()?;
                Ok(TemplateValue::Mapping(rendered))
            }
            // Other types (numbers, bools, null) pass through unchanged
            TemplateValue::Null | TemplateValue::Bool(_) | TemplateValue::Number(_) => {
                Ok(value.clone())
            }
        }
    }
}

fn key_segment(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!(".{key}")
    } else {
        format!("[{key:?}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn walk(value: &TemplateValue) -> Result<TemplateValue> {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 7, 9).unwrap();
        let options = InterpolationOptions::default();
        Walker::new(reference, &options).walk(value)
    }

    #[test]
    fn test_scalars_pass_through() {
        for value in [TemplateValue::Null, true.into(), TemplateValue::from(13_i64)] {
            assert_eq!(walk(&value).unwrap(), value);
        }
    }

    #[test]
    fn test_nested_structure() {
        let input: TemplateValue = [
            ("name", TemplateValue::from("report")),
            ("since", "{{date('-1days')}}".into()),
            ("range", vec!["{{date('start of month')}}", "{{date('end of month')}}"].into()),
            ("meta", [("{{date()}}", TemplateValue::from(false))].into_iter().collect()),
        ]
        .into_iter()
        .collect();

        let expected: TemplateValue = [
            ("name", TemplateValue::from("report")),
            ("since", "2024-03-04".into()),
            ("range", vec!["2024-03-01", "2024-03-31"].into()),
            ("meta", [("{{date()}}", TemplateValue::from(false))].into_iter().collect()),
        ]
        .into_iter()
        .collect();

        assert_eq!(walk(&input).unwrap(), expected);
    }

    #[test]
    fn test_error_path() {
        let input: TemplateValue = [(
            "items",
            TemplateValue::from(vec![
                TemplateValue::from("ok"),
                [("due date", "{{date('nope')}}")].into_iter().collect(),
            ]),
        )]
        .into_iter()
        .collect();

        let err = walk(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDateExpression);
        assert_eq!(err.to_string(), r#"$.items[1]["due date"]: invalid date expression: nope"#);
    }

    #[test]
    fn test_root_string_error_has_no_path() {
        let err = walk(&"{{date('nope')}}".into()).unwrap_err();
        assert_eq!(err, InterpolateError::InvalidDateExpression("nope".into()));
    }

    #[test]
    fn test_key_segments() {
        assert_eq!(key_segment("due_at"), ".due_at");
        assert_eq!(key_segment("due date"), "[\"due date\"]");
        assert_eq!(key_segment(""), "[\"\"]");
    }
}
