//! Reading and writing JSON/YAML documents.

use color_eyre::eyre::{Result, WrapErr};
use datefill_core::TemplateValue;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

use crate::DocFormat;

/// Read a document from `path`, or from stdin when no path is given.
pub fn read(path: Option<&Path>, format: DocFormat) -> Result<TemplateValue> {
    let text = match path {
        Some(p) => fs::read_to_string(p)
            .wrap_err_with(|| format!("failed to read {}", p.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).wrap_err("failed to read stdin")?;
            buf
        }
    };
    parse(&text, format)
}

pub fn parse(text: &str, format: DocFormat) -> Result<TemplateValue> {
    match format {
        DocFormat::Json => serde_json::from_str(text).wrap_err("input is not valid JSON"),
        DocFormat::Yaml => serde_yaml::from_str(text).wrap_err("input is not valid YAML"),
    }
}

pub fn write(value: &TemplateValue, format: DocFormat) -> Result<String> {
    match format {
        DocFormat::Json => {
            let mut out = serde_json::to_string_pretty(value).wrap_err("failed to write JSON")?;
            out.push('\n');
            Ok(out)
        }
        DocFormat::Yaml => serde_yaml::to_string(value).wrap_err("failed to write YAML"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_keeps_scalars() {
        let value = parse(r#"{"b": [1, true, null], "a": "x"}"#, DocFormat::Json).unwrap();
        let out = write(&value, DocFormat::Json).unwrap();
        assert_eq!(parse(&out, DocFormat::Json).unwrap(), value);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_yaml_to_json() {
        let value = parse("a: 1\nb:\n  - x\n", DocFormat::Yaml).unwrap();
        let out = write(&value, DocFormat::Json).unwrap();
        assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": [\n    \"x\"\n  ]\n}\n");
    }

    #[test]
    fn test_invalid_input() {
        let err = parse("{nope", DocFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "input is not valid JSON");
    }
}
