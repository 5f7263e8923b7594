//! The structured values the interpolator walks.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// A JSON/YAML-shaped value.
///
/// Any JSON or YAML document deserializes into it. Scalar mapping keys
/// (`2024:`, `true:`, `~:`) are stored as their string form. Mapping key
/// order carries no meaning; keys are kept sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum TemplateValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<TemplateValue>),
    Mapping(BTreeMap<String, TemplateValue>),
}

impl TemplateValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, TemplateValue::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TemplateValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key if this is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for TemplateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = TemplateValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON or YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(TemplateValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(TemplateValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TemplateValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Number::from_f64(v)
            .map(TemplateValue::Number)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &"a finite number"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(TemplateValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(TemplateValue::String(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(TemplateValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(TemplateValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        TemplateValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<TemplateValue>()? {
            items.push(item);
        }
        Ok(TemplateValue::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: BTreeMap<String, TemplateValue> = BTreeMap::new();
        while let Some((MappingKey(key), value)) = map.next_entry()? {
            entries.insert(key, value);
        }
        Ok(TemplateValue::Mapping(entries))
    }
}

/// A mapping key, accepting any scalar and keeping its string form.
struct MappingKey(String);

impl<'de> Deserialize<'de> for MappingKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor)
    }
}

struct KeyVisitor;

impl Visitor<'_> for KeyVisitor {
    type Value = MappingKey;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar mapping key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(MappingKey(v))
    }

    // YAML `~:` keys
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MappingKey("null".to_string()))
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::String(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::String(s)
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<i64> for TemplateValue {
    fn from(n: i64) -> Self {
        TemplateValue::Number(n.into())
    }
}

impl<T: Into<TemplateValue>> From<Vec<T>> for TemplateValue {
    fn from(items: Vec<T>) -> Self {
        TemplateValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> FromIterator<(K, V)> for TemplateValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TemplateValue::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => TemplateValue::Null,
            Value::Bool(b) => TemplateValue::Bool(b),
            Value::Number(n) => TemplateValue::Number(n),
            Value::String(s) => TemplateValue::String(s),
            Value::Array(items) => items.into(),
            Value::Object(map) => map.into_iter().collect(),
        }
    }
}

impl From<TemplateValue> for serde_json::Value {
    fn from(value: TemplateValue) -> Self {
        use serde_json::Value;
        match value {
            TemplateValue::Null => Value::Null,
            TemplateValue::Bool(b) => Value::Bool(b),
            TemplateValue::Number(n) => Value::Number(n),
            TemplateValue::String(s) => Value::String(s),
            TemplateValue::Sequence(items) => {
                Value::Array(items.into_iter().map(Into::into).collect())
            }
            TemplateValue::Mapping(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_json() {
        let value: TemplateValue =
            serde_json::from_str(r#"{"a": "x", "b": 13, "c": true, "d": null, "e": [1.5]}"#)
                .unwrap();
        let expected: TemplateValue = [
            ("a", TemplateValue::from("x")),
            ("b", TemplateValue::from(13_i64)),
            ("c", true.into()),
            ("d", TemplateValue::Null),
            ("e", TemplateValue::Sequence(vec![TemplateValue::Number(
                Number::from_f64(1.5).unwrap(),
            )])),
        ]
        .into_iter()
        .collect();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = "title: report\nrange:\n  - \"{{date('start of month')}}\"\n  - ~\ncount: 3\n";
        let value: TemplateValue = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(value.get("title").and_then(TemplateValue::as_str), Some("report"));
        assert_eq!(value.get("count"), Some(&TemplateValue::from(3_i64)));
        assert_eq!(
            value.get("range"),
            Some(&TemplateValue::Sequence(vec!["{{date('start of month')}}".into(), TemplateValue::Null]))
        );
    }

    #[test]
    fn test_deserialize_yaml_scalar_keys() {
        let yaml = "2024: \"{{date()}}\"\ntrue: x\n~: y\n1.5: z\nname: report\n";
        let value: TemplateValue = serde_yaml::from_str(yaml).unwrap();
        let expected: TemplateValue = [
            ("2024", "{{date()}}"),
            ("true", "x"),
            ("null", "y"),
            ("1.5", "z"),
            ("name", "report"),
        ]
        .into_iter()
        .collect();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_nested_mapping_keys() {
        let value: TemplateValue = serde_yaml::from_str("years:\n  2023: [a]\n  -1: false\n").unwrap();
        let years = value.get("years").unwrap();
        assert_eq!(years.get("2023"), Some(&TemplateValue::from(vec!["a"])));
        assert_eq!(years.get("-1"), Some(&TemplateValue::Bool(false)));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let err = serde_yaml::from_str::<TemplateValue>("x: .nan\n").unwrap_err();
        assert!(err.to_string().contains("a finite number"), "{err}");
    }

    #[test]
    fn test_serialize_null_and_nesting() {
        let value: TemplateValue = [("a", TemplateValue::Null), ("b", vec!["x"].into())].into_iter().collect();
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":null,"b":["x"]}"#);
    }

    #[test]
    fn test_json_value_conversion() {
        let json = json!({"a": [1, "two", false], "b": {"c": null}});
        let value = TemplateValue::from(json.clone());
        assert_eq!(serde_json::Value::from(value), json);
    }
}
