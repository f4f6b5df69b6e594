//! Tolerant field decoders for loosely typed service payloads
//!
//! A field that is null, missing or of an unexpected type decodes to its empty
//! value instead of failing the whole response. Use with `#[serde(default)]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `None` when the value is null or does not fit `T`
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Empty list when the value is null or not a list of `T`
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(option(deserializer)?.unwrap_or_default())
}

/// Default value when the value is null or does not fit `T`
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(option(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "option")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "or_default")]
        label: String,
    }

    #[test]
    fn test_well_typed_values_decode() {
        let sample: Sample =
            serde_json::from_value(json!({"count": 3, "tags": ["a"], "label": "x"})).unwrap();
        assert_eq!(sample.count, Some(3));
        assert_eq!(sample.tags, vec!["a".to_string()]);
        assert_eq!(sample.label, "x");
    }

    #[test]
    fn test_null_and_mistyped_values_fall_back() {
        let sample: Sample =
            serde_json::from_value(json!({"count": "three", "tags": null, "label": 7})).unwrap();
        assert_eq!(sample.count, None);
        assert!(sample.tags.is_empty());
        assert_eq!(sample.label, "");
    }

    #[test]
    fn test_missing_values_fall_back() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample.count, None);
        assert!(sample.tags.is_empty());
    }
}
