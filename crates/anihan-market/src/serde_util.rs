//! Deserializers that accept both the SQLite row shape and the JSON API shape.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

/// Accept `true`/`false`, `0`/`1` or `null` (false).
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}

/// Accept a JSON array, a string holding a JSON array, or `null` (empty).
///
/// Unparseable text yields an empty list.
pub fn json_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(text) => Ok(serde_json::from_str(&text).unwrap_or_default()),
        other @ serde_json::Value::Array(_) => {
            serde_json::from_value(other).map_err(de::Error::custom)
        }
        other => Err(de::Error::custom(format!("expected a list, got {other}"))),
    }
}

/// Accept a string or `null` (empty string).
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tell an explicit `null` from an absent field in a patch.
///
/// Use with `#[serde(default)]`: absent is `None`, `null` is `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "flag")]
        active: bool,
        #[serde(default, deserialize_with = "json_list")]
        history: Vec<i64>,
        #[serde(default, deserialize_with = "text")]
        note: String,
        #[serde(default, deserialize_with = "nullable")]
        source: Option<Option<i64>>,
    }

    #[test]
    fn test_flag_accepts_ints_and_bools() {
        let s: Sample = serde_json::from_str(r#"{"active": 1}"#).unwrap();
        assert!(s.active);
        let s: Sample = serde_json::from_str(r#"{"active": false}"#).unwrap();
        assert!(!s.active);
        let s: Sample = serde_json::from_str(r#"{"active": null}"#).unwrap();
        assert!(!s.active);
    }

    #[test]
    fn test_json_list_accepts_text_and_arrays() {
        let s: Sample = serde_json::from_str(r#"{"active": 1, "history": "[1,2]"}"#).unwrap();
        assert_eq!(s.history, vec![1, 2]);
        let s: Sample = serde_json::from_str(r#"{"active": 1, "history": [3]}"#).unwrap();
        assert_eq!(s.history, vec![3]);
        let s: Sample = serde_json::from_str(r#"{"active": 1, "history": "oops"}"#).unwrap();
        assert!(s.history.is_empty());
        let s: Sample = serde_json::from_str(r#"{"active": 1}"#).unwrap();
        assert!(s.history.is_empty());
    }

    #[test]
    fn test_text_accepts_null() {
        let s: Sample = serde_json::from_str(r#"{"active": 1, "note": null}"#).unwrap();
        assert_eq!(s.note, "");
    }

    #[test]
    fn test_nullable_tells_null_from_absent() {
        let s: Sample = serde_json::from_str(r#"{"active": 1}"#).unwrap();
        assert_eq!(s.source, None);
        let s: Sample = serde_json::from_str(r#"{"active": 1, "source": null}"#).unwrap();
        assert_eq!(s.source, Some(None));
        let s: Sample = serde_json::from_str(r#"{"active": 1, "source": 4}"#).unwrap();
        assert_eq!(s.source, Some(Some(4)));
    }
}
