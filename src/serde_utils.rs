//! Serde helpers for patch-style payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize `Option<Option<T>>` to distinguish between missing field and null value.
///
/// Must be paired with `#[serde(default)]` so that a missing field never
/// reaches this function:
///
/// - Missing field → `None`
/// - Field is `null` → `Some(None)`
/// - Field has value → `Some(Some(value))`
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
///     description: Option<Option<String>>,
/// }
/// ```
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn missing_field_is_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.description, None);
    }

    #[test]
    fn null_is_some_none() {
        let patch: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(patch.description, Some(None));
    }

    #[test]
    fn value_is_some_some() {
        let patch: Patch = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert_eq!(patch.description, Some(Some(String::new())));
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(serde_json::from_str::<Patch>(r#"{"description": 5}"#).is_err());
    }
}
