use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A deserialization failure located by its JSON path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("at JSON path {path} → {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

impl PathError {
    fn from_track<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> Self {
        let path = err.path().to_string();
        Self { path, message: err.into_inner().to_string() }
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(PathError::from_track)
}

/// Same as [`from_str_with_path`] for an already parsed document.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, PathError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(PathError::from_track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        items: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        id: i64,
    }

    #[test]
    fn error_reports_nested_path() {
        let err = from_str_with_path::<Outer>(r#"{"items":[{"id":1},{"id":"x"}]}"#).unwrap_err();
        assert_eq!(err.path, "items[1].id");
        assert!(err.to_string().starts_with("at JSON path items[1].id → "));
    }

    #[test]
    fn value_errors_carry_path_too() {
        let err = from_value_with_path::<Outer>(serde_json::json!({"items": [{}]})).unwrap_err();
        assert_eq!(err.path, "items[0]");
        assert!(err.message.contains("missing field `id`"));
    }
}
