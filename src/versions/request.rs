use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::de::value::MapDeserializer;

use crate::errors::{DatatableError, Result};

/// Raw request parameters as a flat string map, e.g. a decoded query string.
///
/// Only protocol versions look inside; the engine never reads raw parameters.
///
/// ```rust
/// use datatable::versions::RequestParams;
///
/// let params: RequestParams = [("draw", "1"), ("start", "0")].into_iter().collect();
/// assert_eq!(params.get("draw"), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    params: HashMap<String, String>,
}

impl RequestParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Boolean flag (`true`/`false`, case-insensitive); `default` when absent or unrecognised
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::to_ascii_lowercase).as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                tracing::warn!(key, value = other, "Ignoring non-boolean flag");
                default
            }
            None => default,
        }
    }

    /// Parse an optional index parameter
    ///
    /// # Errors
    ///
    /// Invalid request error when the parameter is present but not an unsigned integer.
    pub fn index(&self, key: &str) -> Result<Option<usize>> {
        self.get(key)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|_| {
                    DatatableError::invalid_request(format!(
                        "parameter '{key}' must be a non-negative integer, got '{value}'"
                    ))
                })
            })
            .transpose()
    }

    /// Deserialize the scalar parameters into a typed struct.
    ///
    /// Every value is presented as a string, so numeric fields need a
    /// string-parsing adapter such as `serde_with::DisplayFromStr`.
    ///
    /// # Errors
    ///
    /// Invalid request error when a value cannot be converted.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let entries = self.params.iter().map(|(key, value)| (key.as_str(), value.as_str()));
        let deserializer = MapDeserializer::<_, serde::de::value::Error>::new(entries);
        Ok(T::deserialize(deserializer)?)
    }
}

impl From<HashMap<String, String>> for RequestParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self { params }
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_with::{DisplayFromStr, serde_as};

    #[serde_as]
    #[derive(Debug, Deserialize)]
    struct Paging {
        #[serde_as(as = "DisplayFromStr")]
        #[serde(default)]
        start: i64,
        #[serde(rename = "search[value]", default)]
        search: String,
    }

    #[test]
    fn test_deserialize_typed_params() {
        let params: RequestParams = [("start", "20"), ("search[value]", "foo"), ("other", "x")]
            .into_iter()
            .collect();
        let paging: Paging = params.deserialize().unwrap();
        assert_eq!(paging.start, 20);
        assert_eq!(paging.search, "foo");
    }

    #[test]
    fn test_deserialize_defaults() {
        let paging: Paging = RequestParams::new().deserialize().unwrap();
        assert_eq!(paging.start, 0);
        assert_eq!(paging.search, "");
    }

    #[test]
    fn test_deserialize_invalid_number() {
        let params: RequestParams = [("start", "ten")].into_iter().collect();
        let err = params.deserialize::<Paging>().unwrap_err();
        assert!(matches!(err, DatatableError::InvalidRequest { .. }));
    }

    #[test]
    fn test_flag() {
        let params: RequestParams = [("a", "true"), ("b", "FALSE"), ("c", "yes")].into_iter().collect();
        assert!(params.flag("a", false));
        assert!(!params.flag("b", true));
        assert!(params.flag("c", true));
        assert!(!params.flag("missing", false));
    }

    #[test]
    fn test_index() {
        let params: RequestParams = [("i", "3"), ("bad", "-1")].into_iter().collect();
        assert_eq!(params.index("i").unwrap(), Some(3));
        assert_eq!(params.index("missing").unwrap(), None);
        assert!(params.index("bad").is_err());
    }

    #[test]
    fn test_from_hash_map() {
        let mut map = HashMap::new();
        map.insert("draw".to_string(), "2".to_string());
        let params = RequestParams::from(map);
        assert!(params.contains("draw"));
        assert_eq!(params.len(), 1);
    }
}
