//! Key/value sources.
//!
//! A [`Source`] looks up a raw string value by key. The in-memory maps of
//! the standard library implement it directly; [`MapSource`] is an owned
//! convenience wrapper. Request-backed sources live in `valextract-http`.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::SourceError;

/// Trait for stores that can produce a string value for a key.
///
/// Implementations must return [`SourceError::NotFound`] when the key is
/// absent rather than an empty value. Lookups take `&self` so that one
/// source can be shared by several [`Extractor`](crate::Extractor)s; sources
/// that memoise work do so through interior mutability.
///
/// # Implementing `Source`
///
/// ```rust
/// use valextract::{Source, SourceError};
///
/// struct Env;
///
/// impl Source for Env {
///     fn get(&self, key: &str) -> Result<&str, SourceError> {
///         match key {
///             "region" => Ok("eu-west-1"),
///             _ => Err(SourceError::NotFound),
///         }
///     }
/// }
///
/// assert_eq!(Env.get("region").unwrap(), "eu-west-1");
/// assert!(Env.get("zone").unwrap_err().is_not_found());
/// ```
pub trait Source {
    /// Looks up the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] if the key is absent, or another
    /// [`SourceError`] if the underlying store failed.
    fn get(&self, key: &str) -> Result<&str, SourceError>;
}

impl<T: Source + ?Sized> Source for &T {
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        (**self).get(key)
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        (**self).get(key)
    }
}

// Presence decides "found"; an empty value is returned as-is.
impl<K, V, S> Source for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        HashMap::get(self, key)
            .map(AsRef::as_ref)
            .ok_or(SourceError::NotFound)
    }
}

impl<K, V> Source for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        BTreeMap::get(self, key)
            .map(AsRef::as_ref)
            .ok_or(SourceError::NotFound)
    }
}

/// Owned in-memory source.
///
/// # Example
///
/// ```rust
/// use valextract::{MapSource, Source};
///
/// let source: MapSource = [("id", "123"), ("name", "John")].into_iter().collect();
///
/// assert_eq!(source.get("id").unwrap(), "123");
/// assert!(source.get("age").unwrap_err().is_not_found());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Adds a value, consuming and returning the source.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the source holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Source for MapSource {
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        Source::get(&self.values, key)
    }
}

impl From<HashMap<String, String>> for MapSource {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_map_lookup() {
        let mut map = HashMap::new();
        map.insert("id".to_string(), "123".to_string());

        assert_eq!(Source::get(&map, "id").unwrap(), "123");
        assert!(Source::get(&map, "name").unwrap_err().is_not_found());
    }

    #[test]
    fn test_map_empty_value_is_found() {
        let map: HashMap<&str, &str> = [("name", "")].into_iter().collect();

        assert_eq!(Source::get(&map, "name").unwrap(), "");
    }

    #[test]
    fn test_btree_map_lookup() {
        let map: BTreeMap<String, String> =
            [("a".to_string(), "1".to_string())].into_iter().collect();

        assert_eq!(Source::get(&map, "a").unwrap(), "1");
        assert!(Source::get(&map, "b").unwrap_err().is_not_found());
    }

    #[test]
    fn test_map_source_builder() {
        let source = MapSource::new().with("a", "1").with("b", "2").with("a", "3");

        assert_eq!(source.len(), 2);
        assert!(!source.is_empty());
        assert_eq!(source.get("a").unwrap(), "3");
    }

    #[test]
    fn test_boxed_dyn_source() {
        let source: Box<dyn Source> = Box::new(MapSource::new().with("k", "v"));

        assert_eq!(source.get("k").unwrap(), "v");
        assert!(source.get("x").unwrap_err().is_not_found());
    }
}
