//! Query string source.
//!
//! [`QuerySource`] decodes a URL query string once and serves the first
//! value of each key.

use std::collections::HashMap;

use http::Uri;
use valextract::{Source, SourceError};

use crate::HttpSourceError;

/// Source backed by URL query parameters.
///
/// Keys may repeat; [`Source::get`] returns the first value, and an empty
/// first value is reported as [`SourceError::NotFound`]. All values remain
/// available through [`QuerySource::get_all`].
///
/// # Example
///
/// ```rust
/// use valextract::convert::{as_string, as_u64};
/// use valextract::Extractor;
/// use valextract_http::QuerySource;
///
/// let query = QuerySource::parse("name=John&age=30&tag=a&tag=b").unwrap();
/// let mut name = String::new();
/// let mut age = 0;
///
/// let mut ex = Extractor::using(&query);
/// ex.with("name", as_string(&mut name));
/// ex.with("age", as_u64(&mut age));
///
/// assert_eq!(name, "John");
/// assert_eq!(age, 30);
/// assert_eq!(query.get_all("tag"), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySource {
    values: HashMap<String, Vec<String>>,
}

impl QuerySource {
    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored.
    pub fn parse(query: &str) -> Result<Self, HttpSourceError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(pairs.into_iter().collect())
    }

    /// Decodes the query component of `uri`. A URI without one yields an
    /// empty source.
    pub fn from_uri(uri: &Uri) -> Result<Self, HttpSourceError> {
        Self::parse(uri.query().unwrap_or(""))
    }

    /// Returns every value for `key` in the order they appeared.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `key` appeared at least once, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no keys were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Appends `value` after any existing values for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }
}

impl Source for QuerySource {
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        match self.values.get(key).and_then(|values| values.first()) {
            Some(value) if !value.is_empty() => Ok(value.as_str()),
            _ => Err(SourceError::NotFound),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QuerySource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = Self::default();
        source.extend(iter);
        source
    }
}

impl<K, V> Extend<(K, V)> for QuerySource
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valextract::convert::{as_string, as_u64};
    use valextract::{ErrorKind, Extractor};

    #[test]
    fn test_parse_simple() {
        let query = QuerySource::parse("name=John&age=30").unwrap();

        assert_eq!(query.len(), 2);
        assert_eq!(query.get("name").unwrap(), "John");
        assert_eq!(query.get("age").unwrap(), "30");
    }

    #[test]
    fn test_leading_question_mark() {
        let query = QuerySource::parse("?q=rust").unwrap();
        assert_eq!(query.get("q").unwrap(), "rust");
    }

    #[test]
    fn test_url_decoding() {
        let query = QuerySource::parse("q=hello+world&path=%2Fhome%2Fuser").unwrap();

        assert_eq!(query.get("q").unwrap(), "hello world");
        assert_eq!(query.get("path").unwrap(), "/home/user");
    }

    #[test]
    fn test_malformed_percent_escape_is_literal() {
        let query = QuerySource::parse("q=100%&r=%zz&s=%4").unwrap();

        assert_eq!(query.get("q").unwrap(), "100%");
        assert_eq!(query.get("r").unwrap(), "%zz");
        assert_eq!(query.get("s").unwrap(), "%4");
    }

    #[test]
    fn test_first_value_wins() {
        let query = QuerySource::parse("tag=a&tag=b&tag=c").unwrap();

        assert_eq!(query.get("tag").unwrap(), "a");
        assert_eq!(query.get_all("tag"), ["a", "b", "c"]);
        assert!(query.get_all("none").is_empty());
    }

    #[test]
    fn test_empty_value_is_not_found() {
        let query = QuerySource::parse("name=&flag").unwrap();

        assert!(query.contains_key("name"));
        assert!(query.get("name").unwrap_err().is_not_found());
        assert!(query.get("flag").unwrap_err().is_not_found());
        assert!(query.get("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_first_value_hides_later_values() {
        let query = QuerySource::parse("name=&name=John").unwrap();
        assert!(query.get("name").unwrap_err().is_not_found());
    }

    #[test]
    fn test_from_uri() {
        let uri: Uri = "http://localhost:8080/users?name=John&age=30".parse().unwrap();
        let query = QuerySource::from_uri(&uri).unwrap();

        assert_eq!(query.get("name").unwrap(), "John");
    }

    #[test]
    fn test_from_uri_without_query() {
        let uri = Uri::from_static("/users");
        let query = QuerySource::from_uri(&uri).unwrap();

        assert!(query.is_empty());
    }

    #[test]
    fn test_optional_keys_with_query() {
        let uri: Uri = "http://localhost:8080?name=John".parse().unwrap();
        let query = QuerySource::from_uri(&uri).unwrap();
        let mut name = String::new();
        let mut age = 0;

        let mut ex = Extractor::with_optional_keys(&query, ["age"]);
        ex.with("name", as_string(&mut name));
        ex.with("age", as_u64(&mut age));

        assert_eq!(name, "John");
        assert!(ex.errors().is_empty());
    }

    #[test]
    fn test_required_empty_value_reports_not_found() {
        let query = QuerySource::parse("age=").unwrap();
        let mut age = 0;

        let mut ex = Extractor::using(&query);
        ex.with("age", as_u64(&mut age));

        assert_eq!(ex.errors().len(), 1);
        assert_eq!(ex.errors()[0].kind(), ErrorKind::NotFound);
    }
}
