//! Value-returning helpers.
//!
//! These wrap [`Extractor::with`] so the caller does not have to declare the
//! destination up front. Failures are recorded on the extractor exactly as
//! the manual call would record them.
//!
//! ```rust
//! use valextract::convert::{as_string, as_u64};
//! use valextract::result::result;
//! use valextract::{Extractor, MapSource};
//!
//! let source = MapSource::new().with("name", "John").with("age", "30");
//! let mut ex = Extractor::using(&source);
//!
//! let name = result(&mut ex, "name", as_string);
//! let age = result(&mut ex, "age", as_u64);
//!
//! assert_eq!(name, "John");
//! assert_eq!(age, 30);
//! assert!(ex.errors().is_empty());
//! ```

use crate::convert::{as_bool, as_f64, as_i64, as_string, as_u64};
use crate::extractor::Outcome;
use crate::{Converter, Extractor};

/// Extracts `key` into a fresh `T::default()` and returns it.
pub fn result<T, F>(ex: &mut Extractor<'_>, key: &str, factory: F) -> T
where
    T: Default,
    F: for<'a> FnOnce(&'a mut T) -> Converter<'a>,
{
    let mut value = T::default();
    ex.with(key, factory(&mut value));
    value
}

/// Like [`result`], but returns the value on the heap.
pub fn result_boxed<T, F>(ex: &mut Extractor<'_>, key: &str, factory: F) -> Box<T>
where
    T: Default,
    F: for<'a> FnOnce(&'a mut T) -> Converter<'a>,
{
    let mut value = Box::<T>::default();
    ex.with(key, factory(&mut *value));
    value
}

/// Extracts `key` with optional-key semantics.
///
/// Returns `None` when the key is absent (no failure recorded) or when the
/// lookup or conversion failed (failure recorded).
pub fn result_optional<T, F>(ex: &mut Extractor<'_>, key: &str, factory: F) -> Option<T>
where
    T: Default,
    F: for<'a> FnOnce(&'a mut T) -> Converter<'a>,
{
    let mut value = T::default();
    match ex.extract(key, factory(&mut value), true) {
        Outcome::Converted => Some(value),
        Outcome::Skipped | Outcome::Failed => None,
    }
}

/// Extracts `key` as a string.
pub fn return_string(ex: &mut Extractor<'_>, key: &str) -> String {
    result(ex, key, as_string)
}

/// Extracts `key` as an unsigned 64-bit integer.
pub fn return_u64(ex: &mut Extractor<'_>, key: &str) -> u64 {
    result(ex, key, as_u64)
}

/// Extracts `key` as a signed 64-bit integer.
pub fn return_i64(ex: &mut Extractor<'_>, key: &str) -> i64 {
    result(ex, key, as_i64)
}

/// Extracts `key` as a 64-bit float.
pub fn return_f64(ex: &mut Extractor<'_>, key: &str) -> f64 {
    result(ex, key, as_f64)
}

/// Extracts `key` as a boolean.
pub fn return_bool(ex: &mut Extractor<'_>, key: &str) -> bool {
    result(ex, key, as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, MapSource};

    #[test]
    fn test_result_by_value() {
        let source = MapSource::new().with("name", "John").with("age", "30");
        let mut ex = Extractor::using(&source);

        assert_eq!(result(&mut ex, "name", as_string), "John");
        assert_eq!(result(&mut ex, "age", as_u64), 30);
        assert!(ex.errors().is_empty());
    }

    #[test]
    fn test_result_boxed() {
        let source = MapSource::new().with("name", "John");
        let mut ex = Extractor::using(&source);

        let name = result_boxed(&mut ex, "name", as_string);
        assert_eq!(*name, "John");
    }

    #[test]
    fn test_result_records_like_with() {
        let source = MapSource::new().with("age", "abc");
        let mut ex = Extractor::using(&source);

        assert_eq!(result(&mut ex, "age", as_u64), 0);
        assert_eq!(result(&mut ex, "missing", as_i64), 0);

        let kinds: Vec<_> = ex.errors().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, [ErrorKind::Conversion, ErrorKind::NotFound]);
    }

    #[test]
    fn test_result_respects_declared_optional_keys() {
        let source = MapSource::new();
        let mut ex = Extractor::with_optional_keys(&source, ["age"]);

        assert_eq!(result(&mut ex, "age", as_u64), 0);
        assert!(ex.errors().is_empty());
    }

    #[test]
    fn test_result_optional() {
        let source = MapSource::new().with("age", "41").with("bad", "x");
        let mut ex = Extractor::using(&source);

        assert_eq!(result_optional(&mut ex, "age", as_u64), Some(41));
        assert_eq!(result_optional(&mut ex, "missing", as_u64), None);
        assert!(ex.errors().is_empty());

        assert_eq!(result_optional(&mut ex, "bad", as_u64), None);
        assert_eq!(ex.errors().len(), 1);
        assert!(ex.errors()[0].is_convert_error());
    }

    #[test]
    fn test_typed_shortcuts() {
        let source = MapSource::new()
            .with("name", "John")
            .with("age", "30")
            .with("delta", "-3")
            .with("ratio", "0.25")
            .with("admin", "true");
        let mut ex = Extractor::using(&source);

        assert_eq!(return_string(&mut ex, "name"), "John");
        assert_eq!(return_u64(&mut ex, "age"), 30);
        assert_eq!(return_i64(&mut ex, "delta"), -3);
        assert!((return_f64(&mut ex, "ratio") - 0.25).abs() < f64::EPSILON);
        assert!(return_bool(&mut ex, "admin"));
        assert!(ex.errors().is_empty());
    }
}
