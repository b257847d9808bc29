//! The extraction session.
//!
//! An [`Extractor`] binds one [`Source`] to any number of `with` calls and
//! collects every failure instead of stopping at the first one.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    ConversionError, Converter, ExtractionError, ExtractionErrors, Source, SourceError,
};

/// Outcome of a single lookup-and-convert step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The value was found and converted.
    Converted,
    /// The key was absent and absence was allowed.
    Skipped,
    /// A failure was recorded.
    Failed,
}

/// Extraction session over a borrowed [`Source`].
///
/// Every `with` call is attempted regardless of earlier failures. Values
/// that convert successfully are written to their destinations; failures are
/// appended to an ordered error list the caller inspects at the end.
///
/// Keys declared optional (up front with [`Extractor::with_optional_keys`] or
/// per call with [`Extractor::with_optional`]) may be absent without error.
/// Optionality never hides source faults or conversion failures.
///
/// An `Extractor` is single-owner and not meant to be shared across threads.
///
/// # Example
///
/// ```rust
/// use valextract::convert::{as_string, as_u64};
/// use valextract::{Extractor, MapSource};
///
/// let source = MapSource::new().with("id", "123").with("name", "John");
///
/// let mut id = 0;
/// let mut name = String::new();
///
/// let mut ex = Extractor::using(&source);
/// ex.with("id", as_u64(&mut id));
/// ex.with("name", as_string(&mut name));
///
/// assert_eq!(id, 123);
/// assert_eq!(name, "John");
/// assert!(ex.errors().is_empty());
/// ```
pub struct Extractor<'s> {
    source: &'s dyn Source,
    errors: Vec<ExtractionError>,
    optional_keys: HashSet<String>,
}

impl<'s> Extractor<'s> {
    /// Creates a session over `source` with no optional keys.
    pub fn using(source: &'s dyn Source) -> Self {
        Self {
            source,
            errors: Vec::new(),
            optional_keys: HashSet::new(),
        }
    }

    /// Creates a session where absence of any of `keys` is not an error.
    ///
    /// ```rust
    /// use valextract::convert::{as_string, as_u64};
    /// use valextract::{Extractor, MapSource};
    ///
    /// let source = MapSource::new().with("name", "John");
    /// let mut name = String::new();
    /// let mut age = 0;
    ///
    /// let mut ex = Extractor::with_optional_keys(&source, ["age"]);
    /// ex.with("name", as_string(&mut name));
    /// ex.with("age", as_u64(&mut age));
    ///
    /// assert_eq!(age, 0);
    /// assert!(ex.joined_errors().is_none());
    /// ```
    pub fn with_optional_keys<I, K>(source: &'s dyn Source, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            source,
            errors: Vec::new(),
            optional_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Declares one more optional key.
    pub fn optional_key(mut self, key: impl Into<String>) -> Self {
        self.optional_keys.insert(key.into());
        self
    }

    /// Returns `true` if absence of `key` is allowed.
    #[must_use]
    pub fn is_optional(&self, key: &str) -> bool {
        self.optional_keys.contains(key)
    }

    /// Returns the source this session reads from.
    #[must_use]
    pub fn source(&self) -> &'s dyn Source {
        self.source
    }

    /// Looks up `key` and converts it.
    ///
    /// Absence is recorded as a not-found failure unless the key was declared
    /// optional. Any other source failure and any conversion failure is
    /// always recorded.
    pub fn with(&mut self, key: &str, converter: Converter<'_>) {
        let optional = self.is_optional(key);
        self.extract(key, converter, optional);
    }

    /// Like [`with`](Self::with), but absence of `key` is never an error.
    pub fn with_optional(&mut self, key: &str, converter: Converter<'_>) {
        self.extract(key, converter, true);
    }

    pub(crate) fn extract(
        &mut self,
        key: &str,
        converter: Converter<'_>,
        optional: bool,
    ) -> Outcome {
        let source = self.source;
        match source.get(key) {
            Ok(raw) => match converter(self, raw) {
                Ok(()) => Outcome::Converted,
                Err(err) => {
                    self.add_convert_error(key, err);
                    Outcome::Failed
                }
            },
            Err(err) if optional && err.is_not_found() => {
                trace!(key, "optional key absent");
                Outcome::Skipped
            }
            Err(err) => {
                self.add_extract_error(key, err);
                Outcome::Failed
            }
        }
    }

    /// Records a source failure for `key`.
    pub fn add_extract_error(&mut self, key: &str, err: SourceError) {
        self.push(ExtractionError::extract(key, err));
    }

    /// Records a conversion failure for `key`.
    pub fn add_convert_error(&mut self, key: &str, err: ConversionError) {
        self.push(ExtractionError::convert(key, err));
    }

    fn push(&mut self, err: ExtractionError) {
        debug!(key = err.key(), kind = %err.kind(), error = %err, "extraction failed");
        self.errors.push(err);
    }

    /// Returns the recorded failures in call order. Empty when none occurred.
    #[must_use]
    pub fn errors(&self) -> &[ExtractionError] {
        &self.errors
    }

    /// Returns `true` if at least one failure was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns all failures combined into one error, or `None`.
    #[must_use]
    pub fn joined_errors(&self) -> Option<ExtractionErrors> {
        ExtractionErrors::from_vec(self.errors.clone())
    }

    /// Ends the session, returning the combined failures if any.
    ///
    /// ```rust
    /// use valextract::convert::as_u64;
    /// use valextract::{Extractor, ExtractionErrors, MapSource};
    ///
    /// fn port(source: &MapSource) -> Result<u64, ExtractionErrors> {
    ///     let mut port = 0;
    ///     let mut ex = Extractor::using(source);
    ///     ex.with("port", as_u64(&mut port));
    ///     ex.finish()?;
    ///     Ok(port)
    /// }
    ///
    /// assert_eq!(port(&MapSource::new().with("port", "8080")).unwrap(), 8080);
    /// assert!(port(&MapSource::new()).is_err());
    /// ```
    pub fn finish(self) -> Result<(), ExtractionErrors> {
        match ExtractionErrors::from_vec(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }

    /// Ends the session, returning the raw failure list.
    #[must_use]
    pub fn into_errors(self) -> Vec<ExtractionError> {
        self.errors
    }
}

impl std::fmt::Debug for Extractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("errors", &self.errors)
            .field("optional_keys", &self.optional_keys)
            .finish_non_exhaustive()
    }
}
