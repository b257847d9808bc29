//! Extraction error types.
//!
//! Failures fall into two classes: the [`Source`](crate::Source) could not
//! produce a value for a key ([`SourceError`]), or a value was produced but
//! could not be converted into its target type ([`ConversionError`]). The
//! orchestrator tags each failure with the offending key as an
//! [`ExtractionError`] and hands them back as an [`ExtractionErrors`]
//! collection.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared, cloneable handle to an underlying error cause.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Error returned by a [`Source`](crate::Source) lookup.
///
/// Only [`SourceError::NotFound`] can be suppressed by the optional-key
/// policy; every other variant is always recorded.
///
/// # Example
///
/// ```rust
/// use valextract::{Source, SourceError};
/// use std::collections::HashMap;
///
/// let map: HashMap<String, String> = HashMap::new();
/// let err = Source::get(&map, "missing").unwrap_err();
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The key is absent from the source.
    #[error("key not found")]
    NotFound,

    /// The source has no request to read from.
    #[error("request is missing")]
    MissingRequest,

    /// The request body could not be parsed as a form.
    #[error("error parsing form: {0}")]
    FormParse(#[source] SharedError),

    /// Any other source-level failure.
    #[error("{0}")]
    Other(#[source] SharedError),
}

impl SourceError {
    /// Wraps a body parse failure.
    pub fn form_parse<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::FormParse(Arc::new(cause))
    }

    /// Wraps an arbitrary source failure.
    pub fn other<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Other(Arc::new(cause))
    }

    /// Returns `true` if the key was absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Error produced by a converter when a raw value cannot be parsed.
#[derive(Debug, Clone)]
pub struct ConversionError {
    expected: Option<Cow<'static, str>>,
    cause: SharedError,
}

impl ConversionError {
    /// Creates an error naming the expected type and wrapping the parser error.
    pub fn new<E>(expected: impl Into<Cow<'static, str>>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            expected: Some(expected.into()),
            cause: Arc::new(cause),
        }
    }

    /// Creates an error from a plain message.
    ///
    /// Intended for user-defined converters that validate rather than parse.
    pub fn custom(message: impl Into<String>) -> Self {
        let boxed: Box<dyn StdError + Send + Sync> = message.into().into();
        Self {
            expected: None,
            cause: Arc::from(boxed),
        }
    }

    /// Returns the name of the type the value was expected to be.
    #[must_use]
    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    /// Returns the underlying parser error.
    #[must_use]
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(expected) => write!(f, "invalid {expected} value: {}", self.cause),
            None => write!(f, "{}", self.cause),
        }
    }
}

impl StdError for ConversionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Failure classification used for comparisons without string inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The key was absent.
    NotFound,
    /// The source failed for a reason other than absence.
    Source,
    /// The value was present but could not be converted.
    Conversion,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Source => write!(f, "source"),
            Self::Conversion => write!(f, "conversion"),
        }
    }
}

/// A single failure recorded by the [`Extractor`](crate::Extractor).
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// The source could not produce a value for the key.
    #[error("{key}: {source}")]
    Extract {
        /// Key that was looked up.
        key: String,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },

    /// The value for the key could not be converted.
    #[error("{key}: {source}")]
    Convert {
        /// Key whose value failed to convert.
        key: String,
        /// Underlying conversion failure.
        #[source]
        source: ConversionError,
    },
}

impl ExtractionError {
    /// Creates an extraction failure.
    pub fn extract(key: impl Into<String>, source: SourceError) -> Self {
        Self::Extract {
            key: key.into(),
            source,
        }
    }

    /// Creates a conversion failure.
    pub fn convert(key: impl Into<String>, source: ConversionError) -> Self {
        Self::Convert {
            key: key.into(),
            source,
        }
    }

    /// Returns the key the failure is tagged with.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Extract { key, .. } | Self::Convert { key, .. } => key,
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extract { source, .. } if source.is_not_found() => ErrorKind::NotFound,
            Self::Extract { .. } => ErrorKind::Source,
            Self::Convert { .. } => ErrorKind::Conversion,
        }
    }

    /// Returns `true` for failures raised by the source.
    #[must_use]
    pub fn is_extract_error(&self) -> bool {
        matches!(self, Self::Extract { .. })
    }

    /// Returns `true` for failures raised by a converter.
    #[must_use]
    pub fn is_convert_error(&self) -> bool {
        matches!(self, Self::Convert { .. })
    }

    /// Returns `true` if the key was absent from the source.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// All failures recorded during an extraction session, in call order.
///
/// Never empty. Displays as one `key: cause` line per failure.
#[derive(Debug, Clone)]
pub struct ExtractionErrors {
    errors: Vec<ExtractionError>,
}

impl ExtractionErrors {
    /// Wraps recorded failures, returning `None` when there are none.
    #[must_use]
    pub fn from_vec(errors: Vec<ExtractionError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Returns the failures as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ExtractionError] {
        &self.errors
    }

    /// Returns an iterator over the failures.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtractionError> {
        self.errors.iter()
    }

    /// Returns the number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if there are no failures. A value built by
    /// [`from_vec`](Self::from_vec) holds at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the first failure recorded for `key`, if any.
    #[must_use]
    pub fn for_key(&self, key: &str) -> Option<&ExtractionError> {
        self.errors.iter().find(|e| e.key() == key)
    }

    /// Consumes the collection, returning the failures.
    #[must_use]
    pub fn into_vec(self) -> Vec<ExtractionError> {
        self.errors
    }
}

impl fmt::Display for ExtractionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl StdError for ExtractionErrors {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.errors.first().map(|e| e as &(dyn StdError + 'static))
    }
}

impl IntoIterator for ExtractionErrors {
    type Item = ExtractionError;
    type IntoIter = std::vec::IntoIter<ExtractionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtractionErrors {
    type Item = &'a ExtractionError;
    type IntoIter = std::slice::Iter<'a, ExtractionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
