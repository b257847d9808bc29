//! Error types for request-backed sources and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding a query string or a form body.
///
/// Form body failures reach an [`Extractor`](valextract::Extractor) wrapped
/// in [`SourceError::FormParse`](valextract::SourceError::FormParse).
#[derive(Error, Debug)]
pub enum HttpSourceError {
    /// The query string could not be decoded.
    #[error("invalid query string: {0}")]
    InvalidQuery(#[from] serde_urlencoded::de::Error),

    /// The url-encoded body could not be decoded.
    #[error("invalid url-encoded body: {0}")]
    InvalidFormBody(#[source] serde_urlencoded::de::Error),

    /// The multipart body could not be parsed.
    #[error("multipart parse error: {0}")]
    Multipart(#[from] multer::Error),

    /// The Content-Type header could not be parsed as a media type.
    #[error("invalid Content-Type: {0}")]
    InvalidContentType(String),

    /// The multipart Content-Type is missing a usable boundary.
    #[error("missing or invalid boundary in multipart Content-Type")]
    InvalidBoundary,

    /// The body exceeds the configured limit.
    #[error("payload too large: max {max} bytes, got {actual} bytes")]
    PayloadTooLarge {
        /// Configured limit.
        max: usize,
        /// Actual body size.
        actual: usize,
    },

    /// A single field exceeds the configured limit.
    #[error("field '{field}' too large: max {max} bytes")]
    FieldTooLarge {
        /// Field name.
        field: String,
        /// Configured limit.
        max: usize,
    },

    /// The body holds more fields than allowed.
    #[error("too many fields (max {max})")]
    TooManyFields {
        /// Configured limit.
        max: usize,
    },
}

impl HttpSourceError {
    /// Creates a payload-too-large error.
    #[must_use]
    pub fn payload_too_large(max: usize, actual: usize) -> Self {
        Self::PayloadTooLarge { max, actual }
    }

    /// Creates a field-too-large error.
    #[must_use]
    pub fn field_too_large(field: impl Into<String>, max: usize) -> Self {
        Self::FieldTooLarge {
            field: field.into(),
            max,
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Environment variable parsing error.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// Unsupported format or other validation failure.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
