//! Limits for request-backed sources.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default maximum body size for form parsing (10 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum size per form field (1 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 1024 * 1024;

/// Default maximum number of form fields.
pub const DEFAULT_MAX_FIELDS: usize = 1000;

/// Top-level configuration for request-backed sources.
///
/// ```toml
/// [form]
/// max_body_size = 1048576
/// max_field_size = 65536
/// max_fields = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Form body limits.
    pub form: FormConfig,
}

impl SourceConfig {
    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.form.validate()
    }
}

/// Limits applied when a [`FormSource`](crate::FormSource) parses a body.
///
/// Bodies are held in memory; nothing spills to disk. Exceeding any limit
/// fails the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Maximum total body size in bytes.
    pub max_body_size: usize,
    /// Maximum size per field value in bytes.
    pub max_field_size: usize,
    /// Maximum number of fields.
    pub max_fields: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl FormConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }

    /// Checks that every limit is non-zero and the field limit fits the body.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "form.max_body_size",
                "must be greater than zero",
            ));
        }
        if self.max_field_size == 0 {
            return Err(ConfigError::invalid_value(
                "form.max_field_size",
                "must be greater than zero",
            ));
        }
        if self.max_fields == 0 {
            return Err(ConfigError::invalid_value(
                "form.max_fields",
                "must be greater than zero",
            ));
        }
        if self.max_field_size > self.max_body_size {
            return Err(ConfigError::invalid_value(
                "form.max_field_size",
                "must not exceed form.max_body_size",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_config_default() {
        let config = FormConfig::default();
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.max_field_size, DEFAULT_MAX_FIELD_SIZE);
        assert_eq!(config.max_fields, DEFAULT_MAX_FIELDS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_form_config_builder() {
        let config = FormConfig::new()
            .max_body_size(100)
            .max_field_size(50)
            .max_fields(10);

        assert_eq!(config.max_body_size, 100);
        assert_eq!(config.max_field_size, 50);
        assert_eq!(config.max_fields, 10);
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(FormConfig::new().max_fields(0).validate().is_err());
        assert!(FormConfig::new().max_body_size(0).validate().is_err());
        assert!(FormConfig::new().max_field_size(0).validate().is_err());
    }

    #[test]
    fn test_validate_field_larger_than_body() {
        let err = FormConfig::new()
            .max_body_size(10)
            .max_field_size(20)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("form.max_field_size"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SourceConfig = toml::from_str("[form]\nmax_fields = 5\n").unwrap();
        assert_eq!(config.form.max_fields, 5);
        assert_eq!(config.form.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SourceConfig, _> = toml::from_str("[form]\nmax_files = 5\n");
        assert!(result.is_err());
    }
}
