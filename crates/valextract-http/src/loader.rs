//! Layered configuration loading.
//!
//! Defaults are overridden by a TOML or JSON document, which is in turn
//! overridden by environment variables of the form `PREFIX__FORM__KEY`.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, SourceConfig};

/// Configuration loader with layered approach.
///
/// # Example
///
/// ```
/// use valextract_http::ConfigLoader;
///
/// let toml = r#"
///     [form]
///     max_fields = 50
/// "#;
///
/// let config = ConfigLoader::new()
///     .with_string(toml, "toml")
///     .unwrap()
///     .load()
///     .unwrap();
///
/// assert_eq!(config.form.max_fields, 50);
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: SourceConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new loader seeded with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension (`.toml` or `.json`).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        self.config = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration file format: {}",
                    path.display()
                )))
            }
        };
        tracing::debug!(path = %path.display(), "loaded source configuration");

        Ok(self)
    }

    /// Load configuration from an optional file, skipping it if absent.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `"toml"` or `"json"` format.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// With prefix `VALEXTRACT`, `VALEXTRACT__FORM__MAX_FIELDS=10` overrides
    /// `form.max_fields`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides, validates, and returns the configuration.
    pub fn load(mut self) -> Result<SourceConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let form = &mut self.config.form;

        match parts.as_slice() {
            ["FORM", "MAX_BODY_SIZE"] => form.max_body_size = parse_usize(key, value)?,
            ["FORM", "MAX_FIELD_SIZE"] => form.max_field_size = parse_usize(key, value)?,
            ["FORM", "MAX_FIELDS"] => form.max_fields = parse_usize(key, value)?,
            _ => {
                tracing::warn!(var = key, "ignoring unknown configuration variable");
            }
        }

        Ok(())
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}
