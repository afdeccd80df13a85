//! Configuration loading for the event feed.
//!
//! Feed settings can be loaded from a TOML file. Every field has a default,
//! so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default capacity of a feed.
pub const DEFAULT_MAX_SIZE: usize = 24;

/// Default number of weeks an option-less event stays visible.
pub const DEFAULT_MAX_AGE: i64 = 2;

/// Complete feed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedFile {
    /// Feed settings
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of records kept before the oldest is evicted
    pub max_size: usize,
    /// Age limit used when a visibility query doesn't pass one
    pub default_max_age: i64,
    /// Notify the listener when an add merges into an existing record
    pub notify_on_merge: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            default_max_age: DEFAULT_MAX_AGE,
            notify_on_merge: false,
        }
    }
}

impl FeedConfig {
    /// Creates a default configuration with the given capacity.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let file: FeedFile = toml::from_str(content)?;
        file.feed.validate()?;
        Ok(file.feed)
    }

    /// Serializes this configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        let file = FeedFile { feed: self.clone() };
        toml::to_string_pretty(&file).map_err(TomlSerializeError)
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::Invalid(
                "max_size must be at least 1".to_string(),
            ));
        }
        if self.default_max_age < 0 {
            return Err(ConfigError::Invalid(format!(
                "default_max_age must not be negative (got {})",
                self.default_max_age
            )));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Parsed values are out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[source] pub toml::ser::Error);

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> &'static str {
    r#"# Event feed configuration

[feed]
# Records kept before the oldest is evicted
max_size = 24
# Weeks an option-less event stays visible
default_max_age = 2
# Notify the listener when an add updates an existing record
notify_on_merge = false
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.max_size, 24);
        assert_eq!(config.default_max_age, 2);
        assert!(!config.notify_on_merge);
    }

    #[test]
    fn test_default_toml_matches_default() {
        let config = FeedConfig::from_str(default_config_toml()).unwrap();
        assert_eq!(config, FeedConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(FeedConfig::from_str("").unwrap(), FeedConfig::default());
        assert_eq!(FeedConfig::from_str("[feed]\n").unwrap(), FeedConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = FeedConfig::from_str(
            r#"
            [feed]
            max_size = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.max_size, 10);
        assert_eq!(config.default_max_age, 2);
    }

    #[test]
    fn test_zero_max_size_rejected() {
        let err = FeedConfig::from_str("[feed]\nmax_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_negative_max_age_rejected() {
        let err = FeedConfig::from_str("[feed]\ndefault_max_age = -1\n").unwrap_err();
        assert!(err.to_string().contains("default_max_age"));
    }

    #[test]
    fn test_bad_toml() {
        let err = FeedConfig::from_str("[feed\nmax_size = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FeedConfig {
            max_size: 6,
            default_max_age: 4,
            notify_on_merge: true,
        };
        let toml = config.to_toml().unwrap();
        assert_eq!(FeedConfig::from_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\nmax_size = 3\nnotify_on_merge = true").unwrap();

        let config = FeedConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_size, 3);
        assert!(config.notify_on_merge);
    }

    #[test]
    fn test_missing_file() {
        let err = FeedConfig::from_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
