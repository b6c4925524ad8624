//! # Configuration
//!
//! TOML configuration for the plugin core: rule parameters plus logging
//! settings, with serde defaults so an empty file is a valid configuration.
//!
//! ```toml
//! [rules]
//! max-homes = 5
//! cooldown-ticks = 200
//! locale = "en"
//!
//! [logging]
//! level = "info"
//! json-format = false
//! ```

use homestead_rules::RuleSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingSettings {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit structured JSON instead of human-readable lines.
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

/// Top-level plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginConfig {
    /// Rule-engine parameters.
    #[serde(default)]
    pub rules: RuleSettings,
    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl PluginConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges. -1 means "unlimited"/"disabled" for the two
    /// numeric rule settings; anything below that is a mistake.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.max_homes < -1 {
            return Err(ConfigError::Invalid(format!(
                "max-homes must be -1 (unlimited) or >= 0, got {}",
                self.rules.max_homes
            )));
        }
        if self.rules.cooldown_ticks < -1 {
            return Err(ConfigError::Invalid(format!(
                "cooldown-ticks must be -1 (disabled) or >= 0, got {}",
                self.rules.cooldown_ticks
            )));
        }
        if self.rules.locale.is_empty() {
            return Err(ConfigError::Invalid("locale must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config: PluginConfig = toml::from_str("").expect("parse");
        assert_eq!(config.rules.max_homes, -1);
        assert_eq!(config.rules.cooldown_ticks, -1);
        assert_eq!(config.rules.locale, "en");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
    }

    #[test]
    fn load_reads_and_validates_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[rules]\nmax-homes = 3\ncooldown-ticks = 200\n\n[logging]\nlevel = \"debug\""
        )
        .expect("write");

        let config = PluginConfig::load(file.path()).expect("load");
        assert_eq!(config.rules.max_homes, 3);
        assert_eq!(config.rules.cooldown_ticks, 200);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config: PluginConfig =
            toml::from_str("[rules]\nmax-homes = -2").expect("parse");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = PluginConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
