//! Application configuration management.
//!
//! Handles loading, saving, and validating pillbox configuration:
//! - Default alert interval for expiry classification
//! - Default slot hours and labels for dose scheduling
//! - Timezone used to determine "today"
//! - Server bind address
//!
//! Values come from a TOML file layered under `PILLBOX_*` environment
//! variables, with `__` separating nested keys
//! (`PILLBOX_ALERTS__DEFAULT_ALERT_DAYS=14`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::medicine::DEFAULT_ALERT_DAYS;
use crate::schedule::{DEFAULT_SLOT_HOURS, DEFAULT_SLOT_LABELS};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PILLBOX";

/// Errors from loading, saving, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Writing the configuration file failed.
    #[error("Failed to write {path}: {source}")]
    WriteError {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The layered sources could not be parsed into a [`Config`].
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] ::config::ConfigError),

    /// The configuration could not be serialized to TOML.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A single field failed validation.
    #[error("{field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Several fields failed validation.
    #[error("{} validation errors", .0.len())]
    MultipleValidationErrors(Vec<ConfigError>),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expiry alert settings.
    pub alerts: AlertsConfig,

    /// Dose schedule settings.
    pub schedule: ScheduleConfig,

    /// System settings.
    pub system: SystemConfig,
}

/// Expiry alert settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Alert interval applied when a medicine does not carry its own.
    pub default_alert_days: u32,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            default_alert_days: DEFAULT_ALERT_DAYS,
        }
    }
}

/// Dose schedule settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Hour of day for each padded slot, by index.
    pub default_hours: Vec<u32>,

    /// Display label for each slot, by index.
    pub slot_labels: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_hours: DEFAULT_SLOT_HOURS.to_vec(),
            slot_labels: DEFAULT_SLOT_LABELS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// System settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// IANA timezone name used to resolve "today".
    pub timezone: String,

    /// Address the HTTP server binds to.
    pub bind_address: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file is missing, or a parse
    /// or validation error.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let config = Self::layered(Some(path), ENV_PREFIX)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults (plus
    /// environment overrides) when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Self::layered(None, ENV_PREFIX)
        }
    }

    fn layered(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("schedule.default_hours")
                .with_list_parse_key("schedule.slot_labels"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path` as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::WriteError {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the single failure, or [`ConfigError::MultipleValidationErrors`].
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        for (i, &hour) in self.schedule.default_hours.iter().enumerate() {
            if hour > 23 {
                errors.push(ConfigError::ValidationError {
                    field: format!("schedule.default_hours[{i}]"),
                    message: format!("hour must be between 0 and 23, got {hour}"),
                });
            }
        }

        for (i, label) in self.schedule.slot_labels.iter().enumerate() {
            if label.trim().is_empty() {
                errors.push(ConfigError::ValidationError {
                    field: format!("schedule.slot_labels[{i}]"),
                    message: "label cannot be empty".to_string(),
                });
            }
        }

        if let Err(e) = self.timezone() {
            errors.push(e);
        }
        if let Err(e) = self.bind_address() {
            errors.push(e);
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }

    /// Parsed timezone.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is not a known IANA zone.
    pub fn timezone(&self) -> ConfigResult<Tz> {
        self.system
            .timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::ValidationError {
                field: "system.timezone".to_string(),
                message: format!("unknown timezone '{}'", self.system.timezone),
            })
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the address does not parse.
    pub fn bind_address(&self) -> ConfigResult<SocketAddr> {
        self.system
            .bind_address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ValidationError {
                field: "system.bind_address".to_string(),
                message: e.to_string(),
            })
    }
}

/// Default configuration file path.
///
/// `/etc/pillbox/config.toml` on Linux, the platform config directory
/// elsewhere.
#[must_use]
pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/etc/pillbox/config.toml")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "pillbox").map_or_else(
            || PathBuf::from("config.toml"),
            |dirs| dirs.config_dir().join("config.toml"),
        )
    }
}
