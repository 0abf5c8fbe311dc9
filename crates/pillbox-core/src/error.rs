//! Unified error types for the pillbox core library.
//!
//! [`PillboxError`] covers every failure mode across the crate. Modules keep
//! their own specific error types ([`ConfigError`], [`ScheduleError`]) and
//! convert into this one at API boundaries.
//!
//! The expiry and normalization rules themselves are total and never fail;
//! errors come from configuration and from slot access.
//!
//! # Example
//!
//! ```rust
//! use pillbox_core::error::{PillboxError, Result};
//! use std::path::PathBuf;
//!
//! fn require_config(path: &PathBuf) -> Result<()> {
//!     if !path.exists() {
//!         return Err(PillboxError::ConfigNotFound(path.clone()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::schedule::ScheduleError;

/// The unified error type for all pillbox operations.
#[derive(Debug, Error)]
pub enum PillboxError {
    // =========================================================================
    // SCHEDULE ERRORS
    // =========================================================================
    /// A slot index outside the normalized schedule was addressed.
    #[error("Slot {index} does not exist; the schedule has {len} slots")]
    SlotOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of slots.
        len: usize,
    },

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration file was not found at the expected path.
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    /// The configured timezone is not a known IANA zone.
    #[error("Invalid timezone: '{0}'. Expected an IANA name such as 'America/New_York'.")]
    InvalidTimezone(String),

    // =========================================================================
    // PERSISTENCE ERRORS
    // =========================================================================
    /// Writing configuration to disk failed.
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

/// A specialized [`Result`] type for pillbox operations.
pub type Result<T> = std::result::Result<T, PillboxError>;

impl PillboxError {
    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_)
                | Self::ConfigParseError(_)
                | Self::ConfigValidationError(_)
                | Self::InvalidTimezone(_)
        )
    }

    /// Returns `true` if this error is related to slot access.
    #[inline]
    #[must_use]
    pub const fn is_schedule_error(&self) -> bool {
        matches!(self, Self::SlotOutOfRange { .. })
    }

    /// Returns `true` if this error is related to persistence.
    #[inline]
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::PersistenceError(_))
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::SlotOutOfRange { .. } | Self::InvalidTimezone(_) => 400,

            // 404 Not Found
            Self::ConfigNotFound(_) => 404,

            // 422 Unprocessable Entity - semantic errors
            Self::ConfigParseError(_) | Self::ConfigValidationError(_) => 422,

            // 500 Internal Server Error - server-side issues
            Self::PersistenceError(_) => 500,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "SLOT_OUT_OF_RANGE",
            Self::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError(_) => "CONFIG_VALIDATION_ERROR",
            Self::InvalidTimezone(_) => "INVALID_TIMEZONE",
            Self::PersistenceError(_) => "PERSISTENCE_ERROR",
        }
    }
}

// =============================================================================
// CONVERSIONS FROM MODULE-SPECIFIC ERRORS
// =============================================================================

impl From<ConfigError> for PillboxError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound(path) => Self::ConfigNotFound(path.into()),
            ConfigError::WriteError { path, source } => {
                Self::PersistenceError(format!("Failed to write {path}: {source}"))
            }
            ConfigError::ParseError(e) => Self::ConfigParseError(e.to_string()),
            ConfigError::SerializeError(e) => Self::ConfigParseError(e.to_string()),
            ConfigError::ValidationError { field, message } => {
                if field == "system.timezone" {
                    Self::InvalidTimezone(message)
                } else {
                    Self::ConfigValidationError(format!("{field}: {message}"))
                }
            }
            ConfigError::MultipleValidationErrors(errors) => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
                Self::ConfigValidationError(messages.join("; "))
            }
        }
    }
}

impl From<ScheduleError> for PillboxError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::SlotOutOfRange { index, len } => Self::SlotOutOfRange { index, len },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoErr, ErrorKind};

    #[test]
    fn test_config_error_classification() {
        assert!(PillboxError::ConfigNotFound(PathBuf::from("/test")).is_config_error());
        assert!(PillboxError::ConfigParseError("syntax error".into()).is_config_error());
        assert!(PillboxError::ConfigValidationError("bad hour".into()).is_config_error());
        assert!(PillboxError::InvalidTimezone("Mars/Olympus".into()).is_config_error());

        assert!(!PillboxError::SlotOutOfRange { index: 4, len: 2 }.is_config_error());
    }

    #[test]
    fn test_schedule_error_classification() {
        assert!(PillboxError::SlotOutOfRange { index: 4, len: 2 }.is_schedule_error());
        assert!(!PillboxError::PersistenceError("disk full".into()).is_schedule_error());
    }

    #[test]
    fn test_io_error_classification() {
        assert!(PillboxError::PersistenceError("disk full".into()).is_io_error());

        assert!(!PillboxError::InvalidTimezone("x".into()).is_io_error());
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            PillboxError::SlotOutOfRange { index: 1, len: 0 }.http_status_code(),
            400
        );
        assert_eq!(
            PillboxError::ConfigNotFound(PathBuf::new()).http_status_code(),
            404
        );
        assert_eq!(
            PillboxError::ConfigValidationError("error".into()).http_status_code(),
            422
        );
        assert_eq!(
            PillboxError::PersistenceError("error".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PillboxError::SlotOutOfRange { index: 1, len: 0 }.error_code(),
            "SLOT_OUT_OF_RANGE"
        );
        assert_eq!(
            PillboxError::ConfigNotFound(PathBuf::new()).error_code(),
            "CONFIG_NOT_FOUND"
        );
    }

    #[test]
    fn test_from_schedule_error() {
        let err: PillboxError = ScheduleError::SlotOutOfRange { index: 3, len: 2 }.into();
        assert!(matches!(err, PillboxError::SlotOutOfRange { index: 3, len: 2 }));
        assert!(err.to_string().contains("has 2 slots"));
    }

    #[test]
    fn test_from_config_timezone_error() {
        let err: PillboxError = ConfigError::ValidationError {
            field: "system.timezone".into(),
            message: "unknown timezone 'Nowhere'".into(),
        }
        .into();
        assert!(matches!(err, PillboxError::InvalidTimezone(_)));
    }

    #[test]
    fn test_from_config_multiple_errors() {
        let err: PillboxError = ConfigError::MultipleValidationErrors(vec![
            ConfigError::ValidationError {
                field: "schedule.default_hours[0]".into(),
                message: "hour must be between 0 and 23, got 30".into(),
            },
            ConfigError::ValidationError {
                field: "schedule.slot_labels[1]".into(),
                message: "label cannot be empty".into(),
            },
        ])
        .into();

        let message = err.to_string();
        assert!(message.contains("default_hours[0]"));
        assert!(message.contains("slot_labels[1]"));
    }

    #[test]
    fn test_from_config_write_error() {
        let err: PillboxError = ConfigError::WriteError {
            path: "/etc/pillbox/config.toml".into(),
            source: IoErr::new(ErrorKind::PermissionDenied, "read-only"),
        }
        .into();
        assert!(matches!(err, PillboxError::PersistenceError(_)));
        assert!(err.is_io_error());
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<PillboxError>();
        assert_sync::<PillboxError>();
    }
}
