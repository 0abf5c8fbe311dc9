//! # pillbox-core
//!
//! Core domain logic for the pillbox medication reminder.
//!
//! This crate provides:
//! - Expiry classification (expired / expiring soon / valid)
//! - Dose time slot normalization against a daily dose count
//! - The medicine entity those rules read from
//! - Configuration management (alert interval, slot defaults, timezone)
//!
//! ## Architecture
//!
//! - [`expiry`] - Expiry status derivation from an explicit reference instant
//! - [`schedule`] - Padding and truncating dose time slots, slot labels
//! - [`medicine`] - The medicine entity
//! - [`config`] - Configuration loading, saving, and validation
//! - [`error`] - Unified error types for the crate
//!
//! Both rules are pure functions. Callers pass "now" and "today" in
//! explicitly; nothing here reads the clock.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod expiry;
pub mod medicine;
pub mod schedule;

// Re-export primary types for convenience
pub use config::{
    default_config_path, AlertsConfig, Config, ConfigError, ConfigResult, ScheduleConfig,
    SystemConfig,
};
pub use error::{PillboxError, Result};
pub use expiry::{classify, days_remaining, ExpiryStatus, ExpirySummary};
pub use medicine::{Medicine, DEFAULT_ALERT_DAYS};
pub use schedule::{
    default_slot_time, normalize, slot_label, ScheduleError, TimeSlots, DEFAULT_SLOT_HOURS,
    DEFAULT_SLOT_LABELS, FALLBACK_HOUR,
};
