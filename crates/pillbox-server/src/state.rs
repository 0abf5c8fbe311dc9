//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use pillbox_core::Config;
use tokio::sync::RwLock;

/// State handle passed to every handler.
pub type SharedState = Arc<RwLock<AppState>>;

/// Application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Effective configuration.
    pub config: Config,

    /// Timezone parsed from `config.system.timezone`.
    pub timezone: Tz,
}

impl AppState {
    /// Build state from an already loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timezone is invalid.
    pub fn new(config: Config) -> pillbox_core::Result<Self> {
        let timezone = config.timezone()?;
        Ok(Self { config, timezone })
    }

    /// Load configuration from `path` (defaults if missing) and build state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed or is invalid.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = Config::load_or_default(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?;
        Ok(Self::new(config)?)
    }

    /// Wrap into a [`SharedState`].
    #[must_use]
    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// The calendar date at `now` in the configured timezone.
    #[must_use]
    pub fn today_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    /// Today's date in the configured timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today_at(Utc::now())
    }
}
