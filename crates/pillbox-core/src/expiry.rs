//! Medicine expiry classification.
//!
//! A medicine is in one of three states relative to a reference instant:
//!
//! - [`ExpiryStatus::Expired`] once its expiration timestamp has passed
//! - [`ExpiryStatus::ExpiringSoon`] while the time remaining is at most the
//!   alert interval (inclusive)
//! - [`ExpiryStatus::Valid`] otherwise
//!
//! The reference instant is always passed in by the caller. Nothing in this
//! module reads the system clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Expiry state of a medicine at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// The expiration timestamp lies before the reference instant.
    Expired,
    /// Within the alert interval of the expiration timestamp.
    ExpiringSoon,
    /// More than the alert interval remains.
    Valid,
}

impl ExpiryStatus {
    /// Human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Valid => "Valid",
        }
    }

    /// Machine-readable code, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring_soon",
            Self::Valid => "valid",
        }
    }

    /// Returns `true` if the medicine needs the user's attention.
    #[inline]
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Expired | Self::ExpiringSoon)
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a medicine's expiry state.
///
/// `alert_days` is the alert interval: a medicine with at most that many
/// days left is [`ExpiryStatus::ExpiringSoon`]. The comparison uses exact
/// elapsed time, so 2 days and 23 hours remaining with a 3 day interval is
/// still expiring soon, and exactly 3 days remaining is too.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use pillbox_core::expiry::{classify, ExpiryStatus};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let expires_at = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
/// assert_eq!(classify(now, expires_at, 3), ExpiryStatus::ExpiringSoon);
/// ```
#[must_use]
pub fn classify(now: DateTime<Utc>, expires_at: DateTime<Utc>, alert_days: u32) -> ExpiryStatus {
    if expires_at < now {
        return ExpiryStatus::Expired;
    }

    if expires_at - now <= Duration::days(i64::from(alert_days)) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Valid
    }
}

/// Days remaining until `expires_at`, from exact elapsed seconds.
///
/// Negative once the medicine has expired.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn days_remaining(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> f64 {
    let elapsed = expires_at - now;
    let millis = elapsed.num_milliseconds() as f64;
    millis / (SECONDS_PER_DAY as f64 * 1000.0)
}

/// Per-status counts over a batch of medicines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExpirySummary {
    /// Medicines past their expiration.
    #[schema(example = 1)]
    pub expired: usize,

    /// Medicines inside their alert interval.
    #[schema(example = 2)]
    pub expiring_soon: usize,

    /// Medicines with more than the alert interval remaining.
    #[schema(example = 5)]
    pub valid: usize,
}

impl ExpirySummary {
    /// Count statuses.
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ExpiryStatus>,
    {
        statuses.into_iter().fold(Self::default(), |mut acc, status| {
            acc.record(status);
            acc
        })
    }

    /// Record a single status.
    pub fn record(&mut self, status: ExpiryStatus) {
        match status {
            ExpiryStatus::Expired => self.expired += 1,
            ExpiryStatus::ExpiringSoon => self.expiring_soon += 1,
            ExpiryStatus::Valid => self.valid += 1,
        }
    }

    /// Total number of medicines counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.expired + self.expiring_soon + self.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_expired_before_now() {
        let now = at(2024, 1, 10, 0, 0);
        let expires_at = at(2024, 1, 9, 0, 0);
        assert_eq!(classify(now, expires_at, 5), ExpiryStatus::Expired);
    }

    #[test]
    fn test_expired_regardless_of_alert_interval() {
        let now = at(2024, 6, 1, 12, 0);
        let expires_at = at(2024, 6, 1, 11, 59);
        for alert_days in [0, 1, 30, 365, u32::MAX] {
            assert_eq!(classify(now, expires_at, alert_days), ExpiryStatus::Expired);
        }
    }

    #[test]
    fn test_exact_boundary_is_expiring_soon() {
        let now = at(2024, 1, 1, 0, 0);
        let expires_at = at(2024, 1, 4, 0, 0);
        assert_eq!(classify(now, expires_at, 3), ExpiryStatus::ExpiringSoon);
    }

    #[test]
    fn test_one_second_past_boundary_is_valid() {
        let now = at(2024, 1, 1, 0, 0);
        let expires_at = at(2024, 1, 4, 0, 0) + Duration::seconds(1);
        assert_eq!(classify(now, expires_at, 3), ExpiryStatus::Valid);
    }

    #[test]
    fn test_partial_days_are_not_truncated() {
        // 3 days 12 hours remaining must not be rounded down to 3 days.
        let now = at(2024, 1, 1, 0, 0);
        let expires_at = at(2024, 1, 4, 12, 0);
        assert_eq!(classify(now, expires_at, 3), ExpiryStatus::Valid);
        assert_eq!(classify(now, expires_at, 4), ExpiryStatus::ExpiringSoon);
    }

    #[test]
    fn test_expires_now_is_expiring_soon() {
        let now = at(2024, 3, 15, 8, 30);
        assert_eq!(classify(now, now, 0), ExpiryStatus::ExpiringSoon);
        assert_eq!(classify(now, now, 7), ExpiryStatus::ExpiringSoon);
    }

    #[test]
    fn test_far_future_is_valid() {
        let now = at(2024, 1, 1, 0, 0);
        let expires_at = at(2027, 1, 1, 0, 0);
        assert_eq!(classify(now, expires_at, 30), ExpiryStatus::Valid);
    }

    #[test]
    fn test_days_remaining_is_exact() {
        let now = at(2024, 1, 1, 0, 0);
        assert!((days_remaining(now, at(2024, 1, 4, 0, 0)) - 3.0).abs() < f64::EPSILON);
        assert!((days_remaining(now, at(2024, 1, 1, 12, 0)) - 0.5).abs() < f64::EPSILON);
        assert!(days_remaining(now, at(2023, 12, 31, 0, 0)) < 0.0);
    }

    #[test]
    fn test_status_labels_and_codes() {
        assert_eq!(ExpiryStatus::Expired.label(), "Expired");
        assert_eq!(ExpiryStatus::ExpiringSoon.label(), "Expiring Soon");
        assert_eq!(ExpiryStatus::Valid.to_string(), "Valid");
        assert_eq!(ExpiryStatus::ExpiringSoon.as_str(), "expiring_soon");
        assert!(ExpiryStatus::Expired.needs_attention());
        assert!(!ExpiryStatus::Valid.needs_attention());
    }

    #[test]
    fn test_status_serialization_matches_code() {
        for status in [
            ExpiryStatus::Expired,
            ExpiryStatus::ExpiringSoon,
            ExpiryStatus::Valid,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_summary_tally() {
        let summary = ExpirySummary::tally([
            ExpiryStatus::Valid,
            ExpiryStatus::Expired,
            ExpiryStatus::Valid,
            ExpiryStatus::ExpiringSoon,
        ]);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.expiring_soon, 1);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.total(), 4);
    }
}
