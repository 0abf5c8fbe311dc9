//! The medicine entity.
//!
//! Only the fields the expiry and scheduling rules read are modelled here.
//! Storage and adherence tracking live with the caller.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::expiry::{self, ExpiryStatus};
use crate::schedule::TimeSlots;

/// Alert interval used when none is given.
pub const DEFAULT_ALERT_DAYS: u32 = 30;

/// A medicine in the user's cabinet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Medicine {
    /// Unique identifier.
    pub id: Uuid,

    /// Display name.
    #[schema(example = "Ibuprofen 200mg")]
    pub name: String,

    /// When the medicine expires (UTC).
    #[schema(example = "2025-06-30T00:00:00Z")]
    pub expires_at: DateTime<Utc>,

    /// Days before expiry at which the medicine counts as expiring soon.
    #[schema(example = 30)]
    pub alert_days: u32,

    /// Number of doses per day, and therefore the number of time slots.
    #[schema(example = 2)]
    pub doses_per_day: usize,
}

impl Medicine {
    /// Create a medicine with a fresh id, the default alert interval and a
    /// single daily dose.
    pub fn new(name: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            expires_at,
            alert_days: DEFAULT_ALERT_DAYS,
            doses_per_day: 1,
        }
    }

    /// Set the alert interval.
    #[must_use]
    pub fn with_alert_days(mut self, alert_days: u32) -> Self {
        self.alert_days = alert_days;
        self
    }

    /// Set the number of daily doses.
    #[must_use]
    pub fn with_doses_per_day(mut self, doses_per_day: usize) -> Self {
        self.doses_per_day = doses_per_day;
        self
    }

    /// Expiry state at `now`.
    #[must_use]
    pub fn expiry_status(&self, now: DateTime<Utc>) -> ExpiryStatus {
        expiry::classify(now, self.expires_at, self.alert_days)
    }

    /// Days until expiry at `now`; negative once expired.
    #[must_use]
    pub fn days_remaining(&self, now: DateTime<Utc>) -> f64 {
        expiry::days_remaining(now, self.expires_at)
    }

    /// Dose times normalized to this medicine's daily dose count.
    #[must_use]
    pub fn dose_slots(
        &self,
        times: &[NaiveDateTime],
        default_hours: &[u32],
        today: NaiveDate,
    ) -> TimeSlots {
        TimeSlots::normalized(times, self.doses_per_day, default_hours, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DEFAULT_SLOT_HOURS;
    use chrono::TimeZone;

    fn expiring(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_uses_defaults() {
        let med = Medicine::new("Amoxicillin", expiring(2025, 1, 1));
        assert_eq!(med.name, "Amoxicillin");
        assert_eq!(med.alert_days, DEFAULT_ALERT_DAYS);
        assert_eq!(med.doses_per_day, 1);
        assert_ne!(med.id, Medicine::new("Amoxicillin", expiring(2025, 1, 1)).id);
    }

    #[test]
    fn test_expiry_status_uses_alert_days() {
        let now = expiring(2024, 1, 1);
        let med = Medicine::new("Cetirizine", expiring(2024, 1, 11));

        assert_eq!(med.expiry_status(now), ExpiryStatus::ExpiringSoon);
        assert_eq!(
            med.clone().with_alert_days(5).expiry_status(now),
            ExpiryStatus::Valid
        );
        assert_eq!(
            med.expiry_status(expiring(2024, 2, 1)),
            ExpiryStatus::Expired
        );
    }

    #[test]
    fn test_days_remaining() {
        let med = Medicine::new("Loratadine", expiring(2024, 1, 11));
        assert!((med.days_remaining(expiring(2024, 1, 1)) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dose_slots_follow_doses_per_day() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let med = Medicine::new("Metformin", expiring(2026, 1, 1)).with_doses_per_day(3);

        let slots = med.dose_slots(&[], &DEFAULT_SLOT_HOURS, today);
        assert_eq!(slots.len(), 3);
        assert_eq!(
            slots.get(2),
            Some(today.and_hms_opt(18, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_medicine_serialization() {
        let med = Medicine::new("Aspirin", expiring(2025, 6, 30)).with_alert_days(14);
        let json = serde_json::to_string(&med).unwrap();
        assert!(json.contains("\"alert_days\":14"));

        let back: Medicine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, med);
    }
}
