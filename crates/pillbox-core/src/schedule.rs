//! Daily dose time slots.
//!
//! A medicine taken `n` times a day has exactly `n` slots. The list a user
//! edits can drift from that count when the dose count changes, so every
//! read and write goes through [`normalize`], which pads missing slots with
//! default times on the given day or drops the surplus from the end.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{debug, warn};

/// Default hour for each slot index.
pub const DEFAULT_SLOT_HOURS: [u32; 4] = [9, 13, 18, 21];

/// Hour used for slots beyond the default hour list.
pub const FALLBACK_HOUR: u32 = 9;

/// Default display label for each slot index.
pub const DEFAULT_SLOT_LABELS: [&str; 4] = ["Morning", "Afternoon", "Evening", "Bedtime"];

/// Errors from slot access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Slot index outside the normalized list.
    #[error("Slot index {index} is out of range for a schedule of {len} slots")]
    SlotOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of slots.
        len: usize,
    },
}

/// Result type for schedule operations.
pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;

/// Padding time for slot `index` on `today`.
///
/// Uses `default_hours[index]` when present and a valid hour of day,
/// otherwise [`FALLBACK_HOUR`]. Minutes and seconds are zero.
#[must_use]
pub fn default_slot_time(today: NaiveDate, index: usize, default_hours: &[u32]) -> NaiveDateTime {
    let hour = match default_hours.get(index) {
        Some(&hour) if hour < 24 => hour,
        Some(&hour) => {
            warn!(index, hour, "Default slot hour out of range, using fallback");
            FALLBACK_HOUR
        }
        None => FALLBACK_HOUR,
    };

    // Every hour reaching here is < 24, so the default is never used.
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
    today.and_time(time)
}

/// Reconcile `times` with `target_count` slots.
///
/// - Shorter lists are padded in order, slot `i` getting
///   [`default_slot_time`] for index `i`.
/// - Longer lists keep their first `target_count` entries.
/// - Lists of the right length are returned as they are.
///
/// The result always has exactly `target_count` entries and normalizing it
/// again with the same arguments returns it unchanged.
#[must_use]
pub fn normalize(
    times: &[NaiveDateTime],
    target_count: usize,
    default_hours: &[u32],
    today: NaiveDate,
) -> Vec<NaiveDateTime> {
    let current = times.len();

    if current > target_count {
        debug!(current, target_count, "Truncating dose slots");
        return times[..target_count].to_vec();
    }

    let mut slots = Vec::with_capacity(target_count);
    slots.extend_from_slice(times);

    if current < target_count {
        debug!(current, target_count, "Padding dose slots with defaults");
        slots.extend((current..target_count).map(|i| default_slot_time(today, i, default_hours)));
    }

    slots
}

/// Display label for slot `index`.
///
/// Falls back to `"Time {n}"` with a 1-based `n` past the end of `labels`.
#[must_use]
pub fn slot_label<S: AsRef<str>>(labels: &[S], index: usize) -> Cow<'_, str> {
    labels.get(index).map_or_else(
        || Cow::Owned(format!("Time {}", index + 1)),
        |label| Cow::Borrowed(label.as_ref()),
    )
}

/// A normalized list of dose times.
///
/// The length is fixed at construction; [`TimeSlots::set`] replaces a slot
/// but never grows or shrinks the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlots {
    slots: Vec<NaiveDateTime>,
}

impl TimeSlots {
    /// Build a slot list of exactly `target_count` entries from `times`.
    #[must_use]
    pub fn normalized(
        times: &[NaiveDateTime],
        target_count: usize,
        default_hours: &[u32],
        today: NaiveDate,
    ) -> Self {
        Self {
            slots: normalize(times, target_count, default_hours, today),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` for a schedule with zero slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Time in slot `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NaiveDateTime> {
        self.slots.get(index).copied()
    }

    /// Replace the time in slot `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::SlotOutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, time: NaiveDateTime) -> ScheduleResult<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ScheduleError::SlotOutOfRange { index, len })?;
        *slot = time;
        Ok(())
    }

    /// Slots as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NaiveDateTime] {
        &self.slots
    }

    /// Slots paired with their display label.
    pub fn labeled<'a, S: AsRef<str>>(
        &'a self,
        labels: &'a [S],
    ) -> impl Iterator<Item = (Cow<'a, str>, NaiveDateTime)> + 'a {
        self.slots
            .iter()
            .enumerate()
            .map(move |(i, time)| (slot_label(labels, i), *time))
    }

    /// Consume into the underlying list.
    #[must_use]
    pub fn into_inner(self) -> Vec<NaiveDateTime> {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_pad_empty_with_default_hours() {
        let slots = normalize(&[], 4, &DEFAULT_SLOT_HOURS, today());
        assert_eq!(
            slots,
            vec![at(20, 9, 0), at(20, 13, 0), at(20, 18, 0), at(20, 21, 0)]
        );
    }

    #[test]
    fn test_truncate_keeps_first_entries() {
        let times = [
            at(1, 7, 15),
            at(1, 8, 0),
            at(1, 12, 30),
            at(1, 19, 45),
            at(1, 22, 0),
        ];
        let slots = normalize(&times, 3, &DEFAULT_SLOT_HOURS, today());
        assert_eq!(slots, times[..3].to_vec());
    }

    #[test]
    fn test_equal_length_unchanged() {
        let times = [at(3, 6, 10), at(3, 23, 59)];
        assert_eq!(normalize(&times, 2, &DEFAULT_SLOT_HOURS, today()), times.to_vec());
    }

    #[test]
    fn test_padding_starts_at_current_length() {
        let times = [at(2, 7, 30)];
        let slots = normalize(&times, 3, &DEFAULT_SLOT_HOURS, today());
        assert_eq!(slots, vec![at(2, 7, 30), at(20, 13, 0), at(20, 18, 0)]);
    }

    #[test]
    fn test_padding_beyond_default_hours_uses_fallback() {
        let slots = normalize(&[], 6, &DEFAULT_SLOT_HOURS, today());
        assert_eq!(slots[4], at(20, FALLBACK_HOUR, 0));
        assert_eq!(slots[5], at(20, FALLBACK_HOUR, 0));
    }

    #[test]
    fn test_invalid_default_hour_uses_fallback() {
        let slots = normalize(&[], 2, &[25, 14], today());
        assert_eq!(slots, vec![at(20, FALLBACK_HOUR, 0), at(20, 14, 0)]);
    }

    #[test]
    fn test_zero_target_yields_empty() {
        let times = [at(1, 8, 0), at(1, 20, 0)];
        assert!(normalize(&times, 0, &DEFAULT_SLOT_HOURS, today()).is_empty());
        assert!(normalize(&[], 0, &DEFAULT_SLOT_HOURS, today()).is_empty());
    }

    #[test]
    fn test_length_always_matches_target() {
        let times = [at(1, 8, 0), at(1, 12, 0), at(1, 20, 0)];
        for target in 0..10 {
            for take in 0..=times.len() {
                let slots = normalize(&times[..take], target, &DEFAULT_SLOT_HOURS, today());
                assert_eq!(slots.len(), target);
            }
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let times = [at(1, 8, 0), at(1, 12, 0), at(1, 20, 0)];
        for target in 0..8 {
            for take in 0..=times.len() {
                let once = normalize(&times[..take], target, &DEFAULT_SLOT_HOURS, today());
                let twice = normalize(&once, target, &DEFAULT_SLOT_HOURS, today());
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(&DEFAULT_SLOT_LABELS, 0), "Morning");
        assert_eq!(slot_label(&DEFAULT_SLOT_LABELS, 3), "Bedtime");
        assert_eq!(slot_label(&DEFAULT_SLOT_LABELS, 4), "Time 5");

        let custom = vec!["Breakfast".to_string()];
        assert_eq!(slot_label(custom.as_slice(), 0), "Breakfast");
        assert_eq!(slot_label(custom.as_slice(), 1), "Time 2");
    }

    #[test]
    fn test_time_slots_get_and_set() {
        let mut slots = TimeSlots::normalized(&[], 2, &DEFAULT_SLOT_HOURS, today());
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(1), Some(at(20, 13, 0)));
        assert_eq!(slots.get(2), None);

        slots.set(1, at(20, 14, 30)).unwrap();
        assert_eq!(slots.get(1), Some(at(20, 14, 30)));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_time_slots_set_out_of_range() {
        let mut slots = TimeSlots::normalized(&[], 1, &DEFAULT_SLOT_HOURS, today());
        let err = slots.set(1, at(20, 10, 0)).unwrap_err();
        assert_eq!(err, ScheduleError::SlotOutOfRange { index: 1, len: 1 });
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_time_slots_labeled() {
        let slots = TimeSlots::normalized(&[], 5, &DEFAULT_SLOT_HOURS, today());
        let labels: Vec<String> = slots
            .labeled(&DEFAULT_SLOT_LABELS)
            .map(|(label, _)| label.into_owned())
            .collect();
        assert_eq!(
            labels,
            vec!["Morning", "Afternoon", "Evening", "Bedtime", "Time 5"]
        );
    }
}
