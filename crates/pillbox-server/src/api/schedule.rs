//! Dose schedule API endpoints.
//!
//! The time picker sends the times the user has edited so far together with
//! the slot count it must show. The response always holds exactly that many
//! slots, each with its label, so the client can store it back as is.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime};
use pillbox_core::{PillboxError, TimeSlots};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::state::SharedState;

/// Largest slot count accepted per request.
pub const MAX_SLOTS: usize = 24;

/// Creates the schedule router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/schedule/normalize", post(normalize))
        .route("/schedule/slot", post(update_slot))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for normalizing dose times.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "times": ["2024-05-20T08:30:00"],
    "target_count": 3,
    "default_hours": [9, 13, 18, 21],
    "today": "2024-05-20"
}))]
pub struct NormalizeRequest {
    /// Current dose times in slot order (local wall-clock time).
    #[serde(default)]
    pub times: Vec<NaiveDateTime>,

    /// Number of slots the schedule must have.
    #[schema(example = 3, minimum = 0, maximum = 24)]
    pub target_count: usize,

    /// Hour per slot index for padded slots. Defaults to the configured hours.
    pub default_hours: Option<Vec<u32>>,

    /// Date for padded slots. Defaults to today in the configured timezone.
    #[schema(example = "2024-05-20")]
    pub today: Option<NaiveDate>,
}

/// Request body for changing one slot of a schedule.
///
/// The times are normalized to `target_count` first, so a client can edit a
/// slot that was only just padded in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "times": ["2024-05-20T08:30:00", "2024-05-20T20:00:00"],
    "target_count": 2,
    "index": 1,
    "time": "2024-05-20T21:15:00"
}))]
pub struct UpdateSlotRequest {
    /// Current dose times in slot order (local wall-clock time).
    #[serde(default)]
    pub times: Vec<NaiveDateTime>,

    /// Number of slots the schedule must have.
    #[schema(example = 2, minimum = 0, maximum = 24)]
    pub target_count: usize,

    /// Zero-based slot to change. Must be below `target_count`.
    #[schema(example = 1)]
    pub index: usize,

    /// New time for the slot.
    #[schema(example = "2024-05-20T21:15:00")]
    pub time: NaiveDateTime,

    /// Hour per slot index for padded slots. Defaults to the configured hours.
    pub default_hours: Option<Vec<u32>>,

    /// Date for padded slots. Defaults to today in the configured timezone.
    pub today: Option<NaiveDate>,
}

/// A single labeled slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "index": 0,
    "label": "Morning",
    "time": "2024-05-20T08:30:00"
}))]
pub struct SlotResponse {
    /// Zero-based slot index.
    #[schema(example = 0)]
    pub index: usize,

    /// Display label.
    #[schema(example = "Morning")]
    pub label: String,

    /// Dose time.
    #[schema(example = "2024-05-20T08:30:00")]
    pub time: NaiveDateTime,
}

/// Normalized schedule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NormalizeResponse {
    /// Date used for padded slots.
    pub today: NaiveDate,

    /// Number of slots, equal to the requested target count.
    pub target_count: usize,

    /// Slots in order.
    pub slots: Vec<SlotResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Normalize dose times to a fixed slot count.
#[utoipa::path(
    post,
    path = "/api/schedule/normalize",
    tag = "schedule",
    operation_id = "normalizeSchedule",
    summary = "Pad or truncate dose times to a slot count",
    description = "Returns exactly target_count slots. Missing slots are filled \
        with the default hour for their index (09:00 beyond the list) on the given \
        day; extra times are dropped from the end. Existing times keep their order.",
    request_body = NormalizeRequest,
    responses(
        (status = 200, description = "Schedule normalized", body = NormalizeResponse),
        (status = 400, description = "Malformed body, invalid slot count or default hour", body = ErrorResponse)
    )
)]
pub async fn normalize(
    State(state): State<SharedState>,
    payload: Result<Json<NormalizeRequest>, JsonRejection>,
) -> ApiResult<Json<NormalizeResponse>> {
    let Json(request) = payload?;
    validate_request(request.target_count, request.default_hours.as_deref())?;

    let state_guard = state.read().await;
    let schedule = &state_guard.config.schedule;

    let today = request.today.unwrap_or_else(|| state_guard.today());
    let default_hours = request
        .default_hours
        .as_deref()
        .unwrap_or(schedule.default_hours.as_slice());

    let slots = TimeSlots::normalized(&request.times, request.target_count, default_hours, today);
    debug!(
        received = request.times.len(),
        target_count = request.target_count,
        "Normalized dose schedule"
    );

    Ok(Json(build_response(
        &slots,
        schedule.slot_labels.as_slice(),
        today,
    )))
}

/// Set one slot of a normalized schedule.
#[utoipa::path(
    post,
    path = "/api/schedule/slot",
    tag = "schedule",
    operation_id = "updateScheduleSlot",
    summary = "Change the time of one dose slot",
    description = "Normalizes the times to target_count like /api/schedule/normalize, \
        then replaces the slot at index. An index at or beyond target_count is \
        rejected; the schedule never grows through this call.",
    request_body = UpdateSlotRequest,
    responses(
        (status = 200, description = "Slot updated", body = NormalizeResponse),
        (status = 400, description = "Malformed body, invalid slot count, default hour, or slot index", body = ErrorResponse)
    )
)]
pub async fn update_slot(
    State(state): State<SharedState>,
    payload: Result<Json<UpdateSlotRequest>, JsonRejection>,
) -> ApiResult<Json<NormalizeResponse>> {
    let Json(request) = payload?;
    validate_request(request.target_count, request.default_hours.as_deref())?;

    let state_guard = state.read().await;
    let schedule = &state_guard.config.schedule;

    let today = request.today.unwrap_or_else(|| state_guard.today());
    let default_hours = request
        .default_hours
        .as_deref()
        .unwrap_or(schedule.default_hours.as_slice());

    let mut slots =
        TimeSlots::normalized(&request.times, request.target_count, default_hours, today);
    slots
        .set(request.index, request.time)
        .map_err(PillboxError::from)?;
    debug!(index = request.index, time = %request.time, "Updated dose slot");

    Ok(Json(build_response(
        &slots,
        schedule.slot_labels.as_slice(),
        today,
    )))
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_request(target_count: usize, default_hours: Option<&[u32]>) -> ApiResult<()> {
    if target_count > MAX_SLOTS {
        return Err(ApiError::bad_request(
            "target_count_too_large",
            format!("target_count must be at most {MAX_SLOTS}, got {target_count}"),
        ));
    }

    if let Some(hours) = default_hours {
        if let Some((i, hour)) = hours.iter().enumerate().find(|(_, h)| **h > 23) {
            return Err(ApiError::bad_request(
                "invalid_default_hour",
                format!("default_hours[{i}] must be between 0 and 23, got {hour}"),
            ));
        }
    }

    Ok(())
}

fn build_response(slots: &TimeSlots, labels: &[String], today: NaiveDate) -> NormalizeResponse {
    let target_count = slots.len();
    let slots = slots
        .labeled(labels)
        .enumerate()
        .map(|(index, (label, time))| SlotResponse {
            index,
            label: label.into_owned(),
            time,
        })
        .collect();

    NormalizeResponse {
        today,
        target_count,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_validate_accepts_limits() {
        assert!(validate_request(0, None).is_ok());
        assert!(validate_request(MAX_SLOTS, Some([0, 23].as_slice())).is_ok());
    }

    #[test]
    fn test_validate_rejects_large_target() {
        let err = validate_request(MAX_SLOTS + 1, None).unwrap_err();
        assert!(err.to_string().contains("at most 24"));
    }

    #[test]
    fn test_validate_rejects_bad_hour() {
        let err = validate_request(2, Some([9, 24].as_slice())).unwrap_err();
        assert!(err.to_string().contains("default_hours[1]"));
    }

    #[test]
    fn test_request_deserialization_defaults() {
        let json = r#"{"target_count": 4}"#;
        let request: NormalizeRequest = serde_json::from_str(json).unwrap();
        assert!(request.times.is_empty());
        assert!(request.default_hours.is_none());
        assert!(request.today.is_none());
    }

    #[test]
    fn test_update_request_requires_index_and_time() {
        let json = r#"{"target_count": 2, "time": "2024-05-20T07:00:00"}"#;
        assert!(serde_json::from_str::<UpdateSlotRequest>(json).is_err());

        let json = r#"{"target_count": 2, "index": 1, "time": "2024-05-20T07:00:00"}"#;
        let request: UpdateSlotRequest = serde_json::from_str(json).unwrap();
        assert!(request.times.is_empty());
        assert_eq!(request.index, 1);
    }

    #[test]
    fn test_build_response_labels_slots() {
        let slots = TimeSlots::normalized(&[], 2, &[8, 20], today());
        let labels = vec!["Breakfast".to_string()];

        let response = build_response(&slots, &labels, today());
        assert_eq!(response.target_count, 2);
        assert_eq!(response.slots[0].label, "Breakfast");
        assert_eq!(response.slots[1].label, "Time 2");
        assert_eq!(response.slots[1].index, 1);
    }
}
