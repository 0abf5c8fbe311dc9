//! Configuration API endpoints.
//!
//! Exposes the effective defaults so clients can render the same slot
//! labels and alert interval the server applies.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::SharedState;

/// Creates the config router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/config", get(get_config))
}

/// Current configuration response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "default_alert_days": 30,
    "default_hours": [9, 13, 18, 21],
    "slot_labels": ["Morning", "Afternoon", "Evening", "Bedtime"],
    "timezone": "Europe/London"
}))]
pub struct ConfigResponse {
    /// Alert interval applied to medicines without their own.
    #[schema(example = 30)]
    pub default_alert_days: u32,

    /// Hour per slot index for padded slots.
    pub default_hours: Vec<u32>,

    /// Label per slot index.
    pub slot_labels: Vec<String>,

    /// Configured timezone (IANA format).
    #[schema(example = "Europe/London")]
    pub timezone: String,
}

/// Get the effective configuration.
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "config",
    operation_id = "getConfig",
    summary = "Get effective configuration",
    description = "Returns the default alert interval, default slot hours, slot \
        labels, and timezone the server applies when a request omits them.",
    responses(
        (status = 200, description = "Configuration retrieved", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    let state_guard = state.read().await;
    let config = &state_guard.config;

    Json(ConfigResponse {
        default_alert_days: config.alerts.default_alert_days,
        default_hours: config.schedule.default_hours.clone(),
        slot_labels: config.schedule.slot_labels.clone(),
        timezone: state_guard.timezone.name().to_string(),
    })
}
