//! Expiry classification API endpoints.
//!
//! The UI sends the medicines it is about to render and gets back each
//! one's status, label, and days remaining. Styling by status stays on the
//! client.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use pillbox_core::{ExpiryStatus, ExpirySummary};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::api::error::{ApiResult, ErrorResponse};
use crate::state::SharedState;

/// Creates the expiry router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/expiry/classify", post(classify))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A medicine to classify.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Ibuprofen 200mg",
    "expires_at": "2024-01-04T00:00:00Z",
    "alert_days": 3
}))]
pub struct ClassifyItem {
    /// Optional display name, echoed back.
    #[schema(example = "Ibuprofen 200mg")]
    pub name: Option<String>,

    /// Expiration timestamp (RFC 3339).
    #[schema(example = "2024-01-04T00:00:00Z")]
    pub expires_at: DateTime<Utc>,

    /// Alert interval in days. Defaults to the configured interval.
    #[schema(example = 3, minimum = 0)]
    pub alert_days: Option<u32>,
}

/// Request body for classifying medicines.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "now": "2024-01-01T00:00:00Z",
    "items": [
        { "name": "Ibuprofen 200mg", "expires_at": "2024-01-04T00:00:00Z", "alert_days": 3 }
    ]
}))]
pub struct ClassifyRequest {
    /// Reference instant. Defaults to the server's current time.
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub now: Option<DateTime<Utc>>,

    /// Medicines to classify.
    pub items: Vec<ClassifyItem>,
}

/// Classification result for one medicine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Ibuprofen 200mg",
    "expires_at": "2024-01-04T00:00:00Z",
    "alert_days": 3,
    "status": "expiring_soon",
    "label": "Expiring Soon",
    "days_remaining": 3.0
}))]
pub struct ClassifiedItem {
    /// Display name, if one was sent.
    pub name: Option<String>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,

    /// Alert interval that was applied.
    pub alert_days: u32,

    /// Derived status.
    pub status: ExpiryStatus,

    /// Human-readable status label.
    #[schema(example = "Expiring Soon")]
    pub label: String,

    /// Exact days remaining; negative once expired.
    #[schema(example = 3.0)]
    pub days_remaining: f64,
}

/// Response for a classification request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    /// Reference instant used for every item.
    pub now: DateTime<Utc>,

    /// One result per request item, in request order.
    pub results: Vec<ClassifiedItem>,

    /// Counts per status.
    pub summary: ExpirySummary,
}

// ============================================================================
// Handlers
// ============================================================================

/// Classify medicines by expiry status.
#[utoipa::path(
    post,
    path = "/api/expiry/classify",
    tag = "expiry",
    operation_id = "classifyExpiry",
    summary = "Classify medicines by expiry status",
    description = "Returns expired, expiring_soon, or valid for each medicine. \
        A medicine is expiring soon when the time remaining is at most its alert \
        interval, measured in exact elapsed time. Items without an alert interval \
        use the configured default.",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Medicines classified", body = ClassifyResponse),
        (status = 400, description = "Malformed request body or negative alert_days", body = ErrorResponse)
    )
)]
pub async fn classify(
    State(state): State<SharedState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> ApiResult<Json<ClassifyResponse>> {
    let Json(request) = payload?;
    let default_alert_days = state.read().await.config.alerts.default_alert_days;
    let now = request.now.unwrap_or_else(Utc::now);

    let results: Vec<ClassifiedItem> = request
        .items
        .into_iter()
        .map(|item| classify_item(item, now, default_alert_days))
        .collect();
    let summary = ExpirySummary::tally(results.iter().map(|r| r.status));

    debug!(
        count = results.len(),
        expired = summary.expired,
        expiring_soon = summary.expiring_soon,
        "Classified medicines"
    );

    Ok(Json(ClassifyResponse {
        now,
        results,
        summary,
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn classify_item(item: ClassifyItem, now: DateTime<Utc>, default_alert_days: u32) -> ClassifiedItem {
    let alert_days = item.alert_days.unwrap_or(default_alert_days);
    let status = pillbox_core::classify(now, item.expires_at, alert_days);

    ClassifiedItem {
        name: item.name,
        expires_at: item.expires_at,
        alert_days,
        status,
        label: status.label().to_string(),
        days_remaining: pillbox_core::days_remaining(now, item.expires_at),
    }
}
