//! OpenAPI specification generation for the pillbox API.
//!
//! The document is served at `/api/openapi.json` (with Swagger UI at
//! `/docs`) and written to disk by the `gen-openapi` binary for client
//! generation.

use pillbox_core::{ExpiryStatus, ExpirySummary};
use utoipa::OpenApi;

use super::config::ConfigResponse;
use super::error::ErrorResponse;
use super::expiry::{ClassifiedItem, ClassifyItem, ClassifyRequest, ClassifyResponse};
use super::health::HealthResponse;
use super::schedule::{NormalizeRequest, NormalizeResponse, SlotResponse, UpdateSlotRequest};

/// Returns the OpenAPI specification as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Main OpenAPI document structure for pillbox.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pillbox API",
        version = "0.1.0",
        description = r#"
# pillbox API

Domain rules behind the pillbox medication reminder app.

## Overview

1. **Expiry classification**: Derive expired / expiring soon / valid from an
   expiration timestamp and an alert interval in days.
2. **Dose scheduling**: Pad or truncate a list of dose times so it always has
   exactly one entry per daily dose.

Both operations are stateless. Pass `now` or `today` explicitly for
reproducible results; otherwise the server clock and configured timezone
are used.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local pillbox server")
    ),
    tags(
        (name = "system", description = "Health checks"),
        (name = "expiry", description = "Medicine expiry classification"),
        (name = "schedule", description = "Daily dose time slots"),
        (name = "config", description = "Effective server defaults")
    ),
    paths(
        super::health::health_check,
        super::expiry::classify,
        super::schedule::normalize,
        super::schedule::update_slot,
        super::config::get_config,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ExpiryStatus,
            ExpirySummary,
            ClassifyItem,
            ClassifyRequest,
            ClassifiedItem,
            ClassifyResponse,
            NormalizeRequest,
            NormalizeResponse,
            SlotResponse,
            UpdateSlotRequest,
            ConfigResponse,
        )
    )
)]
pub struct ApiDoc;
