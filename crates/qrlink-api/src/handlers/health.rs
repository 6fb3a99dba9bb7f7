//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (records, objects) = state.registry.health().await;
    let record_store = records.unwrap_or(false);
    let object_store = objects.unwrap_or(false);
    let healthy = record_store && object_store;

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            record_store,
            object_store,
            object_store_provider: state.registry.objects().provider_type().to_string(),
        }),
    )
}
