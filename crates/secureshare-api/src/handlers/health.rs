//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use secureshare_core::result::AppResult;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
///
/// Pings both stores concurrently. Answers 503 when either is unreachable.
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let (storage, database) = tokio::join!(
        state.objects.health_check(),
        state.records.health_check()
    );

    let healthy = is_up(&storage) && is_up(&database);
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: describe(state.objects.provider_type(), &storage),
            database: describe(state.records.provider_type(), &database),
        })),
    )
}

fn is_up(result: &AppResult<bool>) -> bool {
    matches!(result, Ok(true))
}

fn describe(provider: &str, result: &AppResult<bool>) -> String {
    match result {
        Ok(true) => format!("{provider}: available"),
        Ok(false) => format!("{provider}: unavailable"),
        Err(e) => {
            tracing::warn!(provider, error = %e, "Health check failed");
            format!("{provider}: unavailable")
        }
    }
}
