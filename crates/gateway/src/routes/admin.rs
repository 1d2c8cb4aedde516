//! Admin endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::state::AppState;

/// Response body for a behaviour refresh run.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub refreshed: usize,
    pub failures: Vec<RefreshFailure>,
}

/// One isolated per-user failure.
#[derive(Serialize)]
pub struct RefreshFailure {
    pub phone: String,
    pub error: String,
}

/// Trigger the behaviour refresh batch on demand.
pub async fn refresh_behaviour(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    match state.analytics.refresh_all(state.refresh_concurrency).await {
        Ok(summary) => Ok(Json(RefreshResponse {
            refreshed: summary.refreshed,
            failures: summary
                .failures
                .into_iter()
                .map(|(phone, error)| RefreshFailure { phone, error })
                .collect(),
        })),
        Err(e) => {
            error!("Behaviour refresh failed to start: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
