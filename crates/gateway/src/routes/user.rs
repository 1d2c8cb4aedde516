//! Profile lookup endpoint (admin/debug).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{user, UserProfile};
use tracing::error;

use crate::state::AppState;

/// Fetch a stored profile by phone.
pub async fn get_user(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<UserProfile>, StatusCode> {
    match user::find_by_phone(state.db.pool(), &phone).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Profile lookup for {} failed: {}", phone, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
