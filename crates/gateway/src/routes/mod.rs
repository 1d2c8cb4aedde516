//! Route handlers for the gateway.

pub mod admin;
pub mod health;
pub mod user;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Inbound messages from Twilio
        .route("/whatsapp/webhook", post(webhook::receive_message))
        // Health check
        .route("/health", get(health::health))
        // Admin/debug endpoints
        .route("/user/:phone", get(user::get_user))
        .route("/admin/refresh-behaviour", post(admin::refresh_behaviour))
}
