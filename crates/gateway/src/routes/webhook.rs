//! Inbound webhook endpoint for Twilio.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use tracing::{debug, error};
use twilio_whatsapp::TwilioWebhook;

use crate::state::AppState;

/// Receive an inbound WhatsApp message.
///
/// Twilio gets its 200 immediately; the turn runs as an independent task.
/// Each inbound message is stateless - everything it needs is reloaded
/// from the store inside the router.
pub async fn receive_message(
    State(state): State<AppState>,
    Form(payload): Form<TwilioWebhook>,
) -> StatusCode {
    let Some(inbound) = payload.into_inbound() else {
        debug!("Ignoring webhook without a usable message");
        return StatusCode::OK;
    };

    let router = state.router.clone();
    tokio::spawn(async move {
        let phone = inbound.phone.clone();
        if let Err(e) = router.handle(inbound).await {
            // The router degrades failures to fallback replies itself;
            // anything surfacing here is unexpected.
            error!("Turn for {} failed: {}", phone, e);
        }
    });

    StatusCode::OK
}
