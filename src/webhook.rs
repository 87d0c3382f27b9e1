use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::error::WebhookError;
use crate::handlers::Handler;
use crate::platform::telegram::{self, RawUpdate};
use crate::secret::{self, SECRET_HEADER};

pub const SERVICE_NAME: &str = "telegram-ingestion";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    secret: Arc<str>,
    handler: Arc<dyn Handler>,
    handler_timeout: Duration,
}

impl AppState {
    pub fn new(secret: &str, handler: Arc<dyn Handler>, handler_timeout: Duration) -> Self {
        Self {
            secret: Arc::from(secret),
            handler,
            handler_timeout,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/telegram/webhook", post(telegram_webhook))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": VERSION,
        "service": SERVICE_NAME,
    }))
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": VERSION,
        "health": "/health",
    }))
}

/// Receive a webhook update from Telegram.
///
/// Authentication happens before the body is looked at. Anything that gets
/// past parsing is acknowledged with 200, so Telegram never redelivers an
/// update because a handler failed.
async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    let provided = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if !secret::validate(provided, &state.secret) {
        warn!("Webhook rejected: invalid secret token");
        return Err(WebhookError::Unauthorized);
    }

    let update: RawUpdate = serde_json::from_slice(&body).map_err(|e| {
        warn!("Webhook rejected: failed to parse update - {}", e);
        WebhookError::from(e)
    })?;

    debug!(
        "Received update {:?} ({})",
        update.update_id,
        update.payload.variant_name()
    );

    let message = match telegram::normalize(&update) {
        Some(message) => message,
        None => {
            debug!(
                "Ignoring update {:?}: no usable {}",
                update.update_id,
                update.payload.variant_name()
            );
            return Ok(Json(json!({"status": "ignored"})));
        }
    };

    let handler = state.handler.as_ref();
    match tokio::time::timeout(state.handler_timeout, handler.deliver(&message)).await {
        Ok(Ok(())) => debug!(
            "Delivered message {} from chat {} via {}",
            message.source_id,
            message.chat_id,
            handler.name()
        ),
        Ok(Err(e)) => error!(
            "Handler '{}' failed for message {} in chat {} (update {:?}): {}",
            handler.name(),
            message.source_id,
            message.chat_id,
            message.update_id,
            e
        ),
        Err(_) => error!(
            "Handler '{}' timed out after {:?} for message {} in chat {} (update {:?})",
            handler.name(),
            state.handler_timeout,
            message.source_id,
            message.chat_id,
            message.update_id
        ),
    }

    Ok(Json(json!({"status": "ok"})))
}
