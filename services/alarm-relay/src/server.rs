//! HTTP surface: `POST /send_alarm` and `GET /health`

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::authorization::{AuthorizationOutcome, Authorizer};
use crate::dispatch::{dispatch, DeliverySummary};
use crate::error::ClientInputError;
use crate::notifier::Notifier;
use crate::validation::validate_request;

pub const SUCCESS_MESSAGE: &str = "Alarm notifications sent successfully";
pub const AUTHORIZATION_FAILED_MESSAGE: &str = "API validation failed, alarm not sent.";
pub const UPSTREAM_FAILED_MESSAGE: &str = "API request failed.";

/// Collaborators shared by every request
#[derive(Clone)]
pub struct RelayState {
    pub authorizer: Arc<dyn Authorizer>,
    pub notifier: Arc<dyn Notifier>,
}

/// Ways a `/send_alarm` request can be refused
#[derive(Debug)]
pub enum ApiError {
    Input(ClientInputError),
    AuthorizationDenied,
    Upstream(crate::RelayError),
}

impl From<ClientInputError> for ApiError {
    fn from(e: ClientInputError) -> Self {
        ApiError::Input(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Input(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::AuthorizationDenied => (
                StatusCode::BAD_REQUEST,
                AUTHORIZATION_FAILED_MESSAGE.to_string(),
            ),
            ApiError::Upstream(e) => {
                tracing::error!("Authorization API unreachable: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILED_MESSAGE.to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the relay axum router
pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/send_alarm", post(send_alarm_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn send_alarm_handler(
    State(relay): State<RelayState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let event = validate_request(&body).inspect_err(|e| tracing::warn!("Rejected alarm: {}", e))?;

    match relay.authorizer.authorize().await {
        Ok(AuthorizationOutcome::Granted) => {}
        Ok(AuthorizationOutcome::Denied(_)) => return Err(ApiError::AuthorizationDenied),
        Err(e) => return Err(ApiError::Upstream(e)),
    }

    let outcomes = dispatch(&event, relay.notifier.as_ref()).await;
    let summary = DeliverySummary::from_outcomes(&outcomes);
    tracing::info!(
        "Alarm batch for '{}' finished: {} delivered, {} failed, {} skipped",
        event.site_name,
        summary.delivered,
        summary.failed,
        summary.skipped
    );

    Ok((StatusCode::OK, Json(json!({ "message": SUCCESS_MESSAGE }))))
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
