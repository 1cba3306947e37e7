//! v1 API handlers.
//!
//! # Endpoints
//!
//! - `POST /v1/create` – issue a payment link for an order
//! - `POST /v1/check`  – look up a payment's status
//!
//! Every logical outcome is returned with HTTP 200; failures carry
//! `{"status": "false", "error": "..."}` and the string `status` field is
//! the sole success indicator. This is a compatibility contract with the
//! system this one replaces, not an oversight.

use axum::{Json, Router, response::IntoResponse, response::Response, routing::post};
use serde_json::Value;

use crate::state::AppState;
use paylink_core::flows::FlowError;
use paylink_sdk::objects::FailureResponse;

/// Build the v1 API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_link))
        .route("/check", post(check_status))
}

/// `POST /v1/create` — validate, authenticate, convert, persist, sign.
async fn create_link(
    state: axum::extract::State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let Some(raw) = body.as_object() else {
        return failure(FlowError::InvalidStructure);
    };
    match state.create_flow.handle(raw).await {
        Ok(resp) => Json(resp).into_response(),
        Err(err) => failure(err),
    }
}

/// `POST /v1/check` — validate, authenticate, fetch, sign.
async fn check_status(
    state: axum::extract::State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let Some(raw) = body.as_object() else {
        return failure(FlowError::InvalidStructure);
    };
    match state.check_flow.handle(raw).await {
        Ok(resp) => Json(resp).into_response(),
        Err(err) => failure(err),
    }
}

/// Map a flow error onto the wire failure body. Internal faults are
/// logged here and surface only as the generic message.
fn failure(err: FlowError) -> Response {
    if let FlowError::Internal(source) = &err {
        tracing::error!(error = %source, "Flow terminated with internal error");
    }
    Json(FailureResponse::new(err.to_string())).into_response()
}
