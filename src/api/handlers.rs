use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use nanoid::nanoid;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use tracing::Instrument;

use crate::error::{AdapterError, ErrorBody, INVALID_JSON_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE};

use super::AppState;
use super::models::parse_search_request;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Single entry point for every path: OPTIONS is a preflight, POST searches,
/// everything else is rejected.
pub async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    if method != Method::POST {
        let mut response = json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorBody::new(METHOD_NOT_ALLOWED_MESSAGE),
        );
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
        return response;
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let expose_detail = state.orchestrator.config().expose_error_detail;
            return body_rejection_response(rejection, expose_detail);
        }
    };

    let request_id = nanoid!(10);
    search_handler(state, body)
        .instrument(tracing::info_span!("search", %request_id))
        .await
}

async fn search_handler(state: AppState, body: Bytes) -> Response {
    let orchestrator = state.orchestrator.clone();
    let expose_detail = orchestrator.config().expose_error_detail;

    // nothing is parsed until the server can actually search
    if !orchestrator.config().has_api_key() {
        return error_response(&AdapterError::Configuration, expose_detail);
    }

    let body: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("rejecting body that is not JSON: {e}");
            let detail = expose_detail.then(|| e.to_string());
            return json_response(
                StatusCode::BAD_REQUEST,
                &ErrorBody {
                    error: INVALID_JSON_MESSAGE.to_string(),
                    detail,
                },
            );
        }
    };

    let request = match parse_search_request(&body) {
        Ok(request) => request,
        Err(e) => return error_response(&e, expose_detail),
    };

    match orchestrator.handle(request).await {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(e) => error_response(&e, expose_detail),
    }
}

/// Oversized or unreadable bodies still get a JSON envelope.
fn body_rejection_response(rejection: BytesRejection, expose_detail: bool) -> Response {
    let status = rejection.status();
    tracing::warn!("could not read request body ({status}): {}", rejection.body_text());
    let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body too large."
    } else {
        "Request body could not be read."
    };
    json_response(
        status,
        &ErrorBody {
            error: error.to_string(),
            detail: expose_detail.then(|| rejection.body_text()),
        },
    )
}

pub fn error_response(err: &AdapterError, expose_detail: bool) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("search failed: {err}");
    } else {
        tracing::warn!("bad request: {err}");
    }
    json_response(status, &ErrorBody::from_error(err, expose_detail))
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            bytes,
        )
            .into_response(),
        Err(e) => internal_error(&format!("failed to serialize response: {e}")),
    }
}

/// Response for a panic caught anywhere below the router.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    internal_error(&message)
}

fn internal_error(message: &str) -> Response {
    tracing::error!("internal error: {message}");
    let body = serde_json::json!({ "error": "Internal server error." }).to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        body,
    )
        .into_response()
}
