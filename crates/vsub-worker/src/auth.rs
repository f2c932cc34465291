//! Bearer authentication for job endpoints.
//!
//! The only credential in the system is the shared secret the orchestrator
//! presents when dispatching. Missing header, malformed bearer syntax, and a
//! wrong token are all the same 401 — a caller learns nothing about which
//! part was wrong.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::state::WorkerState;

/// Require `Authorization: Bearer <shared secret>` on a request.
pub async fn require_bearer(
    State(state): State<WorkerState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.config.worker_secret);

    if !authorized {
        warn!(path = %request.uri().path(), "Rejected unauthenticated job request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid or missing bearer token"})),
        )
            .into_response();
    }

    next.run(request).await
}
