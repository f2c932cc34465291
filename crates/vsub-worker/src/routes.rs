//! Worker router assembly.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer;
use crate::handlers;
use crate::state::WorkerState;

/// Build the worker router.
///
/// The four job endpoints sit behind bearer auth; the root, health check,
/// metrics scrape, and render downloads are public.
pub fn create_router(state: WorkerState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let jobs = Router::new()
        .route("/transcribe", post(handlers::transcribe))
        .route("/render", post(handlers::render))
        .route("/generate-filmstrip", post(handlers::generate_filmstrip))
        .route("/generate-thumbnails", post(handlers::generate_thumbnails))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    let mut router = Router::new()
        .merge(jobs)
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/download/:video_id", get(handlers::download));

    if let Some(handle) = metrics_handle {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
