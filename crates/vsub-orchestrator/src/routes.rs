//! API routes.

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::health;
use crate::handlers::jobs::{
    generate_filmstrip, generate_thumbnails, start_render, start_transcription,
};
use crate::handlers::videos::{
    create_video, delete_video, get_filmstrip, get_video, mark_uploaded, update_captions,
    update_style,
};
use crate::handlers::webhooks::{
    filmstrip_webhook, render_webhook, thumbnails_webhook, transcription_webhook,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let video_routes = Router::new()
        .route("/videos", post(create_video))
        .route("/videos/:video_id", get(get_video).delete(delete_video))
        .route("/videos/:video_id/uploaded", post(mark_uploaded))
        .route("/videos/:video_id/captions", put(update_captions))
        .route("/videos/:video_id/style", put(update_style))
        .route(
            "/videos/:video_id/filmstrip",
            get(get_filmstrip).post(generate_filmstrip),
        );

    let job_routes = Router::new()
        .route("/videos/:video_id/transcribe", post(start_transcription))
        .route("/videos/:video_id/render", post(start_render))
        .route("/videos/:video_id/thumbnails", post(generate_thumbnails));

    // Worker callbacks. Unauthenticated by design in this deployment shape;
    // signing is the documented hardening path.
    let webhook_routes = Router::new()
        .route("/webhooks/transcription", post(transcription_webhook))
        .route("/webhooks/render", post(render_webhook))
        .route("/webhooks/filmstrip", post(filmstrip_webhook))
        .route("/webhooks/thumbnails", post(thumbnails_webhook));

    let api_routes = Router::new()
        .merge(video_routes)
        .merge(job_routes)
        .merge(webhook_routes);

    let health_routes = Router::new().route("/health", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
