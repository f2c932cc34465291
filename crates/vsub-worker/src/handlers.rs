//! Worker HTTP handlers.
//!
//! Job endpoints accept-and-spawn: validation of the payload shape is the
//! only synchronous work, the media pipeline runs on a detached task, and
//! the caller gets a `202 Accepted` acknowledgement immediately.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::info;

use vsub_media::rendered_file_name;
use vsub_models::{DispatchAck, FilmstripJob, RenderJob, ThumbnailsJob, TranscribeJob, VideoId};

use crate::jobs;
use crate::metrics::record_job_accepted;
use crate::state::WorkerState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Unauthenticated service identification at the root.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "vsub-worker",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn transcribe(
    State(state): State<WorkerState>,
    Json(job): Json<TranscribeJob>,
) -> (StatusCode, Json<DispatchAck>) {
    info!(video_id = %job.video_id, "Accepted transcription job");
    record_job_accepted("transcription");
    let ack = DispatchAck::processing(job.video_id.clone(), "Transcription started");
    tokio::spawn(jobs::transcribe::run(state, job));
    (StatusCode::ACCEPTED, Json(ack))
}

pub async fn render(
    State(state): State<WorkerState>,
    Json(job): Json<RenderJob>,
) -> (StatusCode, Json<DispatchAck>) {
    info!(
        video_id = %job.video_id,
        cues = job.subtitles.len(),
        format = job.format.map(|f| f.as_str()).unwrap_or("source"),
        "Accepted render job"
    );
    record_job_accepted("render");
    let ack = DispatchAck::processing(job.video_id.clone(), "Render started");
    tokio::spawn(jobs::render::run(state, job));
    (StatusCode::ACCEPTED, Json(ack))
}

pub async fn generate_filmstrip(
    State(state): State<WorkerState>,
    Json(job): Json<FilmstripJob>,
) -> (StatusCode, Json<DispatchAck>) {
    info!(
        video_id = %job.video_id,
        duration = job.duration_seconds,
        "Accepted filmstrip job"
    );
    record_job_accepted("filmstrip");
    let ack = DispatchAck::processing(job.video_id.clone(), "Filmstrip generation started");
    tokio::spawn(jobs::filmstrip::run(state, job));
    (StatusCode::ACCEPTED, Json(ack))
}

pub async fn generate_thumbnails(
    State(state): State<WorkerState>,
    Json(job): Json<ThumbnailsJob>,
) -> (StatusCode, Json<DispatchAck>) {
    info!(
        video_id = %job.video_id,
        duration = job.duration_seconds,
        "Accepted thumbnails job"
    );
    record_job_accepted("thumbnails");
    let ack = DispatchAck::processing(job.video_id.clone(), "Thumbnail generation started");
    tokio::spawn(jobs::thumbnails::run(state, job));
    (StatusCode::ACCEPTED, Json(ack))
}

/// Serve a finished render. This backs the `outputUrl` the render webhook
/// hands to clients, so it takes no bearer credential.
pub async fn download(
    State(state): State<WorkerState>,
    Path(video_id): Path<VideoId>,
) -> Response {
    let file_name = rendered_file_name(&video_id);
    let path = state.config.uploads_dir.join(&file_name);

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "video/mp4".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Rendered video not found" })),
        )
            .into_response(),
    }
}
