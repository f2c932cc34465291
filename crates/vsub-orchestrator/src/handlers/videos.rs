//! Video project CRUD and the status-poll endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vsub_models::{
    CaptionCue, CaptionStyle, Filmstrip, FilmstripJob, JobKind, JobRequest, StatusEvent, VideoId,
    VideoProject,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of `POST /api/videos`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub title: String,
    pub source_url: String,
    pub duration_seconds: f64,
}

/// Create a project in `uploading` state.
pub async fn create_video(
    State(state): State<AppState>,
    Json(request): Json<CreateVideoRequest>,
) -> ApiResult<(StatusCode, Json<VideoProject>)> {
    if request.duration_seconds <= 0.0 {
        return Err(ApiError::bad_request("durationSeconds must be positive"));
    }

    let project = VideoProject::new(request.title, request.source_url, request.duration_seconds);
    info!(video_id = %project.id, "Created video project");

    state.store.insert(project.clone()).await;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Mark the upload finished and pre-trigger filmstrip generation.
///
/// The pre-trigger is best effort: by the time the user opens the editor the
/// filmstrip cache check frequently already hits. A pre-trigger failure is
/// logged and never surfaced — the editor path dispatches again on demand.
pub async fn mark_uploaded(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VideoProject>> {
    let id = VideoId::from(id);
    let applied = state
        .store
        .update(&id, |p| p.apply(StatusEvent::UploadFinished))
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;
    applied?;

    let project = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;

    if !project.has_filmstrip() {
        let worker = state.worker.clone();
        let job = JobRequest::Filmstrip(FilmstripJob {
            video_id: project.id.clone(),
            video_url: project.source_url.clone(),
            duration_seconds: project.duration_seconds,
            webhook_url: worker.webhook_url(JobKind::Filmstrip),
        });
        tokio::spawn(async move {
            if let Err(e) = worker.dispatch(&job).await {
                warn!(video_id = %job.video_id(), "Filmstrip pre-trigger failed: {}", e);
            }
        });
    }

    Ok(Json(project))
}

/// Fetch the current project record. This is the status-poll endpoint.
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VideoProject>> {
    let id = VideoId::from(id);
    let project = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;
    Ok(Json(project))
}

/// Filmstrip lookup response.
#[derive(Debug, Serialize)]
pub struct FilmstripResponse {
    pub filmstrip: Filmstrip,
}

/// Fetch the filmstrip record; 404 is the explicit "not ready yet" signal.
pub async fn get_filmstrip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FilmstripResponse>> {
    let id = VideoId::from(id);
    let project = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;

    let filmstrip = project
        .filmstrip
        .ok_or_else(|| ApiError::not_found(format!("no filmstrip for video {id}")))?;
    Ok(Json(FilmstripResponse { filmstrip }))
}

/// Body of `PUT /api/videos/:id/captions`.
#[derive(Debug, Deserialize)]
pub struct UpdateCaptionsRequest {
    pub captions: Vec<CaptionCue>,
}

/// Replace the whole caption track.
pub async fn update_captions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCaptionsRequest>,
) -> ApiResult<Json<VideoProject>> {
    let id = VideoId::from(id);
    state
        .store
        .update(&id, |p| p.set_caption_track(request.captions))
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;

    let project = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;
    Ok(Json(project))
}

/// Body of `PUT /api/videos/:id/style`.
#[derive(Debug, Deserialize)]
pub struct UpdateStyleRequest {
    pub style: CaptionStyle,
}

/// Replace the caption style.
pub async fn update_style(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStyleRequest>,
) -> ApiResult<Json<VideoProject>> {
    let id = VideoId::from(id);
    state
        .store
        .update(&id, |p| p.set_caption_style(request.style))
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;

    let project = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))?;
    Ok(Json(project))
}

/// Remove a project. Webhooks for the removed id become silent no-ops.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = VideoId::from(id);
    if !state.store.remove(&id).await {
        return Err(ApiError::not_found(format!("video {id}")));
    }
    info!(video_id = %id, "Deleted video project");
    Ok(StatusCode::NO_CONTENT)
}
