//! Webhook endpoints the worker reports back to.
//!
//! Every handler is idempotent: a completed payload is a full overwrite of
//! the relevant fields, a duplicate or late delivery lands last-write-wins,
//! and an unknown video id is a logged no-op. The worker treats delivery as
//! fire-and-forget, so nothing here returns an error status for payloads it
//! cannot apply.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use vsub_models::{
    FilmstripWebhook, JobKind, RenderWebhook, StatusEvent, ThumbnailsWebhook, TranscriptionWebhook,
    WebhookStatus,
};

use crate::metrics;
use crate::state::AppState;

/// `POST /api/webhooks/transcription`.
pub async fn transcription_webhook(
    State(state): State<AppState>,
    Json(payload): Json<TranscriptionWebhook>,
) -> StatusCode {
    let kind = JobKind::Transcription;
    metrics::record_webhook(kind.as_str());

    let applied = match payload.status {
        WebhookStatus::Completed => {
            let cues = payload.subtitles.unwrap_or_default();
            info!(video_id = %payload.video_id, cues = cues.len(), "Transcription completed");
            metrics::record_job_completed(kind.as_str());
            state
                .store
                .update(&payload.video_id, |p| {
                    p.set_caption_track(cues.into_iter().map(Into::into).collect());
                    p.apply(StatusEvent::TranscriptionSucceeded).ok();
                })
                .await
        }
        WebhookStatus::Failed => {
            // Error detail is logged only, never persisted on the record.
            warn!(
                video_id = %payload.video_id,
                "Transcription failed: {}",
                payload.error.as_deref().unwrap_or("no detail")
            );
            metrics::record_job_failed(kind.as_str());
            state
                .store
                .update(&payload.video_id, |p| {
                    p.apply(StatusEvent::JobFailed).ok();
                })
                .await
        }
    };

    if applied.is_none() {
        warn!(video_id = %payload.video_id, "Transcription webhook for unknown video, ignoring");
    }
    StatusCode::OK
}

/// `POST /api/webhooks/render`.
pub async fn render_webhook(
    State(state): State<AppState>,
    Json(payload): Json<RenderWebhook>,
) -> StatusCode {
    let kind = JobKind::Render;
    metrics::record_webhook(kind.as_str());

    let applied = match payload.status {
        WebhookStatus::Completed => match payload.output_url {
            Some(output_url) => {
                info!(
                    video_id = %payload.video_id,
                    output_path = payload.output_path.as_deref().unwrap_or("-"),
                    "Render completed: {output_url}"
                );
                metrics::record_job_completed(kind.as_str());
                state
                    .store
                    .update(&payload.video_id, |p| {
                        p.set_output_url(output_url);
                        p.apply(StatusEvent::RenderSucceeded).ok();
                    })
                    .await
            }
            None => {
                warn!(video_id = %payload.video_id, "Completed render webhook without outputUrl");
                metrics::record_job_failed(kind.as_str());
                state
                    .store
                    .update(&payload.video_id, |p| {
                        p.apply(StatusEvent::JobFailed).ok();
                    })
                    .await
            }
        },
        WebhookStatus::Failed => {
            warn!(
                video_id = %payload.video_id,
                "Render failed: {}",
                payload.error.as_deref().unwrap_or("no detail")
            );
            metrics::record_job_failed(kind.as_str());
            state
                .store
                .update(&payload.video_id, |p| {
                    p.apply(StatusEvent::JobFailed).ok();
                })
                .await
        }
    };

    if applied.is_none() {
        warn!(video_id = %payload.video_id, "Render webhook for unknown video, ignoring");
    }
    StatusCode::OK
}

/// `POST /api/webhooks/filmstrip`.
///
/// Filmstrip is a side channel: the sprite record is stored but `status`
/// never moves, in either direction.
pub async fn filmstrip_webhook(
    State(state): State<AppState>,
    Json(payload): Json<FilmstripWebhook>,
) -> StatusCode {
    let kind = JobKind::Filmstrip;
    metrics::record_webhook(kind.as_str());

    match (payload.status, payload.filmstrip_url, payload.metadata) {
        (WebhookStatus::Completed, Some(url), Some(metadata)) => {
            info!(
                video_id = %payload.video_id,
                frames = metadata.frame_count,
                "Filmstrip completed: {url}"
            );
            metrics::record_job_completed(kind.as_str());
            let applied = state
                .store
                .update(&payload.video_id, |p| {
                    p.set_filmstrip(metadata.into_filmstrip(url));
                })
                .await;
            if applied.is_none() {
                warn!(video_id = %payload.video_id, "Filmstrip webhook for unknown video, ignoring");
            }
        }
        (WebhookStatus::Completed, ..) => {
            warn!(video_id = %payload.video_id, "Completed filmstrip webhook missing url or metadata");
            metrics::record_job_failed(kind.as_str());
        }
        (WebhookStatus::Failed, ..) => {
            warn!(
                video_id = %payload.video_id,
                "Filmstrip generation failed: {}",
                payload.error.as_deref().unwrap_or("no detail")
            );
            metrics::record_job_failed(kind.as_str());
        }
    }

    StatusCode::OK
}

/// `POST /api/webhooks/thumbnails`.
pub async fn thumbnails_webhook(
    State(state): State<AppState>,
    Json(payload): Json<ThumbnailsWebhook>,
) -> StatusCode {
    let kind = JobKind::Thumbnails;
    metrics::record_webhook(kind.as_str());

    match payload.status {
        WebhookStatus::Completed => {
            let thumbnails = payload.thumbnails.unwrap_or_default();
            info!(
                video_id = %payload.video_id,
                count = thumbnails.len(),
                "Thumbnails completed"
            );
            metrics::record_job_completed(kind.as_str());
            let applied = state
                .store
                .update(&payload.video_id, |p| p.set_thumbnails(thumbnails))
                .await;
            if applied.is_none() {
                warn!(video_id = %payload.video_id, "Thumbnails webhook for unknown video, ignoring");
            }
        }
        WebhookStatus::Failed => {
            warn!(
                video_id = %payload.video_id,
                "Thumbnail generation failed: {}",
                payload.error.as_deref().unwrap_or("no detail")
            );
            metrics::record_job_failed(kind.as_str());
        }
    }

    StatusCode::OK
}
