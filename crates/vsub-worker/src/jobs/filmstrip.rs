//! Filmstrip job: one sprite sheet per video, published into the uploads
//! tree.

use std::time::Instant;

use tracing::{error, info};

use vsub_media::{generate_sprite, publish_thumbnail};
use vsub_models::{frame_count_for_duration, FilmstripJob, FilmstripWebhook};

use crate::error::WorkerResult;
use crate::metrics::{record_job_finished, record_webhook_failure};
use crate::state::WorkerState;
use crate::webhook::adaptive_timeout;

/// Published file name of the sprite sheet.
const SPRITE_FILE: &str = "filmstrip.jpg";

pub async fn run(state: WorkerState, job: FilmstripJob) {
    let started = Instant::now();
    let video_id = job.video_id.clone();
    let webhook_url = job.webhook_url.clone();

    let outcome = execute(&state, &job).await;
    let success = outcome.is_ok();
    let payload = match outcome {
        Ok((url, metadata)) => {
            info!(
                video_id = %video_id,
                frames = metadata.frame_count,
                "Filmstrip job finished"
            );
            FilmstripWebhook::completed(video_id.clone(), url, metadata)
        }
        Err(e) => {
            error!(video_id = %video_id, error = %e, "Filmstrip job failed");
            FilmstripWebhook::failed(video_id.clone(), e.to_string())
        }
    };

    // Sprite metadata rides along; give long sources a wider delivery window.
    let timeout = adaptive_timeout(job.duration_seconds);
    if let Err(e) = state
        .notifier
        .deliver_with_timeout(&webhook_url, &payload, timeout)
        .await
    {
        error!(video_id = %video_id, error = %e, "Filmstrip webhook lost");
        record_webhook_failure("filmstrip");
    }
    record_job_finished("filmstrip", success, started.elapsed().as_secs_f64());
}

async fn execute(
    state: &WorkerState,
    job: &FilmstripJob,
) -> WorkerResult<(String, vsub_models::FilmstripMetadata)> {
    let (workspace, source) =
        super::prepare_source(state, "filmstrip", &job.video_id, &job.video_url).await?;

    let frame_count = frame_count_for_duration(job.duration_seconds);
    let sprite = workspace.file(SPRITE_FILE);
    let metadata = generate_sprite(&source, &sprite, frame_count).await?;

    let url = publish_thumbnail(
        &sprite,
        &state.config.uploads_dir,
        &job.video_id,
        SPRITE_FILE,
    )
    .await?;

    Ok((url, metadata))
}
