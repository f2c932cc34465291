//! Thumbnails job: evenly spaced preview frames published individually.

use std::time::Instant;

use tracing::{error, info};

use vsub_media::{extract_frames, frame_file_name, publish_thumbnail};
use vsub_models::{
    frame_timestamps, thumbnail_count_for_duration, Thumbnail, ThumbnailsJob, ThumbnailsWebhook,
};

use crate::error::WorkerResult;
use crate::metrics::{record_job_finished, record_webhook_failure};
use crate::state::WorkerState;
use crate::webhook::adaptive_timeout;

pub async fn run(state: WorkerState, job: ThumbnailsJob) {
    let started = Instant::now();
    let video_id = job.video_id.clone();
    let webhook_url = job.webhook_url.clone();

    let outcome = execute(&state, &job).await;
    let success = outcome.is_ok();
    let payload = match outcome {
        Ok(thumbnails) => {
            info!(
                video_id = %video_id,
                thumbnails = thumbnails.len(),
                "Thumbnails job finished"
            );
            ThumbnailsWebhook::completed(video_id.clone(), thumbnails)
        }
        Err(e) => {
            error!(video_id = %video_id, error = %e, "Thumbnails job failed");
            ThumbnailsWebhook::failed(video_id.clone(), e.to_string())
        }
    };

    let timeout = adaptive_timeout(job.duration_seconds);
    if let Err(e) = state
        .notifier
        .deliver_with_timeout(&webhook_url, &payload, timeout)
        .await
    {
        error!(video_id = %video_id, error = %e, "Thumbnails webhook lost");
        record_webhook_failure("thumbnails");
    }
    record_job_finished("thumbnails", success, started.elapsed().as_secs_f64());
}

async fn execute(state: &WorkerState, job: &ThumbnailsJob) -> WorkerResult<Vec<Thumbnail>> {
    let (workspace, source) =
        super::prepare_source(state, "thumbnails", &job.video_id, &job.video_url).await?;

    let count = thumbnail_count_for_duration(job.duration_seconds);
    let timestamps = frame_timestamps(job.duration_seconds, count);
    let frames = extract_frames(&source, workspace.path(), &timestamps).await?;

    let mut thumbnails = Vec::with_capacity(frames.len());
    for (timestamp, path) in frames {
        let url = publish_thumbnail(
            &path,
            &state.config.uploads_dir,
            &job.video_id,
            &frame_file_name(timestamp),
        )
        .await?;
        thumbnails.push(Thumbnail { timestamp, url });
    }

    Ok(thumbnails)
}
