//! Render job: subtitle burn-in plus format, trim, and logo handling.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info, warn};

use vsub_media::{probe_video, publish_render, render_video, write_srt, RenderOptions};
use vsub_models::{LogoOverlay, RenderJob, RenderWebhook};

use crate::error::WorkerResult;
use crate::metrics::{record_job_finished, record_webhook_failure};
use crate::state::WorkerState;

pub async fn run(state: WorkerState, job: RenderJob) {
    let started = Instant::now();
    let video_id = job.video_id.clone();
    let webhook_url = job.webhook_url.clone();

    let outcome = execute(&state, &job).await;
    let success = outcome.is_ok();
    let payload = match outcome {
        Ok(published) => {
            info!(
                video_id = %video_id,
                output = %published.display(),
                elapsed_secs = started.elapsed().as_secs(),
                "Render job finished"
            );
            RenderWebhook::completed(
                video_id.clone(),
                state.config.download_url(&video_id),
                published.display().to_string(),
            )
        }
        Err(e) => {
            error!(video_id = %video_id, error = %e, "Render job failed");
            RenderWebhook::failed(video_id.clone(), e.to_string())
        }
    };

    if let Err(e) = state.notifier.deliver(&webhook_url, &payload).await {
        error!(video_id = %video_id, error = %e, "Render webhook lost");
        record_webhook_failure("render");
    }
    record_job_finished("render", success, started.elapsed().as_secs_f64());
}

async fn execute(state: &WorkerState, job: &RenderJob) -> WorkerResult<PathBuf> {
    let (workspace, source) =
        super::prepare_source(state, "render", &job.video_id, &job.video_url).await?;

    // Subtitle margins size against the output width: the preset's canvas
    // when one is chosen, the probed source width otherwise.
    let video_width = match job.format {
        Some(format) => format.output_dimensions().0,
        None => probe_video(&source).await?.width,
    };

    let subtitles = if job.subtitles.is_empty() {
        None
    } else {
        let srt_path = workspace.file("subtitles.srt");
        write_srt(&job.subtitles, &srt_path).await?;
        Some((srt_path, job.style.clone()))
    };

    // A broken logo URL degrades to a logo-free render rather than failing
    // the whole job.
    let logo = match &job.logo {
        Some(overlay) => fetch_logo(state, &workspace.file("logo_overlay"), overlay)
            .await
            .map(|path| (path, overlay.clone())),
        None => None,
    };

    let options = RenderOptions {
        format: job.format,
        trim: job.trim,
        subtitles,
        logo,
    };

    let output = workspace.file("render_output.mp4");
    render_video(&source, &output, &options, video_width).await?;

    let published = publish_render(&output, &state.config.uploads_dir, &job.video_id).await?;
    Ok(published)
}

/// Download the overlay image, returning `None` (and logging) on any failure.
async fn fetch_logo(
    state: &WorkerState,
    dest: &std::path::Path,
    overlay: &LogoOverlay,
) -> Option<PathBuf> {
    let result: WorkerResult<()> = async {
        let response = state
            .downloads
            .get(&overlay.logo_url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
    .await;

    match result {
        Ok(()) => Some(dest.to_path_buf()),
        Err(e) => {
            warn!(url = %overlay.logo_url, error = %e, "Logo download failed, rendering without it");
            None
        }
    }
}
