//! Transcription job: source download, audio extraction, speech-to-text.

use std::time::Instant;

use tracing::{error, info};

use vsub_media::extract_audio;
use vsub_models::{SubtitleCue, TranscribeJob, TranscriptionWebhook};

use crate::error::WorkerResult;
use crate::metrics::{record_job_finished, record_webhook_failure};
use crate::state::WorkerState;

pub async fn run(state: WorkerState, job: TranscribeJob) {
    let started = Instant::now();
    let video_id = job.video_id.clone();
    let webhook_url = job.webhook_url.clone();

    let outcome = execute(&state, &job).await;
    let success = outcome.is_ok();
    let payload = match outcome {
        Ok(cues) => {
            info!(video_id = %video_id, cues = cues.len(), "Transcription job finished");
            TranscriptionWebhook::completed(video_id.clone(), cues)
        }
        Err(e) => {
            error!(video_id = %video_id, error = %e, "Transcription job failed");
            TranscriptionWebhook::failed(video_id.clone(), e.to_string())
        }
    };

    if let Err(e) = state.notifier.deliver(&webhook_url, &payload).await {
        error!(video_id = %video_id, error = %e, "Transcription webhook lost");
        record_webhook_failure("transcription");
    }
    record_job_finished("transcription", success, started.elapsed().as_secs_f64());
}

async fn execute(state: &WorkerState, job: &TranscribeJob) -> WorkerResult<Vec<SubtitleCue>> {
    let (_workspace, source) =
        super::prepare_source(state, "transcribe", &job.video_id, &job.video_url).await?;

    let audio = extract_audio(&source).await?;
    state
        .transcriber
        .transcribe(&audio, job.language.as_deref())
        .await
}
