//! Background job runners.
//!
//! Every runner follows the same shape: an `execute` that does the media
//! work inside a scratch workspace, and a `run` wrapper that turns its
//! outcome into the completion or failure webhook and delivers it. `run`
//! never returns an error; a job's only observable result is its webhook.

use std::path::PathBuf;

use vsub_media::{fetch_source, JobWorkspace};
use vsub_models::VideoId;

use crate::error::WorkerResult;
use crate::state::WorkerState;

pub mod filmstrip;
pub mod render;
pub mod thumbnails;
pub mod transcribe;

/// Pull the job's source video into a fresh workspace.
async fn prepare_source(
    state: &WorkerState,
    label: &str,
    video_id: &VideoId,
    video_url: &str,
) -> WorkerResult<(JobWorkspace, PathBuf)> {
    let workspace = JobWorkspace::create(label, video_id)?;
    let source = fetch_source(
        &state.downloads,
        video_url,
        workspace.path(),
        video_id,
        state.config.public_root.as_deref(),
    )
    .await?;
    Ok((workspace, source))
}
