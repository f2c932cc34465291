//! Dual-track filmstrip loading.
//!
//! The editor timeline needs a scrub strip immediately, but the good one
//! comes from a worker job that takes a while. So the loader runs two
//! tracks: a cache check first, then—on a miss—local frame extraction for
//! an instant canvas strip, concurrently with a remote generation request
//! it polls until the sprite sheet lands and replaces the local frames.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use vsub_models::{frame_count_for_duration, frame_timestamps, Filmstrip, VideoId};

use crate::api::{FilmstripRequested, OrchestratorClient};
use crate::error::ClientResult;
use crate::poll::{AdaptiveInterval, PollConfig};

/// One locally extracted preview frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFrame {
    pub timestamp: f64,
    pub path: PathBuf,
}

/// Source of locally extracted frames. The production implementation runs
/// FFmpeg; tests substitute a mock.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn extract(
        &self,
        source: &std::path::Path,
        timestamps: &[f64],
        output_dir: &std::path::Path,
    ) -> ClientResult<Vec<LocalFrame>>;
}

/// Where a filmstrip load currently stands.
#[derive(Debug, Clone)]
pub enum FilmstripState {
    /// Neither track has produced anything yet
    Pending,
    /// Local frames are available; the sprite sheet is still pending
    CanvasReady(Vec<LocalFrame>),
    /// The sprite sheet is available
    FilmstripReady(Filmstrip),
    /// Both tracks failed
    Failed(String),
}

impl FilmstripState {
    pub fn is_ready(&self) -> bool {
        matches!(self, FilmstripState::FilmstripReady(_))
    }
}

/// Everything one load needs.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub video_id: VideoId,
    /// Local path of the source video, for the canvas track
    pub source_path: PathBuf,
    pub duration_seconds: f64,
    /// Directory local frames are written into
    pub output_dir: PathBuf,
}

/// Runs dual-track filmstrip loads.
#[derive(Clone)]
pub struct FilmstripLoader {
    client: Arc<OrchestratorClient>,
    frames: Arc<dyn FrameSource>,
    config: PollConfig,
}

impl FilmstripLoader {
    pub fn new(
        client: Arc<OrchestratorClient>,
        frames: Arc<dyn FrameSource>,
        config: PollConfig,
    ) -> Self {
        Self {
            client,
            frames,
            config,
        }
    }

    /// Start a load. Dropping the returned handle cancels both tracks.
    pub fn load(&self, request: LoadRequest) -> FilmstripHandle {
        let (tx, rx) = watch::channel(FilmstripState::Pending);
        let client = self.client.clone();
        let frames = self.frames.clone();
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            run_load(client, frames, config, request, tx).await;
        });

        FilmstripHandle { task, state: rx }
    }
}

async fn run_load(
    client: Arc<OrchestratorClient>,
    frames: Arc<dyn FrameSource>,
    config: PollConfig,
    request: LoadRequest,
    tx: watch::Sender<FilmstripState>,
) {
    let id = &request.video_id;

    // Track 0: cache check. A hit skips both tracks entirely.
    match client.get_filmstrip(id).await {
        Ok(Some(filmstrip)) => {
            info!(video_id = %id, "Filmstrip cache hit");
            let _ = tx.send(FilmstripState::FilmstripReady(filmstrip));
            return;
        }
        Ok(None) => {}
        Err(e) => warn!(video_id = %id, error = %e, "Filmstrip cache check failed"),
    }

    let count = frame_count_for_duration(request.duration_seconds);
    let timestamps = frame_timestamps(request.duration_seconds, count);

    // Track 1: immediate local extraction for the canvas strip.
    let local_track = async {
        match frames
            .extract(&request.source_path, &timestamps, &request.output_dir)
            .await
        {
            Ok(local) => {
                info!(video_id = %id, frames = local.len(), "Canvas frames ready");
                // The sprite sheet may have won the race already; never
                // downgrade it.
                tx.send_if_modified(|state| {
                    if matches!(state, FilmstripState::Pending) {
                        *state = FilmstripState::CanvasReady(local);
                        true
                    } else {
                        false
                    }
                });
                true
            }
            Err(e) => {
                warn!(video_id = %id, error = %e, "Local frame extraction failed");
                false
            }
        }
    };

    // Track 2: remote generation, then poll until the record lands.
    let remote_track = async {
        match client.request_filmstrip(id).await {
            Ok(FilmstripRequested::Existing(filmstrip)) => Some(filmstrip),
            Ok(FilmstripRequested::Generating(_)) => {
                poll_filmstrip(&client, id, &config).await
            }
            Err(e) => {
                warn!(video_id = %id, error = %e, "Filmstrip dispatch failed");
                None
            }
        }
    };

    let (local_ok, remote) = tokio::join!(local_track, remote_track);

    match remote {
        Some(filmstrip) => {
            info!(video_id = %id, "Swapping to sprite sheet");
            let _ = tx.send(FilmstripState::FilmstripReady(filmstrip));
        }
        None if local_ok => {
            // Canvas frames stay up; the strip simply never upgrades.
        }
        None => {
            let _ = tx.send(FilmstripState::Failed(
                "both filmstrip tracks failed".to_string(),
            ));
        }
    }
}

/// Poll the filmstrip record on the adaptive schedule; 404 means not ready.
async fn poll_filmstrip(
    client: &OrchestratorClient,
    id: &VideoId,
    config: &PollConfig,
) -> Option<Filmstrip> {
    let started = Instant::now();
    let mut interval = AdaptiveInterval::new(config);
    let mut attempts = 0u32;

    loop {
        tokio::time::sleep(interval.next_delay()).await;

        if started.elapsed() >= config.timeout {
            warn!(video_id = %id, "Filmstrip poll timed out");
            return None;
        }
        if attempts >= config.max_attempts {
            warn!(video_id = %id, attempts, "Filmstrip poll attempt cap hit");
            return None;
        }
        attempts += 1;

        match client.get_filmstrip(id).await {
            Ok(Some(filmstrip)) => return Some(filmstrip),
            Ok(None) => {}
            Err(e) => debug!(video_id = %id, error = %e, "Filmstrip poll attempt failed"),
        }
    }
}

/// Owner of one running load; abort-on-drop like a poll handle.
#[derive(Debug)]
pub struct FilmstripHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<FilmstripState>,
}

impl FilmstripHandle {
    pub fn state(&self) -> FilmstripState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilmstripState> {
        self.state.clone()
    }

    /// Wait for both tracks to settle and return the final state.
    pub async fn finished(mut self) -> FilmstripState {
        while self.state.changed().await.is_ok() {}
        let state = self.state.borrow().clone();
        state
    }
}

impl Drop for FilmstripHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
