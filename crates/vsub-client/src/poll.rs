//! Adaptive status polling.
//!
//! The schedule starts wide-eyed and backs off: 2000 ms to the first check,
//! then ×1.2 per not-yet-terminal response, capped at 5000 ms. Three bounds
//! stop a poll: a terminal status, a 5-minute wall clock, and an attempt
//! cap as the safety net. Every poll is owned by a [`PollHandle`]; dropping
//! the handle aborts the task, so replacing a handle replaces the poll.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use vsub_models::{VideoId, VideoProject, VideoStatus};

use crate::api::OrchestratorClient;
use crate::error::{ClientError, ClientResult};

/// Polling schedule parameters.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first check
    pub initial: Duration,
    /// Backoff multiplier applied after each non-terminal response
    pub factor: f64,
    /// Ceiling on the interval
    pub max: Duration,
    /// Wall-clock ceiling on the whole poll
    pub timeout: Duration,
    /// Hard cap on the number of checks
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(2000),
            factor: 1.2,
            max: Duration::from_millis(5000),
            timeout: Duration::from_secs(300),
            max_attempts: 90,
        }
    }
}

/// The backoff sequence as a pure iterator: 2000, 2400, 2880, 3456,
/// 4147.2, ... ms, capped at the configured maximum forever after.
#[derive(Debug, Clone)]
pub struct AdaptiveInterval {
    current: Duration,
    factor: f64,
    max: Duration,
}

impl AdaptiveInterval {
    pub fn new(config: &PollConfig) -> Self {
        Self {
            current: config.initial,
            factor: config.factor,
            max: config.max,
        }
    }

    /// The next delay; never exhausted.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.mul_f64(self.factor).min(self.max);
        delay
    }
}

impl Iterator for AdaptiveInterval {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}

/// How a poll ended.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// A terminal status was observed; the final record is attached.
    Terminal(Box<VideoProject>),
    /// The wall-clock ceiling elapsed first.
    TimedOut,
    /// The attempt cap was hit first.
    AttemptsExhausted,
}

/// What a poll has seen so far.
#[derive(Debug, Clone)]
pub enum PollState {
    /// No response yet
    Pending,
    /// Last observed non-terminal status
    InProgress(VideoStatus),
    /// The poll has ended
    Done(PollOutcome),
}

/// Spawns status polls against the orchestrator.
#[derive(Clone)]
pub struct StatusPoller {
    client: Arc<OrchestratorClient>,
    config: PollConfig,
}

impl StatusPoller {
    pub fn new(client: Arc<OrchestratorClient>, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Start polling `video_id` until a terminal status or a bound is hit.
    pub fn watch_status(&self, video_id: VideoId) -> PollHandle {
        let (tx, rx) = watch::channel(PollState::Pending);
        let client = self.client.clone();
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            let outcome = poll_loop(&client, &video_id, &config, &tx).await;
            let _ = tx.send(PollState::Done(outcome));
        });

        PollHandle { task, state: rx }
    }
}

async fn poll_loop(
    client: &OrchestratorClient,
    video_id: &VideoId,
    config: &PollConfig,
    tx: &watch::Sender<PollState>,
) -> PollOutcome {
    let started = Instant::now();
    let mut interval = AdaptiveInterval::new(config);
    let mut attempts = 0u32;

    loop {
        tokio::time::sleep(interval.next_delay()).await;

        if started.elapsed() >= config.timeout {
            warn!(video_id = %video_id, "Status poll timed out");
            return PollOutcome::TimedOut;
        }
        if attempts >= config.max_attempts {
            warn!(video_id = %video_id, attempts, "Status poll attempt cap hit");
            return PollOutcome::AttemptsExhausted;
        }
        attempts += 1;

        match client.get_video(video_id).await {
            Ok(project) if project.status.is_terminal() => {
                info!(video_id = %video_id, status = %project.status, "Status poll finished");
                return PollOutcome::Terminal(Box::new(project));
            }
            Ok(project) => {
                let _ = tx.send(PollState::InProgress(project.status));
            }
            Err(e) => {
                // Transient failures never alter the schedule.
                debug!(video_id = %video_id, error = %e, "Status poll attempt failed");
            }
        }
    }
}

/// Owner of one running poll. Dropping the handle aborts the task and
/// releases its timer.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<PollState>,
}

impl PollHandle {
    /// Current poll state.
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Receiver for state changes, for callers that want every update.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Wait for the poll to end.
    pub async fn outcome(mut self) -> ClientResult<PollOutcome> {
        loop {
            let current = self.state.borrow_and_update().clone();
            if let PollState::Done(outcome) = current {
                return Ok(outcome);
            }
            if self.state.changed().await.is_err() {
                return Err(ClientError::PollerStopped);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_prefix_sequence() {
        let mut interval = AdaptiveInterval::new(&PollConfig::default());
        let expected_ms = [2000.0, 2400.0, 2880.0, 3456.0, 4147.2];
        for expected in expected_ms {
            let delay = interval.next_delay().as_secs_f64() * 1000.0;
            assert!((delay - expected).abs() < 1e-6, "got {delay}, want {expected}");
        }
    }

    #[test]
    fn test_interval_monotone_and_capped() {
        let config = PollConfig::default();
        let mut interval = AdaptiveInterval::new(&config);
        let mut last = Duration::ZERO;
        for _ in 0..200 {
            let delay = interval.next_delay();
            assert!(delay >= last);
            assert!(delay <= config.max);
            last = delay;
        }
        assert_eq!(last, config.max);
    }

    #[test]
    fn test_default_config_bounds() {
        let config = PollConfig::default();
        assert_eq!(config.initial, Duration::from_millis(2000));
        assert_eq!(config.max, Duration::from_millis(5000));
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.max_attempts, 90);
    }
}
