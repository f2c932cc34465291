//! Client library for the media pipeline.
//!
//! This crate provides:
//! - A typed HTTP client for the orchestrator API
//! - Adaptive status polling behind an abort-on-drop handle
//! - The dual-track filmstrip loader: instant local canvas frames plus the
//!   remotely generated sprite sheet that replaces them

pub mod api;
pub mod error;
pub mod filmstrip;
pub mod local;
pub mod poll;

pub use api::{FilmstripRequested, OrchestratorClient, RenderSettings};
pub use error::{ClientError, ClientResult};
pub use filmstrip::{
    FilmstripHandle, FilmstripLoader, FilmstripState, FrameSource, LoadRequest, LocalFrame,
};
pub use local::MediaFrameSource;
pub use poll::{AdaptiveInterval, PollConfig, PollHandle, PollOutcome, PollState, StatusPoller};
