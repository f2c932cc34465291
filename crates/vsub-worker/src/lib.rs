//! HTTP job runner for long-running media work.
//!
//! This crate provides:
//! - Bearer-authenticated accept-and-spawn job endpoints
//! - The four job runners: transcription, render, filmstrip, thumbnails
//! - Webhook delivery back to the orchestrator
//! - Rendered-artifact download serving
//!
//! The worker exists precisely because these jobs cannot live inside a
//! latency-constrained request handler: every accepted job runs on a
//! detached task with no timeout.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod transcription;
pub mod webhook;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use routes::create_router;
pub use state::WorkerState;
pub use transcription::TranscriptionClient;
pub use webhook::WebhookNotifier;
