//! Axum API server for the media pipeline.
//!
//! This crate provides:
//! - The video-project REST surface and status polling endpoint
//! - Status-gated job dispatch to the worker
//! - Webhook endpoints the worker reports back to
//! - Prometheus metrics

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use config::OrchestratorConfig;
pub use dispatch::{DispatchError, WorkerClient};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
pub use store::ProjectStore;
