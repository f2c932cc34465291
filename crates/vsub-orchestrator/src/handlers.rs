//! Request handlers.

pub mod health;
pub mod jobs;
pub mod videos;
pub mod webhooks;

pub use health::health;
