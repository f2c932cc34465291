//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx API response; `detail` is the server's error body.
    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Media error: {0}")]
    Media(#[from] vsub_media::MediaError),

    /// The background poll task stopped without reporting an outcome.
    #[error("Poller stopped unexpectedly")]
    PollerStopped,
}
