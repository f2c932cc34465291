//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Externally reachable base URL of this worker; rendered-output
    /// download URLs are built from it
    pub public_base_url: String,
    /// Shared secret job requests must present as a bearer credential
    pub worker_secret: String,
    /// Speech-to-text API key
    pub transcription_api_key: String,
    /// Speech-to-text API base URL (Whisper-compatible)
    pub transcription_api_url: String,
    /// Default transcription language when a job does not specify one
    pub transcription_language: String,
    /// Root directory that site-relative source URLs resolve against
    pub public_root: Option<PathBuf>,
    /// Directory published job outputs are placed under
    pub uploads_dir: PathBuf,
    /// Ceiling on a single source download
    pub download_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            public_base_url: "http://localhost:8000".to_string(),
            worker_secret: "dev-worker-secret".to_string(),
            transcription_api_key: String::new(),
            transcription_api_url: "https://api.openai.com/v1".to_string(),
            transcription_language: "pt".to_string(),
            public_root: None,
            uploads_dir: PathBuf::from("/tmp/vsub-uploads"),
            download_timeout: Duration::from_secs(600), // 10 minutes
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("WORKER_HOST").unwrap_or(defaults.host),
            port: std::env::var("WORKER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            public_base_url: std::env::var("WORKER_PUBLIC_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            worker_secret: std::env::var("WORKER_SECRET").unwrap_or(defaults.worker_secret),
            transcription_api_key: std::env::var("TRANSCRIPTION_API_KEY")
                .unwrap_or(defaults.transcription_api_key),
            transcription_api_url: std::env::var("TRANSCRIPTION_API_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.transcription_api_url),
            transcription_language: std::env::var("TRANSCRIPTION_LANGUAGE")
                .unwrap_or(defaults.transcription_language),
            public_root: std::env::var("PUBLIC_ROOT").ok().map(PathBuf::from),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            download_timeout: Duration::from_secs(
                std::env::var("DOWNLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
        }
    }

    /// URL a rendered output for `video_id` is served from.
    pub fn download_url(&self, video_id: &vsub_models::VideoId) -> String {
        format!("{}/download/{video_id}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsub_models::VideoId;

    #[test]
    fn test_download_url() {
        let config = WorkerConfig::default();
        let id = VideoId::from("v1");
        assert_eq!(config.download_url(&id), "http://localhost:8000/download/v1");
    }

    #[test]
    fn test_default_language_is_portuguese() {
        assert_eq!(WorkerConfig::default().transcription_language, "pt");
    }
}
