//! Orchestrator configuration.

/// Orchestrator server configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Externally reachable base URL of this server; webhook callback
    /// addresses are built from it, never discovered dynamically
    pub public_base_url: String,
    /// Base URL of the worker service
    pub worker_url: String,
    /// Shared secret the worker expects as a bearer credential
    pub worker_secret: String,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            public_base_url: "http://localhost:3000".to_string(),
            worker_url: "http://localhost:8000".to_string(),
            worker_secret: "dev-worker-secret".to_string(),
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            worker_url: std::env::var("WORKER_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.worker_url),
            worker_secret: std::env::var("WORKER_SECRET").unwrap_or(defaults.worker_secret),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
