//! Application configuration

/// Configuration for the terminal client
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend API base URL, including the `/api` prefix
    pub api_url: String,
    /// Directory holding the persisted session
    pub data_dir: String,
    /// Directory the log file is written to
    pub log_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("LABRESERVE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".into()),
            data_dir: std::env::var("LABRESERVE_DATA_DIR")
                .unwrap_or_else(|_| ".labreserve".into()),
            log_dir: std::env::var("LABRESERVE_LOG_DIR")
                .unwrap_or_else(|_| ".labreserve/logs".into()),
        }
    }
}
