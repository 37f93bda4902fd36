use std::env;
use std::time::Duration;

/// Environment variable holding the collection service base endpoint
pub const API_URL_ENV: &str = "HRMS_API_URL";

/// Local development address of the collection service
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Process-wide client configuration, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound for a single call; exceeding it counts as an unreachable service
    pub request_timeout: Duration,
    /// Settle time between a committed refetch and the scroll-into-view signal
    pub scroll_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            scroll_delay: Duration::from_millis(300),
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
