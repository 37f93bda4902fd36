use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:hrms_lite.db";
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Origins always allowed during local development
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

/// Service configuration, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub database_url: String,
    pub server_addr: String,
    pub frontend_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Read `DATABASE_URL`, `SERVER_ADDR` and `FRONTEND_URL`, loading `.env` first
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            database_url: var_or("DATABASE_URL", defaults.database_url),
            server_addr: var_or("SERVER_ADDR", defaults.server_addr),
            frontend_url: var_or("FRONTEND_URL", defaults.frontend_url),
        }
    }

    /// Browser origins the CORS layer accepts
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.trim_end_matches('/').to_string()];
        for origin in DEV_ORIGINS {
            if !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }
}

fn var_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default,
    }
}
