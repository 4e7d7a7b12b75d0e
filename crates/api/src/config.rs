use std::time::Duration;

use crate::auth::oidc::OidcConfig;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except the directory and OIDC settings has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the upstream directory REST backend.
    pub directory_base_url: String,
    /// Global timeout for each upstream call in seconds (default: `15`).
    pub directory_timeout_secs: u64,
    /// Page size used when walking a manager's subordinates (default: `100`).
    pub subordinate_page_size: u32,
    pub log_format: LogFormat,
    /// Access-token verification settings.
    pub oidc: OidcConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `DIRECTORY_BASE_URL`     | **required**               |
    /// | `DIRECTORY_TIMEOUT_SECS` | `15`                       |
    /// | `SUBORDINATE_PAGE_SIZE`  | `100`                      |
    /// | `LOG_FORMAT`             | `pretty` (`json` to switch) |
    ///
    /// OIDC variables are documented on [`OidcConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let directory_base_url = std::env::var("DIRECTORY_BASE_URL")
            .expect("DIRECTORY_BASE_URL must be set in the environment");

        let directory_timeout_secs: u64 = std::env::var("DIRECTORY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("DIRECTORY_TIMEOUT_SECS must be a valid u64");

        let subordinate_page_size: u32 = std::env::var("SUBORDINATE_PAGE_SIZE")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("SUBORDINATE_PAGE_SIZE must be a valid u32");
        assert!(subordinate_page_size > 0, "SUBORDINATE_PAGE_SIZE must be positive");

        let log_format = LogFormat::parse(&std::env::var("LOG_FORMAT").unwrap_or_default());

        let oidc = OidcConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            directory_base_url,
            directory_timeout_secs,
            subordinate_page_size,
            log_format,
            oidc,
        }
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_secs(self.directory_timeout_secs)
    }

    /// Deadline for one HTTP request, never shorter than a single directory
    /// call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(self.directory_timeout_secs))
    }
}
