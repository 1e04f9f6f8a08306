//! Attribute service configuration

use std::time::Duration;

use shared::DegradeMode;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Attribute service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL. `None` selects the in-memory store (development only).
    pub database_url: Option<String>,
    /// Upper bound on each store read during resolution
    pub read_timeout: Duration,
    /// Whether degraded resolutions are reported to callers
    pub degrade_mode: DegradeMode,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty());
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let degrade_mode = match std::env::var("DEGRADE_MODE") {
            Ok(raw) => DegradeMode::parse(&raw)
                .ok_or_else(|| format!("DEGRADE_MODE must be silent or flagged, got {raw:?}"))?,
            Err(_) => DegradeMode::default(),
        };

        Ok(Self {
            environment,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url,
            read_timeout: Duration::from_millis(
                std::env::var("READ_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2000),
            ),
            degrade_mode,
            log_json: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8080,
            database_url: None,
            read_timeout: Duration::from_millis(2000),
            degrade_mode: DegradeMode::Silent,
            log_json: false,
        }
    }
}
