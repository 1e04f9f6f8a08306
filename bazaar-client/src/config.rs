//! Client configuration

use std::time::Duration;

use shared::DegradeMode;

use crate::{ClientError, ClientResult};

/// Client configuration for connecting to the attribute service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Upper bound on each store read when resolving locally
    pub read_timeout: Option<Duration>,

    /// Whether degraded resolutions are reported
    pub degrade_mode: DegradeMode,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
            read_timeout: None,
            degrade_mode: DegradeMode::Silent,
        }
    }

    /// Read `ATTRIBUTE_SERVICE_URL` and `ATTRIBUTE_SERVICE_TIMEOUT` (seconds)
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("ATTRIBUTE_SERVICE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::Config("ATTRIBUTE_SERVICE_URL must be set".into()))?;

        let mut config = Self::new(base_url);
        if let Ok(raw) = std::env::var("ATTRIBUTE_SERVICE_TIMEOUT") {
            let secs: u64 = raw.parse().map_err(|_| {
                ClientError::Config(format!("ATTRIBUTE_SERVICE_TIMEOUT must be seconds, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = Some(read_timeout);
        self
    }

    pub fn with_degrade_mode(mut self, degrade_mode: DegradeMode) -> Self {
        self.degrade_mode = degrade_mode;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
