//! Adapter configuration with validation.
//!
//! Built once at start-up from CLI/environment input and shared read-only
//! with every request handler.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default bind address of the adapter (where the Rosetta server expects an observer).
pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

/// Default maximum size of an inbound request body.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Immutable adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Base URL of the network proxy, without trailing slash
    pub proxy_url: String,
    /// Shard this adapter instance represents
    pub shard: u32,
    /// Bind address
    pub listen: SocketAddr,
    /// Upstream request timeout. `None` keeps the client default (no timeout).
    pub request_timeout: Option<Duration>,
    /// Delay applied before every relayed GET, to stay under proxy rate limits
    pub get_delay: Duration,
    /// Max inbound body size in bytes
    pub max_body_size: usize,
}

impl AdapterConfig {
    /// Create a configuration with defaults for everything but the proxy and shard.
    pub fn new(proxy_url: impl Into<String>, shard: u32) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            shard,
            listen: DEFAULT_LISTEN,
            request_timeout: None,
            get_delay: Duration::ZERO,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = delay;
        self
    }

    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Validate and normalize the configuration.
    ///
    /// Trailing slashes are stripped from the proxy URL so that upstream
    /// paths can be appended segment by segment.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.proxy_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingProxyUrl);
        }

        let url = reqwest::Url::parse(&trimmed)
            .map_err(|e| ConfigError::InvalidProxyUrl(format!("{trimmed}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidProxyUrl(format!(
                "{trimmed}: unsupported scheme {}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidProxyUrl(format!(
                "{trimmed}: cannot be used as a base URL"
            )));
        }

        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout(
                    "request timeout cannot be 0".into(),
                ));
            }
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::InvalidLimit("max_body_size cannot be 0".into()));
        }

        self.proxy_url = trimmed;
        Ok(self)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("proxy URL is required")]
    MissingProxyUrl,
    #[error("invalid proxy URL: {0}")]
    InvalidProxyUrl(String),
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

/// Parse a human-friendly duration: `"30s"`, `"500ms"`, `"2m"` or plain seconds.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration(s.to_string());

    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| invalid())
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| invalid())
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or_else(invalid)
    } else {
        s.parse::<u64>().map(Duration::from_secs).map_err(|_| invalid())
    }
}
