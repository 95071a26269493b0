//! Client configuration (defaults + environment overrides).

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_INACTIVITY_SECS: u64 = 110;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RENEWAL_HEADER: &str = "x-new-token";

pub const ENV_API_URL: &str = "STOCKMASTER_API_URL";
pub const ENV_INACTIVITY_SECS: &str = "STOCKMASTER_INACTIVITY_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "STOCKMASTER_REQUEST_TIMEOUT_SECS";
pub const ENV_SESSION_FILE: &str = "STOCKMASTER_SESSION_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    /// Idle time after which the session is forcibly closed.
    pub inactivity_timeout: Duration,
    /// Per-request timeout (the client never retries).
    pub request_timeout: Duration,
    /// Response header carrying a renewed token.
    pub renewal_header: String,
    /// Where the file-backed session store lives (`None` = OS default).
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            inactivity_timeout: Duration::from_secs(DEFAULT_INACTIVITY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            renewal_header: DEFAULT_RENEWAL_HEADER.to_string(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; invalid values fall back
    /// to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(secs) = parse_secs(&lookup, ENV_INACTIVITY_SECS) {
            config.inactivity_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_secs(&lookup, ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup(ENV_SESSION_FILE).filter(|v| !v.trim().is_empty()) {
            config.session_file = Some(PathBuf::from(path));
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            tracing::warn!(key, value = %raw, "ignoring invalid duration; using default");
            None
        }
    }
}
