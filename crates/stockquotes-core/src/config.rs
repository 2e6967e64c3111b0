//! Client configuration sourced from the environment.

use std::time::Duration;

use crate::throttling::QuotaPolicy;
use crate::ConfigError;

pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";
pub const BASE_URL_ENV: &str = "ALPHA_VANTAGE_BASE_URL";
pub const TIMEOUT_ENV: &str = "ALPHA_VANTAGE_TIMEOUT_MS";
/// Optional client-side request budget, `LIMIT` per minute or `LIMIT/SECONDS`.
/// `off` or `0` leaves requests unthrottled.
pub const QUOTA_ENV: &str = "ALPHA_VANTAGE_QUOTA";

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings shared by every adapter a [`QuoteClient`](crate::QuoteClient) builds.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Credential used when a call does not supply one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Client-side request budget; `None` sends every request.
    pub quota: Option<QuotaPolicy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            quota: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self {
            api_key: read(API_KEY_ENV),
            ..Self::default()
        };

        if let Some(base_url) = read(BASE_URL_ENV) {
            config.base_url = base_url.trim().to_owned();
        }

        if let Some(raw) = read(TIMEOUT_ENV) {
            config.timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    name: TIMEOUT_ENV,
                    value: raw.clone(),
                    reason: String::from("expected a positive integer number of milliseconds"),
                })?;
        }

        if let Some(raw) = read(QUOTA_ENV) {
            config.quota = parse_quota(raw.trim()).ok_or_else(|| ConfigError::InvalidEnv {
                name: QUOTA_ENV,
                value: raw.clone(),
                reason: String::from(
                    "expected LIMIT, LIMIT/SECONDS with positive integers, or off",
                ),
            })?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_quota(mut self, quota: QuotaPolicy) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn without_quota(mut self) -> Self {
        self.quota = None;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// `Some(None)` means unthrottled; `None` means the value is malformed.
fn parse_quota(raw: &str) -> Option<Option<QuotaPolicy>> {
    if raw.eq_ignore_ascii_case("off") || raw.eq_ignore_ascii_case("none") || raw == "0" {
        return Some(None);
    }

    let (limit, seconds) = match raw.split_once('/') {
        Some((limit, seconds)) => (limit.trim(), seconds.trim()),
        None => (raw, "60"),
    };
    let limit = limit.parse::<u32>().ok().filter(|value| *value > 0)?;
    let seconds = seconds.parse::<u64>().ok().filter(|value| *value > 0)?;

    Some(Some(QuotaPolicy {
        window: Duration::from_secs(seconds),
        limit,
    }))
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("quota", &self.quota)
            .finish()
    }
}
