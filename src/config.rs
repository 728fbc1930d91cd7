//! Runtime settings, read from the environment (and an optional `.env`).

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::errors::ConfigError;

/// Sepolia donation contract the proxy reports on.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5B07360756Ebbc350e2E4c642a09E00942240212";

pub const DEFAULT_API_URL: &str = "https://api-sepolia.etherscan.io/api";

/// How long a fetched transaction list is served without asking upstream.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Etherscan-compatible API endpoint
    pub api_url: String,
    pub api_key: String,
    /// Address whose transactions and balance are served
    pub contract_address: String,
    pub cache_ttl: Duration,
    /// `offset` sent with txlist queries
    pub page_size: u32,
    /// Per-request timeout for upstream calls
    pub request_timeout: Duration,
    /// Allowed CORS origins (empty = allow any)
    pub allowed_origins: Vec<HeaderValue>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: "YourApiKeyToken".to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            page_size: 50,
            request_timeout: Duration::from_secs(10),
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Build from process environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind_addr: parse_or(&var, "BIND_ADDR", defaults.bind_addr)?,
            api_url: var("ETHERSCAN_API_URL").unwrap_or(defaults.api_url),
            api_key: var("ETHERSCAN_API_KEY").unwrap_or(defaults.api_key),
            contract_address: var("CONTRACT_ADDRESS").unwrap_or(defaults.contract_address),
            cache_ttl: Duration::from_secs(parse_or(
                &var,
                "CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )?),
            page_size: parse_or(&var, "TXLIST_PAGE_SIZE", defaults.page_size)?,
            request_timeout: Duration::from_secs(parse_or(
                &var,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Comma-separated origins; blank entries are skipped, bad ones rejected.
fn parse_origins(value: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "ALLOWED_ORIGINS",
                value: origin.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = var(name) else {
        return Ok(default);
    };
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Invalid {
            var: name,
            reason: e.to_string(),
            value,
        }),
    }
}
