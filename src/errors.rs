//! Error types for the donation proxy.
//!
//! - [`NetworkError`] covers everything that can go wrong talking to the
//!   upstream block explorer.
//! - [`CacheError`] is what the transaction cache hands back to callers once
//!   stale-fallback has been applied.
//! - [`AmountError`] comes from wei to ether formatting.
//! - [`ConfigError`] is raised while reading settings from the environment.
//! - [`ServerError`] ends the HTTP server.

/// Failure talking to the upstream block explorer.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    /// The upstream answered but flagged the query as failed.
    #[error("upstream rejected the query: {message}")]
    Rejected { message: String },

    /// The response body could not be decoded.
    #[error("malformed upstream payload: {details}")]
    Decode { details: String },
}

impl NetworkError {
    pub fn rejected(message: impl Into<String>) -> Self {
        NetworkError::Rejected {
            message: message.into(),
        }
    }

    pub fn decode(details: impl Into<String>) -> Self {
        NetworkError::Decode {
            details: details.into(),
        }
    }
}

/// Errors surfaced by [`crate::TransactionService`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The upstream failed and there was no snapshot to fall back to.
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// No record in the current snapshot has the requested hash.
    #[error("transaction {hash} not found")]
    NotFound { hash: String },

    /// Upstream failure on a path without fallback (refresh, balance).
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl CacheError {
    pub fn upstream_unavailable(source: &NetworkError) -> Self {
        CacheError::UpstreamUnavailable {
            message: source.to_string(),
        }
    }
}

/// Errors from fixed-point amount formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("'{input}' is not a non-negative decimal integer")]
    Parse { input: String },

    #[error("10^{exponent} does not fit in 256 bits")]
    ExponentTooLarge { exponent: u32 },
}

/// Errors while loading [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors that stop [`crate::server::run_server`].
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to set up upstream client: {0}")]
    Client(#[from] NetworkError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}
