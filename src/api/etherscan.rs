use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::TransactionSource;
use crate::config::Config;
use crate::errors::NetworkError;
use crate::models::RawTransaction;
use crate::utils::amount::parse_amount;

/// Message Etherscan pairs with `status: "0"` for an address with no history.
const NO_TRANSACTIONS: &str = "No transactions found";

/// Etherscan-compatible account API client.
pub struct EtherscanApi {
    client: Client,
    api_url: String,
    api_key: String,
    page_size: u32,
}

/// The `{status, message, result}` wrapper around every Etherscan response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

impl EtherscanApi {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetworkError::Client)?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            page_size,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NetworkError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.page_size,
            config.request_timeout,
        )
    }

    async fn query(&self, action: &str, params: &[(&str, String)]) -> Result<Envelope, NetworkError> {
        debug!("Sending {} request to {}", action, self.api_url);
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("module", "account"), ("action", action), ("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|source| NetworkError::Transport {
                endpoint: self.api_url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            debug!("Rate limit hit on {}", action);
        }
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Envelope>()
            .await
            .map_err(|e| NetworkError::decode(e.to_string()))
    }
}

#[async_trait]
impl TransactionSource for EtherscanApi {
    async fn fetch_all(&self, address: &str) -> Result<Vec<RawTransaction>, NetworkError> {
        let params = [
            ("address", address.to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("page", "1".to_string()),
            ("offset", self.page_size.to_string()),
            ("sort", "desc".to_string()),
        ];
        let envelope = self.query("txlist", &params).await?;
        let transactions = parse_txlist(envelope)?;
        debug!("Parsed {} transactions for {}", transactions.len(), address);
        Ok(transactions)
    }

    async fn fetch_balance(&self, address: &str) -> Result<U256, NetworkError> {
        let params = [("address", address.to_string()), ("tag", "latest".to_string())];
        let envelope = self.query("balance", &params).await?;
        parse_balance(envelope)
    }
}

/// Interpret a `txlist` envelope.
///
/// A `"0"` status only means "empty" when Etherscan says so; rate limiting and
/// key problems also come back as `"0"` and are reported as rejections.
pub(crate) fn parse_txlist(envelope: Envelope) -> Result<Vec<RawTransaction>, NetworkError> {
    if envelope.status != "1" {
        let empty_result = envelope.result.as_array().is_some_and(|r| r.is_empty());
        if envelope.message.starts_with(NO_TRANSACTIONS) || empty_result {
            return Ok(Vec::new());
        }
        return Err(rejection(&envelope));
    }

    let Value::Array(items) = envelope.result else {
        warn!("txlist result is not an array, treating as empty");
        return Ok(Vec::new());
    };

    let transactions = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawTransaction>(item) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!("Skipping malformed txlist item: {}", e);
                None
            }
        })
        .collect();
    Ok(transactions)
}

pub(crate) fn parse_balance(envelope: Envelope) -> Result<U256, NetworkError> {
    if envelope.status != "1" {
        return Err(rejection(&envelope));
    }
    let raw = envelope
        .result
        .as_str()
        .ok_or_else(|| NetworkError::decode("balance result is not a string"))?;
    parse_amount(raw).map_err(|e| NetworkError::decode(e.to_string()))
}

fn rejection(envelope: &Envelope) -> NetworkError {
    match envelope.result.as_str() {
        Some(detail) if !detail.is_empty() => {
            NetworkError::rejected(format!("{}: {}", envelope.message, detail))
        }
        _ => NetworkError::rejected(envelope.message.clone()),
    }
}
