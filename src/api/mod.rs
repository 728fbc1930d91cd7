//! Upstream data sources.

pub mod etherscan;

use alloy_primitives::U256;
use async_trait::async_trait;

use crate::errors::NetworkError;
use crate::models::RawTransaction;

pub use etherscan::EtherscanApi;

/// The account-level queries the transaction cache needs from a block explorer.
///
/// Paging, ordering and credentials are the implementation's own business.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Every transaction the source reports for `address`, in its order.
    async fn fetch_all(&self, address: &str) -> Result<Vec<RawTransaction>, NetworkError>;

    /// Current native balance of `address`, in wei.
    async fn fetch_balance(&self, address: &str) -> Result<U256, NetworkError>;
}
