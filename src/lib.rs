pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::{EtherscanApi, TransactionSource};
pub use config::Config;
pub use errors::{AmountError, CacheError, ConfigError, NetworkError, ServerError};
pub use models::{RawTransaction, TransactionRecord, TxStatus};
pub use services::{Provenance, Served, TransactionService};
pub use utils::amount::to_decimal_string;
