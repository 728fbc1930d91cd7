pub mod cache;
pub mod transaction;

pub use cache::CachedCollection;
pub use transaction::{RawTransaction, RecordError, TransactionRecord, TxStatus};
