use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{EtherscanApi, TransactionSource};
use crate::config::Config;
use crate::errors::{CacheError, NetworkError};
use crate::models::{CachedCollection, TransactionRecord};
use crate::utils::amount::{format_units, DISPLAY_PRECISION, ETHER_DECIMALS};

/// Where a served transaction list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provenance {
    /// A snapshot younger than the TTL; upstream was not asked.
    #[serde(rename = "cache")]
    FreshCache,
    /// Fetched from upstream during this call.
    #[serde(rename = "upstream")]
    Upstream,
    /// Upstream failed; this is the last snapshot that succeeded.
    #[serde(rename = "cache (fallback)")]
    StaleFallback,
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::FreshCache => "cache",
            Provenance::Upstream => "upstream",
            Provenance::StaleFallback => "cache (fallback)",
        }
    }
}

/// A transaction list together with its provenance.
#[derive(Debug, Clone)]
pub struct Served {
    pub records: Arc<Vec<TransactionRecord>>,
    pub provenance: Provenance,
}

/// Read-through cache over one address's transaction history.
///
/// Fresh snapshots are served without touching upstream. Once the TTL has
/// passed the next call fetches again, and if that fetch fails the previous
/// snapshot is served instead. Every fetch-and-store runs under `fetch_lock`,
/// so concurrent misses wait for the call in flight rather than issuing their
/// own, and snapshot writes can't land out of order.
pub struct TransactionService {
    source: Arc<dyn TransactionSource>,
    address: String,
    ttl: Duration,
    cache: RwLock<CachedCollection<TransactionRecord>>,
    fetch_lock: Mutex<()>,
}

impl TransactionService {
    pub fn new(source: Arc<dyn TransactionSource>, address: impl Into<String>, ttl: Duration) -> Self {
        Self {
            source,
            address: address.into(),
            ttl,
            cache: RwLock::new(CachedCollection::new()),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Service backed by Etherscan, as configured.
    pub fn from_config(config: &Config) -> Result<Self, NetworkError> {
        let api = EtherscanApi::from_config(config)?;
        Ok(Self::new(
            Arc::new(api),
            config.contract_address.clone(),
            config.cache_ttl,
        ))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of records in the current snapshot, if there is one.
    pub async fn cached_len(&self) -> Option<usize> {
        self.cache.read().await.record_count()
    }

    /// Time since the current snapshot was fetched, if there is one.
    pub async fn cache_age(&self) -> Option<Duration> {
        self.cache.read().await.age(Instant::now())
    }

    /// The transaction list, from cache while fresh.
    pub async fn get(&self) -> Result<Served, CacheError> {
        if let Some(records) = self.fresh_snapshot().await {
            debug!("Cache hit for {}", self.address);
            return Ok(Served {
                records,
                provenance: Provenance::FreshCache,
            });
        }

        let _guard = self.fetch_lock.lock().await;
        // A fetch that finished while we waited may already have refilled it.
        if let Some(records) = self.fresh_snapshot().await {
            debug!("Cache filled by concurrent fetch for {}", self.address);
            return Ok(Served {
                records,
                provenance: Provenance::FreshCache,
            });
        }

        debug!("Cache miss for {}", self.address);
        match self.fetch_records().await {
            Ok(records) => Ok(Served {
                records: self.store(records).await,
                provenance: Provenance::Upstream,
            }),
            Err(e) => match self.snapshot().await {
                Some(records) => {
                    warn!(
                        "Upstream fetch failed, serving {} cached transactions: {}",
                        records.len(),
                        e
                    );
                    Ok(Served {
                        records,
                        provenance: Provenance::StaleFallback,
                    })
                }
                None => Err(CacheError::upstream_unavailable(&e)),
            },
        }
    }

    /// Look up one transaction by hash, ignoring case.
    ///
    /// Any existing snapshot is searched as-is, whatever its age; upstream is
    /// only asked when nothing has been fetched yet.
    pub async fn get_by_id(&self, hash: &str) -> Result<TransactionRecord, CacheError> {
        let records = match self.snapshot().await {
            Some(records) => records,
            None => self.populate().await?,
        };

        records
            .iter()
            .find(|r| r.hash_matches(hash))
            .cloned()
            .ok_or_else(|| CacheError::NotFound {
                hash: hash.to_string(),
            })
    }

    /// Fetch from upstream regardless of freshness.
    ///
    /// On failure the existing snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<Vec<TransactionRecord>>, CacheError> {
        let _guard = self.fetch_lock.lock().await;
        info!("Refreshing transactions for {}", self.address);
        let records = self.fetch_records().await?;
        Ok(self.store(records).await)
    }

    /// Current balance of the address in ether, six decimals. Not cached.
    pub async fn contract_balance(&self) -> Result<String, CacheError> {
        let wei = self.source.fetch_balance(&self.address).await?;
        Ok(format_units(wei, ETHER_DECIMALS, DISPLAY_PRECISION)?)
    }

    async fn populate(&self) -> Result<Arc<Vec<TransactionRecord>>, CacheError> {
        let _guard = self.fetch_lock.lock().await;
        if let Some(records) = self.snapshot().await {
            return Ok(records);
        }
        debug!("No snapshot yet for {}, fetching", self.address);
        match self.fetch_records().await {
            Ok(records) => Ok(self.store(records).await),
            Err(e) => Err(CacheError::upstream_unavailable(&e)),
        }
    }

    async fn snapshot(&self) -> Option<Arc<Vec<TransactionRecord>>> {
        self.cache.read().await.snapshot()
    }

    async fn fresh_snapshot(&self) -> Option<Arc<Vec<TransactionRecord>>> {
        self.cache.read().await.fresh(self.ttl, Instant::now())
    }

    async fn store(&self, records: Vec<TransactionRecord>) -> Arc<Vec<TransactionRecord>> {
        info!("Cached {} transactions for {}", records.len(), self.address);
        self.cache.write().await.replace(records, Instant::now())
    }

    async fn fetch_records(&self) -> Result<Vec<TransactionRecord>, NetworkError> {
        let raw = self.source.fetch_all(&self.address).await?;
        let records = raw
            .into_iter()
            .filter_map(|tx| {
                let hash = tx.hash.clone();
                match TransactionRecord::from_raw(0, tx) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Skipping transaction {}: {}", hash, e);
                        None
                    }
                }
            })
            .enumerate()
            .map(|(index, mut record)| {
                record.id = index + 1;
                record
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_labels_match_serde() {
        for p in [
            Provenance::FreshCache,
            Provenance::Upstream,
            Provenance::StaleFallback,
        ] {
            assert_eq!(serde_json::to_value(p).unwrap(), p.label());
        }
    }
}
