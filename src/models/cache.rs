use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// One complete fetch result and the moment it was stored.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub records: Arc<Vec<T>>,
    pub fetched_at: Instant,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            fetched_at: self.fetched_at,
        }
    }
}

/// A collection that is either never fetched or holds exactly one snapshot.
///
/// The records and their fetch time live together, so one can't exist
/// without the other. Snapshots are replaced wholesale and handed out as
/// `Arc`s, so a caller keeps the exact data it was served after a
/// replacement.
#[derive(Debug)]
pub struct CachedCollection<T> {
    entry: Option<Snapshot<T>>,
}

impl<T> Default for CachedCollection<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T> CachedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }

    /// The current records, regardless of age.
    pub fn snapshot(&self) -> Option<Arc<Vec<T>>> {
        self.entry.as_ref().map(|e| Arc::clone(&e.records))
    }

    /// The current records if they were fetched less than `ttl` before `now`.
    pub fn fresh(&self, ttl: Duration, now: Instant) -> Option<Arc<Vec<T>>> {
        self.entry
            .as_ref()
            .filter(|e| now.saturating_duration_since(e.fetched_at) < ttl)
            .map(|e| Arc::clone(&e.records))
    }

    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.entry
            .as_ref()
            .map(|e| now.saturating_duration_since(e.fetched_at))
    }

    pub fn record_count(&self) -> Option<usize> {
        self.entry.as_ref().map(|e| e.records.len())
    }

    /// Replace the snapshot and return a handle to the new records.
    pub fn replace(&mut self, records: Vec<T>, now: Instant) -> Arc<Vec<T>> {
        let records = Arc::new(records);
        self.entry = Some(Snapshot {
            records: Arc::clone(&records),
            fetched_at: now,
        });
        records
    }
}
