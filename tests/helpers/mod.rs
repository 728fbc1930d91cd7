//! Shared test doubles for the cache and HTTP tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use donation_proxy::{NetworkError, RawTransaction, TransactionService, TransactionSource};

pub const CONTRACT: &str = "0x5B07360756Ebbc350e2E4c642a09E00942240212";
pub const TTL: Duration = Duration::from_secs(30);

/// Upstream stand-in that counts calls and can be told to fail or stall.
pub struct MockSource {
    calls: AtomicUsize,
    failing: AtomicBool,
    transactions: Mutex<Vec<RawTransaction>>,
    /// One-shot responses, handed out in call order before `transactions`.
    queued: Mutex<VecDeque<Vec<RawTransaction>>>,
    delay: Option<Duration>,
    balance: U256,
}

impl MockSource {
    pub fn new(transactions: Vec<RawTransaction>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            transactions: Mutex::new(transactions),
            queued: Mutex::new(VecDeque::new()),
            delay: None,
            balance: U256::from(2_500_000_000_000_000_000u128),
        }
    }

    pub fn failing() -> Self {
        let source = Self::new(Vec::new());
        source.set_failing(true);
        source
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_transactions(&self, transactions: Vec<RawTransaction>) {
        *self.transactions.lock().unwrap() = transactions;
    }

    pub fn queue_transactions(&self, transactions: Vec<RawTransaction>) {
        self.queued.lock().unwrap().push_back(transactions);
    }

    fn check(&self) -> Result<(), NetworkError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(NetworkError::Status { status: 503 })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TransactionSource for MockSource {
    async fn fetch_all(&self, address: &str) -> Result<Vec<RawTransaction>, NetworkError> {
        assert_eq!(address, CONTRACT);
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queued = self.queued.lock().unwrap().pop_front();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        Ok(queued.unwrap_or_else(|| self.transactions.lock().unwrap().clone()))
    }

    async fn fetch_balance(&self, _address: &str) -> Result<U256, NetworkError> {
        self.check()?;
        Ok(self.balance)
    }
}

/// Upstream-shaped transaction with the given hash and wei value.
pub fn raw_tx(hash: &str, value_wei: &str) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        from: "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD58".to_string(),
        to: CONTRACT.to_string(),
        value: value_wei.to_string(),
        gas_used: "45000".to_string(),
        gas_price: "1500000000".to_string(),
        receipt_status: "1".to_string(),
        time_stamp: "1769673600".to_string(),
        block_number: "7600000".to_string(),
        confirmations: "10".to_string(),
        method_id: "0x3a0e9f5c".to_string(),
        function_name: "donate(string _message)".to_string(),
    }
}

pub fn two_transactions() -> Vec<RawTransaction> {
    vec![
        raw_tx("0xABCDEF0001", "1000000000000000000"),
        raw_tx("0xabcdef0002", "150000000000000"),
    ]
}

pub fn service(source: Arc<MockSource>) -> TransactionService {
    TransactionService::new(source, CONTRACT, TTL)
}
