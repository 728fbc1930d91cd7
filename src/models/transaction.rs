use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AmountError;
use crate::utils::amount::wei_to_ether;

/// One item of an Etherscan `txlist` response, as the upstream spells it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    /// Wei, base 10.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub gas_used: String,
    #[serde(default)]
    pub gas_price: String,
    #[serde(default, rename = "txreceipt_status")]
    pub receipt_status: String,
    /// Unix seconds, base 10.
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub block_number: String,
    #[serde(default)]
    pub confirmations: String,
    #[serde(default)]
    pub method_id: String,
    #[serde(default)]
    pub function_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

impl TxStatus {
    /// Etherscan reports `"1"` for a successful receipt; anything else failed.
    pub fn from_receipt_flag(flag: &str) -> Self {
        if flag == "1" {
            TxStatus::Success
        } else {
            TxStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Success => "success",
            TxStatus::Failed => "failed",
        }
    }
}

/// A transaction as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// 1-based position within the snapshot that produced it.
    pub id: usize,
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Ether with six fractional digits.
    pub value: String,
    pub gas_used: String,
    pub gas_price: String,
    pub status: TxStatus,
    pub timestamp: DateTime<Utc>,
    pub block_number: u64,
    pub confirmations: u64,
    pub method_id: String,
    pub function_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("bad value: {0}")]
    Value(#[from] AmountError),

    #[error("bad {field} '{raw}'")]
    Field { field: &'static str, raw: String },
}

impl TransactionRecord {
    pub fn from_raw(id: usize, raw: RawTransaction) -> Result<Self, RecordError> {
        let value = wei_to_ether(&raw.value)?;
        let seconds: i64 = parse_field("timeStamp", &raw.time_stamp)?;
        let timestamp = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| RecordError::Field {
                field: "timeStamp",
                raw: raw.time_stamp.clone(),
            })?;
        let block_number = parse_field("blockNumber", &raw.block_number)?;
        let confirmations = parse_field("confirmations", &raw.confirmations)?;
        let function_name = if raw.function_name.is_empty() {
            "Unknown".to_string()
        } else {
            raw.function_name
        };

        Ok(Self {
            id,
            hash: raw.hash,
            from: raw.from,
            to: raw.to,
            value,
            gas_used: raw.gas_used,
            gas_price: raw.gas_price,
            status: TxStatus::from_receipt_flag(&raw.receipt_status),
            timestamp,
            block_number,
            confirmations,
            method_id: raw.method_id,
            function_name,
        })
    }

    pub fn hash_matches(&self, hash: &str) -> bool {
        self.hash.eq_ignore_ascii_case(hash)
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, RecordError> {
    raw.trim().parse().map_err(|_| RecordError::Field {
        field,
        raw: raw.to_string(),
    })
}
