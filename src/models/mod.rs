// Entity records written to the record store, plus the composite key
// value types. Keys are explicit structs with derived equality/ordering
// rather than `"{hash}-{idx}"` strings, so a hash containing a separator
// character cannot collide with another key.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a transaction as recorded on chain. Status code 0 is a
/// success; every other code is a failure. There is no third value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

impl TxStatus {
    pub fn from_code(code: u32) -> Self {
        if code == 0 {
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

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(TxStatus::Success),
            "failed" => Some(TxStatus::Failed),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TxStatus::Failed)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a transaction record: hash plus the message index within
/// the transaction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionKey {
    pub hash: String,
    pub message_index: u32,
}

impl TransactionKey {
    pub fn new(hash: impl Into<String>, message_index: u32) -> Self {
        Self {
            hash: hash.into(),
            message_index,
        }
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hash, self.message_index)
    }
}

/// Identity of a contract transaction record: hash plus the executed
/// contract's address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractTransactionKey {
    pub hash: String,
    pub contract_address: String,
}

impl ContractTransactionKey {
    pub fn new(hash: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            contract_address: contract_address.into(),
        }
    }
}

impl fmt::Display for ContractTransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hash, self.contract_address)
    }
}

/// An address seen on chain. Created on first reference and never
/// mutated afterwards; the running balance lives in [`AccountBalance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub block_height: i64,
    pub timestamp: i64,
    pub chain_id: String,
}

/// Running signed balance of an account, one record per account.
/// Credits are positive deltas, debits negative, applied in event order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: String,
    pub amount: BigInt,
    pub block_height: i64,
    pub timestamp: i64,
    pub chain_id: String,
}

/// Per-chain aggregate counters. All counters are monotonically
/// non-decreasing; `failed_tx_count <= tx_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub chain_id: String,
    pub block_height: i64,
    pub timestamp: i64,
    pub gas_used: i64,
    pub tx_count: i64,
    pub failed_tx_count: i64,
}

/// A contract seen in an execution message, with per-contract counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub address: String,
    pub block_height: i64,
    pub timestamp: i64,
    pub chain_id: String,
    pub tx_count: i64,
    pub failed_tx_count: i64,
    pub gas_used: i64,
}

/// Write-once transaction record. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub key: TransactionKey,
    pub block_height: i64,
    pub timestamp: i64,
    pub denom: Option<String>,
    pub gas_used: i64,
    pub status: TxStatus,
    pub chain_id: String,
}

/// Write-once record of a single contract execution. The contract
/// back-reference is carried by the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTransaction {
    pub key: ContractTransactionKey,
    pub block_height: i64,
    pub timestamp: i64,
    pub denom: Option<String>,
    pub gas_used: i64,
    pub status: TxStatus,
    pub chain_id: String,
}

/// A spot limit order with its derived notional amount,
/// `amount = price * quantity` at arbitrary precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotLimitOrder {
    pub key: TransactionKey,
    pub block_height: i64,
    pub sender: String,
    pub market_id: String,
    pub order_type: String,
    pub subaccount_id: String,
    pub fee_recipient: String,
    pub price: BigInt,
    pub quantity: BigInt,
    pub amount: BigInt,
}
