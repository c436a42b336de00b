//! The external keyed record store the projector writes through.
//!
//! The host guarantees single-writer, in-order invocation, so every
//! `get_*` must observe the effect of every earlier `save_*` to the
//! same key. Store failures are fatal to the enclosing handler
//! invocation; retries belong to the host.

pub mod cache;
pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::models::{
    Account, AccountBalance, Chain, Contract, ContractTransaction, ContractTransactionKey,
    SpotLimitOrder, Transaction, TransactionKey,
};

/// Get/save access to every entity the projector maintains. Each save
/// is its own unit; there is no cross-record transaction at this seam.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn get_account(&self, address: &str) -> Result<Option<Account>, StoreError>;
    async fn save_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn get_balance(&self, address: &str) -> Result<Option<AccountBalance>, StoreError>;
    async fn save_balance(&self, balance: &AccountBalance) -> Result<(), StoreError>;

    async fn get_chain(&self, chain_id: &str) -> Result<Option<Chain>, StoreError>;
    async fn save_chain(&self, chain: &Chain) -> Result<(), StoreError>;

    async fn get_contract(&self, address: &str) -> Result<Option<Contract>, StoreError>;
    async fn save_contract(&self, contract: &Contract) -> Result<(), StoreError>;

    async fn get_transaction(
        &self,
        key: &TransactionKey,
    ) -> Result<Option<Transaction>, StoreError>;
    async fn save_transaction(&self, transaction: &Transaction) -> Result<(), StoreError>;

    async fn get_contract_transaction(
        &self,
        key: &ContractTransactionKey,
    ) -> Result<Option<ContractTransaction>, StoreError>;
    async fn save_contract_transaction(
        &self,
        transaction: &ContractTransaction,
    ) -> Result<(), StoreError>;

    async fn get_spot_limit_order(
        &self,
        key: &TransactionKey,
    ) -> Result<Option<SpotLimitOrder>, StoreError>;
    async fn save_spot_limit_order(&self, order: &SpotLimitOrder) -> Result<(), StoreError>;
}
