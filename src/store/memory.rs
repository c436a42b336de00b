//! In-process record store backed by hash maps. Used by the test suite
//! and by hosts that embed the projector without a database.

use crate::error::StoreError;
use crate::models::{
    Account, AccountBalance, Chain, Contract, ContractTransaction, ContractTransactionKey,
    SpotLimitOrder, Transaction, TransactionKey,
};
use crate::store::RecordStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<String, Account>>,
    balances: Mutex<HashMap<String, AccountBalance>>,
    chains: Mutex<HashMap<String, Chain>>,
    contracts: Mutex<HashMap<String, Contract>>,
    transactions: Mutex<HashMap<TransactionKey, Transaction>>,
    contract_transactions: Mutex<HashMap<ContractTransactionKey, ContractTransaction>>,
    spot_limit_orders: Mutex<HashMap<TransactionKey, SpotLimitOrder>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("memory store mutex poisoned".to_string()))
}

impl RecordStore for MemoryStore {
    async fn get_account(&self, address: &str) -> Result<Option<Account>, StoreError> {
        Ok(lock(&self.accounts)?.get(address).cloned())
    }

    async fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        // Accounts are immutable after creation; first write wins.
        lock(&self.accounts)?
            .entry(account.address.clone())
            .or_insert_with(|| account.clone());
        Ok(())
    }

    async fn get_balance(&self, address: &str) -> Result<Option<AccountBalance>, StoreError> {
        Ok(lock(&self.balances)?.get(address).cloned())
    }

    async fn save_balance(&self, balance: &AccountBalance) -> Result<(), StoreError> {
        lock(&self.balances)?.insert(balance.address.clone(), balance.clone());
        Ok(())
    }

    async fn get_chain(&self, chain_id: &str) -> Result<Option<Chain>, StoreError> {
        Ok(lock(&self.chains)?.get(chain_id).cloned())
    }

    async fn save_chain(&self, chain: &Chain) -> Result<(), StoreError> {
        lock(&self.chains)?.insert(chain.chain_id.clone(), chain.clone());
        Ok(())
    }

    async fn get_contract(&self, address: &str) -> Result<Option<Contract>, StoreError> {
        Ok(lock(&self.contracts)?.get(address).cloned())
    }

    async fn save_contract(&self, contract: &Contract) -> Result<(), StoreError> {
        lock(&self.contracts)?.insert(contract.address.clone(), contract.clone());
        Ok(())
    }

    async fn get_transaction(
        &self,
        key: &TransactionKey,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(lock(&self.transactions)?.get(key).cloned())
    }

    async fn save_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        // Write-once: a repeat save of the same key is a no-op.
        lock(&self.transactions)?
            .entry(transaction.key.clone())
            .or_insert_with(|| transaction.clone());
        Ok(())
    }

    async fn get_contract_transaction(
        &self,
        key: &ContractTransactionKey,
    ) -> Result<Option<ContractTransaction>, StoreError> {
        Ok(lock(&self.contract_transactions)?.get(key).cloned())
    }

    async fn save_contract_transaction(
        &self,
        transaction: &ContractTransaction,
    ) -> Result<(), StoreError> {
        lock(&self.contract_transactions)?
            .entry(transaction.key.clone())
            .or_insert_with(|| transaction.clone());
        Ok(())
    }

    async fn get_spot_limit_order(
        &self,
        key: &TransactionKey,
    ) -> Result<Option<SpotLimitOrder>, StoreError> {
        Ok(lock(&self.spot_limit_orders)?.get(key).cloned())
    }

    async fn save_spot_limit_order(&self, order: &SpotLimitOrder) -> Result<(), StoreError> {
        lock(&self.spot_limit_orders)?
            .entry(order.key.clone())
            .or_insert_with(|| order.clone());
        Ok(())
    }
}
