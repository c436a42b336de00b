//! SQLite-backed record store.
//!
//! Aggregate records (balances, chains, contracts) upsert with
//! `ON CONFLICT ... DO UPDATE`; write-once records (transactions,
//! contract transactions, orders) use `DO NOTHING` so a replayed block
//! cannot rewrite history. Big integers are stored as decimal TEXT.

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{
    Account, AccountBalance, Chain, Contract, ContractTransaction, ContractTransactionKey,
    SpotLimitOrder, Transaction, TransactionKey, TxStatus,
};
use crate::store::cache::RecordCache;
use crate::store::RecordStore;
use num_bigint::BigInt;
use sqlx::sqlite::SqliteRow;
use sqlx::{migrate::MigrateDatabase, Pool, Row, Sqlite, SqlitePool};

pub const INIT_SCHEMA: &str = r#"
-- Accounts are created once and never mutated
CREATE TABLE IF NOT EXISTS accounts (
    address TEXT PRIMARY KEY,
    block_height INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    chain_id TEXT NOT NULL
);

-- One running balance per account; amount is a signed decimal string
CREATE TABLE IF NOT EXISTS account_balances (
    address TEXT PRIMARY KEY,
    amount TEXT NOT NULL,
    block_height INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    chain_id TEXT NOT NULL
);

-- Per-chain aggregate counters
CREATE TABLE IF NOT EXISTS chains (
    chain_id TEXT PRIMARY KEY,
    block_height INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    gas_used INTEGER NOT NULL,
    tx_count INTEGER NOT NULL,
    failed_tx_count INTEGER NOT NULL
);

-- Per-contract aggregate counters
CREATE TABLE IF NOT EXISTS contracts (
    address TEXT PRIMARY KEY,
    block_height INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    chain_id TEXT NOT NULL,
    tx_count INTEGER NOT NULL,
    failed_tx_count INTEGER NOT NULL,
    gas_used INTEGER NOT NULL
);

-- Write-once transaction records, keyed by (hash, message index)
CREATE TABLE IF NOT EXISTS transactions (
    hash TEXT NOT NULL,
    message_index INTEGER NOT NULL,
    block_height INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    denom TEXT,
    gas_used INTEGER NOT NULL,
    status TEXT NOT NULL,
    chain_id TEXT NOT NULL,
    PRIMARY KEY (hash, message_index)
);

-- Write-once contract execution records, keyed by (hash, contract)
CREATE TABLE IF NOT EXISTS contract_transactions (
    hash TEXT NOT NULL,
    contract_address TEXT NOT NULL,
    block_height INTEGER NOT NULL,
    timestamp INTEGER NOT NULL,
    denom TEXT,
    gas_used INTEGER NOT NULL,
    status TEXT NOT NULL,
    chain_id TEXT NOT NULL,
    PRIMARY KEY (hash, contract_address),
    FOREIGN KEY (contract_address) REFERENCES contracts(address)
);

-- Spot limit orders; price/quantity/amount are decimal strings
CREATE TABLE IF NOT EXISTS spot_limit_orders (
    hash TEXT NOT NULL,
    message_index INTEGER NOT NULL,
    block_height INTEGER NOT NULL,
    sender TEXT NOT NULL,
    market_id TEXT NOT NULL,
    order_type TEXT NOT NULL,
    subaccount_id TEXT NOT NULL,
    fee_recipient TEXT NOT NULL,
    price TEXT NOT NULL,
    quantity TEXT NOT NULL,
    amount TEXT NOT NULL,
    PRIMARY KEY (hash, message_index)
);

-- Indexes for the usual lookup paths
CREATE INDEX IF NOT EXISTS idx_contract_transactions_contract
    ON contract_transactions(contract_address);
CREATE INDEX IF NOT EXISTS idx_transactions_chain_height
    ON transactions(chain_id, block_height);
"#;

pub struct SqliteStore {
    pool: Pool<Sqlite>,
    cache: RecordCache,
}

impl SqliteStore {
    /// Connect to the configured database, creating it and the schema
    /// if needed. WAL mode keeps readers off the writer's back.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(&config.database_url)
            .await
            .unwrap_or(false)
        {
            Sqlite::create_database(&config.database_url).await?;
        }

        let pool = SqlitePool::connect(&config.database_url).await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::raw_sql(INIT_SCHEMA).execute(&pool).await?;

        Ok(Self {
            pool,
            cache: RecordCache::from_config(config),
        })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

fn bigint_column(row: &SqliteRow, column: &str) -> Result<BigInt, StoreError> {
    let raw: String = row.get(column);
    raw.parse().map_err(|_| {
        StoreError::Backend(format!("invalid integer in column {column}: {raw:?}"))
    })
}

fn status_column(row: &SqliteRow) -> Result<TxStatus, StoreError> {
    let raw: String = row.get("status");
    TxStatus::parse(&raw)
        .ok_or_else(|| StoreError::Backend(format!("unknown transaction status {raw:?}")))
}

impl RecordStore for SqliteStore {
    async fn get_account(&self, address: &str) -> Result<Option<Account>, StoreError> {
        if let Some(account) = self.cache.accounts.get(address).await {
            return Ok(Some(account));
        }
        let row = sqlx::query(
            "SELECT address, block_height, timestamp, chain_id FROM accounts WHERE address = ?",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        let account = row.map(|row| Account {
            address: row.get("address"),
            block_height: row.get("block_height"),
            timestamp: row.get("timestamp"),
            chain_id: row.get("chain_id"),
        });
        if let Some(account) = &account {
            self.cache
                .accounts
                .insert(account.address.clone(), account.clone())
                .await;
        }
        Ok(account)
    }

    async fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO accounts (address, block_height, timestamp, chain_id)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(address) DO NOTHING",
        )
        .bind(&account.address)
        .bind(account.block_height)
        .bind(account.timestamp)
        .bind(&account.chain_id)
        .execute(&self.pool)
        .await?;

        // First write wins; only cache the record that actually landed.
        if result.rows_affected() > 0 {
            self.cache
                .accounts
                .insert(account.address.clone(), account.clone())
                .await;
        }
        Ok(())
    }

    async fn get_balance(&self, address: &str) -> Result<Option<AccountBalance>, StoreError> {
        let row = sqlx::query(
            "SELECT address, amount, block_height, timestamp, chain_id
             FROM account_balances WHERE address = ?",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(AccountBalance {
                address: row.get("address"),
                amount: bigint_column(&row, "amount")?,
                block_height: row.get("block_height"),
                timestamp: row.get("timestamp"),
                chain_id: row.get("chain_id"),
            })),
            None => Ok(None),
        }
    }

    async fn save_balance(&self, balance: &AccountBalance) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO account_balances (address, amount, block_height, timestamp, chain_id)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(address) DO UPDATE SET
                 amount = excluded.amount,
                 block_height = excluded.block_height,
                 timestamp = excluded.timestamp",
        )
        .bind(&balance.address)
        .bind(balance.amount.to_string())
        .bind(balance.block_height)
        .bind(balance.timestamp)
        .bind(&balance.chain_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_chain(&self, chain_id: &str) -> Result<Option<Chain>, StoreError> {
        let row = sqlx::query(
            "SELECT chain_id, block_height, timestamp, gas_used, tx_count, failed_tx_count
             FROM chains WHERE chain_id = ?",
        )
        .bind(chain_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Chain {
            chain_id: row.get("chain_id"),
            block_height: row.get("block_height"),
            timestamp: row.get("timestamp"),
            gas_used: row.get("gas_used"),
            tx_count: row.get("tx_count"),
            failed_tx_count: row.get("failed_tx_count"),
        }))
    }

    async fn save_chain(&self, chain: &Chain) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO chains (chain_id, block_height, timestamp, gas_used, tx_count, failed_tx_count)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(chain_id) DO UPDATE SET
                 block_height = excluded.block_height,
                 timestamp = excluded.timestamp,
                 gas_used = excluded.gas_used,
                 tx_count = excluded.tx_count,
                 failed_tx_count = excluded.failed_tx_count",
        )
        .bind(&chain.chain_id)
        .bind(chain.block_height)
        .bind(chain.timestamp)
        .bind(chain.gas_used)
        .bind(chain.tx_count)
        .bind(chain.failed_tx_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_contract(&self, address: &str) -> Result<Option<Contract>, StoreError> {
        if let Some(contract) = self.cache.contracts.get(address).await {
            return Ok(Some(contract));
        }
        let row = sqlx::query(
            "SELECT address, block_height, timestamp, chain_id, tx_count, failed_tx_count, gas_used
             FROM contracts WHERE address = ?",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        let contract = row.map(|row| Contract {
            address: row.get("address"),
            block_height: row.get("block_height"),
            timestamp: row.get("timestamp"),
            chain_id: row.get("chain_id"),
            tx_count: row.get("tx_count"),
            failed_tx_count: row.get("failed_tx_count"),
            gas_used: row.get("gas_used"),
        });
        if let Some(contract) = &contract {
            self.cache
                .contracts
                .insert(contract.address.clone(), contract.clone())
                .await;
        }
        Ok(contract)
    }

    async fn save_contract(&self, contract: &Contract) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO contracts (address, block_height, timestamp, chain_id, tx_count, failed_tx_count, gas_used)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(address) DO UPDATE SET
                 block_height = excluded.block_height,
                 timestamp = excluded.timestamp,
                 tx_count = excluded.tx_count,
                 failed_tx_count = excluded.failed_tx_count,
                 gas_used = excluded.gas_used",
        )
        .bind(&contract.address)
        .bind(contract.block_height)
        .bind(contract.timestamp)
        .bind(&contract.chain_id)
        .bind(contract.tx_count)
        .bind(contract.failed_tx_count)
        .bind(contract.gas_used)
        .execute(&self.pool)
        .await?;

        self.cache
            .contracts
            .insert(contract.address.clone(), contract.clone())
            .await;
        Ok(())
    }

    async fn get_transaction(
        &self,
        key: &TransactionKey,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            "SELECT hash, message_index, block_height, timestamp, denom, gas_used, status, chain_id
             FROM transactions WHERE hash = ? AND message_index = ?",
        )
        .bind(&key.hash)
        .bind(key.message_index as i64)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Transaction {
                key: TransactionKey::new(
                    row.get::<String, _>("hash"),
                    row.get::<i64, _>("message_index") as u32,
                ),
                block_height: row.get("block_height"),
                timestamp: row.get("timestamp"),
                denom: row.get("denom"),
                gas_used: row.get("gas_used"),
                status: status_column(&row)?,
                chain_id: row.get("chain_id"),
            })),
            None => Ok(None),
        }
    }

    async fn save_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO transactions
                 (hash, message_index, block_height, timestamp, denom, gas_used, status, chain_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(hash, message_index) DO NOTHING",
        )
        .bind(&transaction.key.hash)
        .bind(transaction.key.message_index as i64)
        .bind(transaction.block_height)
        .bind(transaction.timestamp)
        .bind(&transaction.denom)
        .bind(transaction.gas_used)
        .bind(transaction.status.as_str())
        .bind(&transaction.chain_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_contract_transaction(
        &self,
        key: &ContractTransactionKey,
    ) -> Result<Option<ContractTransaction>, StoreError> {
        let row = sqlx::query(
            "SELECT hash, contract_address, block_height, timestamp, denom, gas_used, status, chain_id
             FROM contract_transactions WHERE hash = ? AND contract_address = ?",
        )
        .bind(&key.hash)
        .bind(&key.contract_address)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(ContractTransaction {
                key: ContractTransactionKey::new(
                    row.get::<String, _>("hash"),
                    row.get::<String, _>("contract_address"),
                ),
                block_height: row.get("block_height"),
                timestamp: row.get("timestamp"),
                denom: row.get("denom"),
                gas_used: row.get("gas_used"),
                status: status_column(&row)?,
                chain_id: row.get("chain_id"),
            })),
            None => Ok(None),
        }
    }

    async fn save_contract_transaction(
        &self,
        transaction: &ContractTransaction,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO contract_transactions
                 (hash, contract_address, block_height, timestamp, denom, gas_used, status, chain_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(hash, contract_address) DO NOTHING",
        )
        .bind(&transaction.key.hash)
        .bind(&transaction.key.contract_address)
        .bind(transaction.block_height)
        .bind(transaction.timestamp)
        .bind(&transaction.denom)
        .bind(transaction.gas_used)
        .bind(transaction.status.as_str())
        .bind(&transaction.chain_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_spot_limit_order(
        &self,
        key: &TransactionKey,
    ) -> Result<Option<SpotLimitOrder>, StoreError> {
        let row = sqlx::query(
            "SELECT hash, message_index, block_height, sender, market_id, order_type,
                    subaccount_id, fee_recipient, price, quantity, amount
             FROM spot_limit_orders WHERE hash = ? AND message_index = ?",
        )
        .bind(&key.hash)
        .bind(key.message_index as i64)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(SpotLimitOrder {
                key: TransactionKey::new(
                    row.get::<String, _>("hash"),
                    row.get::<i64, _>("message_index") as u32,
                ),
                block_height: row.get("block_height"),
                sender: row.get("sender"),
                market_id: row.get("market_id"),
                order_type: row.get("order_type"),
                subaccount_id: row.get("subaccount_id"),
                fee_recipient: row.get("fee_recipient"),
                price: bigint_column(&row, "price")?,
                quantity: bigint_column(&row, "quantity")?,
                amount: bigint_column(&row, "amount")?,
            })),
            None => Ok(None),
        }
    }

    async fn save_spot_limit_order(&self, order: &SpotLimitOrder) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO spot_limit_orders
                 (hash, message_index, block_height, sender, market_id, order_type,
                  subaccount_id, fee_recipient, price, quantity, amount)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(hash, message_index) DO NOTHING",
        )
        .bind(&order.key.hash)
        .bind(order.key.message_index as i64)
        .bind(order.block_height)
        .bind(&order.sender)
        .bind(&order.market_id)
        .bind(&order.order_type)
        .bind(&order.subaccount_id)
        .bind(&order.fee_recipient)
        .bind(order.price.to_string())
        .bind(order.quantity.to_string())
        .bind(order.amount.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
