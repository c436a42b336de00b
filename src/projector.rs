//! The ledger projector: turns decoded chain data into keyed records.
//!
//! Every operation is a single fetch/compute/upsert transition. The
//! host invokes them strictly sequentially in chain order; nothing here
//! retries, dedups, or coordinates across keys. A mid-sequence store
//! failure leaves earlier upserts in place, matching the host's
//! at-least-once block reprocessing.

use crate::chain::models::{
    BlockHeader, ContractExecuteMsg, DecodedMessage, Event, SpotLimitOrderMsg, TxEnvelope,
};
use crate::config::{Config, ProjectionPolicy};
use crate::error::ProjectorError;
use crate::models::{
    Account, AccountBalance, Chain, Contract, ContractTransaction, ContractTransactionKey,
    SpotLimitOrder, Transaction, TransactionKey,
};
use crate::store::RecordStore;
use crate::validation;
use num_bigint::BigInt;
use num_traits::Zero;
use tracing::debug;

pub struct Projector {
    policy: ProjectionPolicy,
}

impl Projector {
    pub fn new(policy: ProjectionPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.policy)
    }

    pub fn policy(&self) -> ProjectionPolicy {
        self.policy
    }

    /// Dispatch a decoded message to its projection. Spot limit orders
    /// are only constructed here; hosts that want them stored call
    /// [`Projector::save_spot_limit_order`] themselves.
    pub async fn apply<S: RecordStore>(
        &self,
        store: &S,
        header: &BlockHeader,
        message: &DecodedMessage,
    ) -> Result<(), ProjectorError> {
        match message {
            DecodedMessage::Transfer { event } => self.apply_transfer(store, header, event).await,
            DecodedMessage::Transaction { tx } => self.apply_transaction(store, header, tx).await,
            DecodedMessage::ContractExecution { tx, msg } => {
                self.apply_contract_execution(store, header, tx, msg).await
            }
            DecodedMessage::SpotLimitOrder { tx, msg } => {
                self.build_spot_limit_order(header, &tx.hash, tx.message_index, msg)?;
                Ok(())
            }
        }
    }

    /// Project a bank transfer event: adjust the balances of whichever
    /// of sender and recipient are present. A missing party just skips
    /// that side; a self-transfer applies both deltas and nets to zero.
    pub async fn apply_transfer<S: RecordStore>(
        &self,
        store: &S,
        header: &BlockHeader,
        event: &Event,
    ) -> Result<(), ProjectorError> {
        let parts = event.transfer_parts();

        if let Some(sender) = &parts.sender {
            let account = self.get_or_create_account(store, sender, header).await?;
            let debit = -&parts.amount;
            self.adjust_balance(store, &account, &debit, header).await?;
        }
        if let Some(recipient) = &parts.recipient {
            let account = self.get_or_create_account(store, recipient, header).await?;
            self.adjust_balance(store, &account, &parts.amount, header)
                .await?;
        }
        Ok(())
    }

    /// Project one decoded transaction. The per-event record and the
    /// chain aggregate are independent write paths gated by the policy.
    pub async fn apply_transaction<S: RecordStore>(
        &self,
        store: &S,
        header: &BlockHeader,
        tx: &TxEnvelope,
    ) -> Result<(), ProjectorError> {
        if self.policy.record_per_event {
            let record = Transaction {
                key: TransactionKey::new(tx.hash.clone(), tx.message_index),
                block_height: header.height,
                timestamp: header.time,
                denom: tx.fee_denom(),
                gas_used: tx.gas_used,
                status: tx.status(),
                chain_id: header.chain_id.clone(),
            };
            store.save_transaction(&record).await?;
        }

        if self.policy.accumulate_aggregates {
            if let Some(fee) = &tx.fee {
                if !fee.payer.is_empty() {
                    self.get_or_create_account(store, &fee.payer, header).await?;
                }
                if !fee.granter.is_empty() {
                    self.get_or_create_account(store, &fee.granter, header)
                        .await?;
                }
            }

            let failed = tx.status().is_failed();
            let chain = match store.get_chain(&header.chain_id).await? {
                Some(mut chain) => {
                    chain.block_height = header.height;
                    chain.timestamp = header.time;
                    // Gas counts toward the aggregate whether or not
                    // the transaction succeeded.
                    chain.gas_used += tx.gas_used;
                    chain.tx_count += 1;
                    if failed {
                        chain.failed_tx_count += 1;
                    }
                    chain
                }
                None => Chain {
                    chain_id: header.chain_id.clone(),
                    block_height: header.height,
                    timestamp: header.time,
                    gas_used: tx.gas_used,
                    tx_count: 1,
                    failed_tx_count: failed as i64,
                },
            };
            store.save_chain(&chain).await?;
            debug!(
                chain_id = %chain.chain_id,
                tx_count = chain.tx_count,
                "updated chain aggregate"
            );
        }
        Ok(())
    }

    /// Project one contract execution. An unknown contract is never an
    /// error; creating it is the only recovery path.
    pub async fn apply_contract_execution<S: RecordStore>(
        &self,
        store: &S,
        header: &BlockHeader,
        tx: &TxEnvelope,
        msg: &ContractExecuteMsg,
    ) -> Result<(), ProjectorError> {
        let failed = tx.status().is_failed();

        let contract = match store.get_contract(&msg.contract).await? {
            Some(mut contract) => {
                if self.policy.accumulate_aggregates {
                    contract.tx_count += 1;
                    if failed {
                        contract.failed_tx_count += 1;
                    }
                    contract.block_height = header.height;
                    contract.timestamp = header.time;
                    store.save_contract(&contract).await?;
                }
                contract
            }
            None => {
                let contract = if self.policy.accumulate_aggregates {
                    Contract {
                        address: msg.contract.clone(),
                        block_height: header.height,
                        timestamp: header.time,
                        chain_id: header.chain_id.clone(),
                        tx_count: 1,
                        failed_tx_count: failed as i64,
                        gas_used: tx.gas_used,
                    }
                } else {
                    Contract {
                        address: msg.contract.clone(),
                        block_height: header.height,
                        timestamp: header.time,
                        chain_id: header.chain_id.clone(),
                        tx_count: 0,
                        failed_tx_count: 0,
                        gas_used: 0,
                    }
                };
                store.save_contract(&contract).await?;
                debug!(contract = %contract.address, "created contract");
                contract
            }
        };

        if self.policy.record_per_event {
            let record = ContractTransaction {
                key: ContractTransactionKey::new(tx.hash.clone(), contract.address.clone()),
                block_height: header.height,
                timestamp: header.time,
                denom: tx.fee_denom(),
                gas_used: tx.gas_used,
                status: tx.status(),
                chain_id: header.chain_id.clone(),
            };
            store.save_contract_transaction(&record).await?;
        }
        Ok(())
    }

    /// Build a spot limit order value with its exact notional,
    /// `amount = price * quantity`. Pure and idempotent; persistence is
    /// a separate explicit step.
    pub fn build_spot_limit_order(
        &self,
        header: &BlockHeader,
        tx_hash: &str,
        message_index: u32,
        msg: &SpotLimitOrderMsg,
    ) -> Result<SpotLimitOrder, ProjectorError> {
        let price = validation::parse_exact("price", &msg.price)?;
        let quantity = validation::parse_exact("quantity", &msg.quantity)?;
        let amount = &price * &quantity;

        Ok(SpotLimitOrder {
            key: TransactionKey::new(tx_hash.to_string(), message_index),
            block_height: header.height,
            sender: msg.sender.clone(),
            market_id: msg.market_id.clone(),
            order_type: msg.order_type.clone(),
            subaccount_id: msg.subaccount_id.clone(),
            fee_recipient: msg.fee_recipient.clone(),
            price,
            quantity,
            amount,
        })
    }

    /// Persist an order built by [`Projector::build_spot_limit_order`].
    pub async fn save_spot_limit_order<S: RecordStore>(
        &self,
        store: &S,
        order: &SpotLimitOrder,
    ) -> Result<(), ProjectorError> {
        store.save_spot_limit_order(order).await?;
        Ok(())
    }

    /// Fetch an account, creating and persisting it on first reference.
    /// Creation metadata is fixed at first creation and never changed.
    async fn get_or_create_account<S: RecordStore>(
        &self,
        store: &S,
        address: &str,
        header: &BlockHeader,
    ) -> Result<Account, ProjectorError> {
        if let Some(account) = store.get_account(address).await? {
            return Ok(account);
        }
        let account = Account {
            address: address.to_string(),
            block_height: header.height,
            timestamp: header.time,
            chain_id: header.chain_id.clone(),
        };
        store.save_account(&account).await?;
        debug!(address = %account.address, height = header.height, "created account");
        Ok(account)
    }

    /// Apply a signed delta to an account's running balance. A missing
    /// balance starts at zero before the delta is applied.
    async fn adjust_balance<S: RecordStore>(
        &self,
        store: &S,
        account: &Account,
        delta: &BigInt,
        header: &BlockHeader,
    ) -> Result<(), ProjectorError> {
        let mut balance = match store.get_balance(&account.address).await? {
            Some(balance) => balance,
            None => AccountBalance {
                address: account.address.clone(),
                amount: BigInt::zero(),
                block_height: header.height,
                timestamp: header.time,
                chain_id: account.chain_id.clone(),
            },
        };
        balance.amount += delta;
        balance.block_height = header.height;
        balance.timestamp = header.time;
        store.save_balance(&balance).await?;
        Ok(())
    }
}
