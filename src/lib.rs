pub mod chain;
pub mod config;
pub mod error;
pub mod models;
pub mod projector;
pub mod store;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export the types a host needs to wire the projector up
pub use chain::models::{
    BlockHeader, Coin, ContractExecuteMsg, DecodedMessage, Event, EventAttribute, Fee,
    SpotLimitOrderMsg, TxEnvelope,
};
pub use config::{Config, ProjectionPolicy};
pub use error::{ProjectorError, StoreError};
pub use models::{
    Account, AccountBalance, Chain, Contract, ContractTransaction, ContractTransactionKey,
    SpotLimitOrder, Transaction, TransactionKey, TxStatus,
};
pub use projector::Projector;
pub use store::{MemoryStore, RecordStore, SqliteStore};
