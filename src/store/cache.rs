use crate::config::Config;
use crate::models::{Account, Contract};
use moka::future::Cache;
use std::time::Duration;

/// Read-through cache for the hot get-or-create lookups. Maintained
/// write-through on every save so read-your-writes holds under the
/// host's single-writer contract.
#[derive(Clone)]
pub struct RecordCache {
    pub accounts: Cache<String, Account>,
    pub contracts: Cache<String, Contract>,
}

impl RecordCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            accounts: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
            contracts: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_capacity, config.cache_ttl)
    }
}
