// Configuration for:
// - Database connection string (SQLite store)
// - Cache settings (size, TTL)
// - Projection policy (which of the two historical write paths to run)

use dotenv::dotenv;
use std::env;
use std::time::Duration;

/// Which write paths the projector runs. The two historical deployments
/// of this indexer were a plain per-event ledger and an accounting
/// ledger with running aggregates; the choice is made once at start-up
/// and never merged silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionPolicy {
    /// Write an immutable record per transaction / contract execution.
    pub record_per_event: bool,
    /// Maintain chain and contract aggregate counters.
    pub accumulate_aggregates: bool,
}

impl ProjectionPolicy {
    pub fn plain_ledger() -> Self {
        Self {
            record_per_event: true,
            accumulate_aggregates: false,
        }
    }

    pub fn accounting_ledger() -> Self {
        Self {
            record_per_event: false,
            accumulate_aggregates: true,
        }
    }
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            record_per_event: true,
            accumulate_aggregates: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub policy: ProjectionPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:ledger.db".to_string());
        let cache_ttl = env::var("CACHE_TTL")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));
        let cache_max_capacity = env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .unwrap_or(1000);
        let record_per_event = env_bool("PROJECT_RECORDS", true);
        let accumulate_aggregates = env_bool("ACCUMULATE_AGGREGATES", true);

        Self {
            database_url,
            cache_ttl,
            cache_max_capacity,
            policy: ProjectionPolicy {
                record_per_event,
                accumulate_aggregates,
            },
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(value.as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
