use thiserror::Error;

/// Failures surfaced by a record store backend. These are fatal to the
/// enclosing handler invocation; the host owns retries.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Failures surfaced by projector operations.
#[derive(Error, Debug)]
pub enum ProjectorError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("malformed {field}: {value:?}")]
    MalformedAmount {
        field: &'static str,
        value: String,
    },
}
