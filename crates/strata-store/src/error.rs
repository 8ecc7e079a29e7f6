use strata_types::ContentHash;

/// Errors from chunk store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A chunk named as already durable is not in the store.
    #[error("hinted chunk not present: {0}")]
    MissingHint(ContentHash),

    /// Internal synchronization state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
