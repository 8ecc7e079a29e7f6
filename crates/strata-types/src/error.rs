use thiserror::Error;

use crate::hash::ContentHash;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch {
        expected: ContentHash,
        computed: ContentHash,
    },
}
