//! Foundation types for Strata.
//!
//! Every other Strata crate depends on `strata-types`. The types here carry no
//! behavior beyond content addressing: a [`Chunk`] is an immutable payload and
//! its [`ContentHash`] is always the BLAKE3 digest of that payload.
//!
//! # Key Types
//!
//! - [`ContentHash`]: 32-byte content address; the all-zero value means "empty"
//! - [`Chunk`]: immutable payload plus its hash
//! - [`Hints`]: hashes asserted to be durable at the store already

pub mod chunk;
pub mod error;
pub mod hash;

pub use chunk::{Chunk, Hints};
pub use error::TypeError;
pub use hash::ContentHash;
