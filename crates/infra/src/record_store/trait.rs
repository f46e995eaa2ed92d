use std::sync::Arc;

use thiserror::Error;

use stockledger_core::LedgerError;

/// Durable store operation error.
///
/// These are **infrastructure errors** (filesystem, encoding) as opposed to
/// ledger errors (validation, invariants). They reach callers as
/// [`LedgerError::Io`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("write rejected: {0}")]
    Unavailable(String),
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        LedgerError::io(value.to_string())
    }
}

/// Whole-set record store.
///
/// A store holds one ordered collection of records. Every `save` replaces the
/// full collection; a successful return means the new set is durable and a
/// failed one leaves the previous set intact.
///
/// ## Load Semantics
///
/// `load()` returns the records in stored order. A store that was never
/// written returns an empty vector rather than an error.
pub trait RecordStore<T>: Send + Sync {
    /// Read the full record set.
    fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the full record set.
    fn save(&self, records: &[T]) -> Result<(), StoreError>;
}

impl<T, S> RecordStore<T> for Arc<S>
where
    S: RecordStore<T> + ?Sized,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        (**self).save(records)
    }
}
