//! Ledger error model.

use thiserror::Error;

use crate::id::{ProductCode, SaleId};

/// Result type used across the catalog and sales ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failure returned by every catalog and ledger operation.
///
/// Nothing in the core recovers from these locally; each one is surfaced to
/// the caller, which can branch on [`LedgerError::kind`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A product with this code already exists.
    #[error("a product with code {0} already exists")]
    DuplicateKey(ProductCode),

    /// No product with this code exists.
    #[error("product {0} not found")]
    NotFound(ProductCode),

    /// The requested quantity exceeds the available stock.
    #[error("insufficient stock for product {code}: requested {requested}, available {available}")]
    InsufficientStock {
        code: ProductCode,
        requested: u64,
        available: u32,
    },

    /// A sale cannot be committed without line items.
    #[error("sale #{0} has no items")]
    EmptySale(SaleId),

    /// The sale was already committed or abandoned.
    #[error("sale #{0} is not an open draft")]
    NotDraft(SaleId),

    /// A value failed validation (non-positive quantity or price, empty name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing a durable store failed.
    #[error("storage failure: {0}")]
    Io(String),
}

/// Fieldless discriminant of [`LedgerError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateKey,
    NotFound,
    InsufficientStock,
    EmptySale,
    NotDraft,
    InvalidInput,
    Io,
}

impl LedgerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            LedgerError::EmptySale(_) => ErrorKind::EmptySale,
            LedgerError::NotDraft(_) => ErrorKind::NotDraft,
            LedgerError::InvalidInput(_) => ErrorKind::InvalidInput,
            LedgerError::Io(_) => ErrorKind::Io,
        }
    }
}
