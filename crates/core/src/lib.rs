//! `stockledger-core` — shared building blocks for the catalog and sales ledger.
//!
//! This crate contains **pure domain** primitives (identifiers, the entity trait,
//! the error taxonomy). No storage, no logging setup.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id, find_by_id_mut, first_duplicate_id, position_by_id};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use id::{ProductCode, SaleId};
