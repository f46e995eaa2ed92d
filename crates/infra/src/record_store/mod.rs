//! Durable whole-set record stores.
//!
//! Both the catalog and the sales ledger persist their full record set on every
//! mutation. This module defines that boundary and its implementations.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use r#trait::{RecordStore, StoreError};
