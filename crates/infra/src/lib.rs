//! Infrastructure layer: durable record stores and configuration.

pub mod config;
pub mod record_store;

pub use config::StoreConfig;
pub use record_store::{InMemoryStore, JsonFileStore, RecordStore, StoreError};
