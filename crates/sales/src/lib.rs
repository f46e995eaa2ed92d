//! Sales ledger: draft sales, their atomic commit against the catalog, and the
//! committed sale history.
//!
//! A sale is opened as a draft, filled line by line (each line checked
//! against live catalog stock), and then either committed (stock is taken for
//! every line and the sale is appended to durable history) or abandoned
//! (no trace anywhere).

pub mod ledger;
pub mod sale;
pub mod summary;

pub use ledger::SalesLedger;
pub use sale::{LineItem, Sale, SaleStatus};
pub use summary::{RecentSale, SalesSummary};
