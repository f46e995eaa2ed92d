//! Product catalog: the single source of truth for products and stock.
//!
//! Every mutation is validated against the catalog invariants (unique codes,
//! non-negative stock, positive prices) and durably written before it becomes
//! visible in memory.

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{MAX_UNIT_PRICE, NewProduct, Product, ProductUpdate, validate_unit_price};
