//! `stockledger-app` — wires the catalog and sales ledger to their on-disk stores.
//!
//! This is the composition root an interactive front end (or the report
//! binary) builds on. It owns no business rules of its own.

use std::sync::Arc;

use serde::Serialize;

use stockledger_catalog::{Catalog, Product};
use stockledger_core::LedgerResult;
use stockledger_infra::{JsonFileStore, StoreConfig};
use stockledger_sales::{Sale, SalesLedger, SalesSummary};

pub type ProductStore = JsonFileStore<Product>;
pub type SaleStore = JsonFileStore<Sale>;

/// How many sales the report lists individually.
pub const RECENT_SALES: usize = 5;

/// Catalog and sales ledger backed by JSON files.
#[derive(Debug)]
pub struct Shop {
    catalog: Arc<Catalog<ProductStore>>,
    ledger: SalesLedger<ProductStore, SaleStore>,
}

/// Read-only snapshot of stock alerts and sales figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub low_stock: Vec<Product>,
    pub sales: SalesSummary,
}

impl Shop {
    /// Load both stores from the locations in `config`. Missing files mean
    /// empty stores.
    pub fn open(config: &StoreConfig) -> LedgerResult<Self> {
        let catalog = Arc::new(Catalog::load(JsonFileStore::new(config.products_path()))?);
        let ledger = SalesLedger::load(catalog.clone(), JsonFileStore::new(config.sales_path()))?;

        tracing::info!(
            data_dir = %config.data_dir().display(),
            products = catalog.len()?,
            sales = ledger.list()?.len(),
            "shop opened"
        );
        Ok(Self { catalog, ledger })
    }

    pub fn catalog(&self) -> &Catalog<ProductStore> {
        &self.catalog
    }

    pub fn ledger(&self) -> &SalesLedger<ProductStore, SaleStore> {
        &self.ledger
    }

    pub fn report(&self, recent: usize) -> LedgerResult<Report> {
        Ok(Report {
            low_stock: self.catalog.low_stock()?,
            sales: self.ledger.summary(recent)?,
        })
    }
}
