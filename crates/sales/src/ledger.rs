//! Sale orchestration against the catalog.
//!
//! ## Commit Flow
//!
//! ```text
//! draft + non-empty?
//!   ↓
//! ledger lock
//!   ↓
//! Catalog::decrement_stock_then   (catalog lock; all lines checked, then all applied, one write)
//!   ↓
//! append to sale history + RecordStore::save   (still under the catalog lock)
//!   ↓  (on failure: the catalog writes its pre-commit set back)
//! mark Committed
//! ```
//!
//! Commits are serialized by the ledger lock, and no catalog mutation can run
//! between the stock write and the history write. Stock itself is only ever
//! reduced through the catalog.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use stockledger_catalog::{Catalog, Product};
use stockledger_core::{LedgerError, LedgerResult, ProductCode, SaleId, find_by_id, first_duplicate_id};
use stockledger_infra::RecordStore;

use crate::sale::{LineItem, Sale, SaleStatus};
use crate::summary::SalesSummary;

pub struct SalesLedger<P, S> {
    catalog: Arc<Catalog<P>>,
    store: S,
    sales: Mutex<Vec<Sale>>,
    next_id: AtomicU64,
}

impl<P, S> core::fmt::Debug for SalesLedger<P, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SalesLedger")
            .field("next_id", &self.next_id.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<P, S> SalesLedger<P, S>
where
    P: RecordStore<Product>,
    S: RecordStore<Sale>,
{
    /// Load committed history from `store`.
    ///
    /// The next sale id is derived here, once: highest stored id + 1, or 1 for
    /// an empty history. Repeated ids and sales that could never have been
    /// committed are rejected as corrupt.
    pub fn load(catalog: Arc<Catalog<P>>, store: S) -> LedgerResult<Self> {
        let sales = store.load()?;

        if let Some(dup) = first_duplicate_id(sales.as_slice()) {
            tracing::error!(sale_id = %dup, "duplicate sale id in store");
            return Err(LedgerError::io(format!("sale store contains duplicate id {dup}")));
        }
        for sale in &sales {
            if let Err(e) = sale.validate_stored() {
                tracing::error!(sale_id = %sale.id(), error = %e, "invalid sale in store");
                return Err(LedgerError::io(format!(
                    "sale store holds invalid sale {}: {e}",
                    sale.id()
                )));
            }
        }
        let next_id = sales
            .iter()
            .map(|s| s.id().get())
            .max()
            .map_or(1, |max| max + 1);

        tracing::debug!(count = sales.len(), next_id, "sales ledger loaded");
        Ok(Self {
            catalog,
            store,
            sales: Mutex::new(sales),
            next_id: AtomicU64::new(next_id),
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog<P>> {
        &self.catalog
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Vec<Sale>>> {
        self.sales
            .lock()
            .map_err(|_| LedgerError::io("sales ledger lock poisoned"))
    }

    /// Start an empty draft with the next sequential id. Nothing is stored.
    pub fn open(&self) -> Sale {
        let id = SaleId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        tracing::debug!(sale_id = %id, "sale opened");
        Sale::draft(id, Utc::now())
    }

    /// Append a line to a draft, snapshotting the product's current name and price.
    ///
    /// The quantity is checked against live stock only; lines already on the
    /// draft are not reserved. `commit` re-checks the whole draft.
    pub fn add_item(
        &self,
        sale: &mut Sale,
        code: ProductCode,
        quantity: u32,
    ) -> LedgerResult<LineItem> {
        sale.ensure_draft()?;
        if quantity == 0 {
            return Err(LedgerError::invalid_input("quantity must be positive"));
        }

        let product = self
            .catalog
            .find_by_code(code)?
            .ok_or(LedgerError::NotFound(code))?;

        if !product.has_stock_for(u64::from(quantity)) {
            tracing::warn!(sale_id = %sale.id(), code = %code, quantity, available = product.stock_quantity(), "line rejected");
            return Err(LedgerError::InsufficientStock {
                code,
                requested: u64::from(quantity),
                available: product.stock_quantity(),
            });
        }

        let item = LineItem::snapshot(&product, quantity);
        sale.push_item(item.clone());
        tracing::debug!(sale_id = %sale.id(), code = %code, quantity, "line added");
        Ok(item)
    }

    /// Finalize a draft: take stock for every line and append it to history.
    ///
    /// Either every line's stock is taken and exactly one sale is stored, or
    /// nothing changes.
    pub fn commit(&self, sale: &mut Sale) -> LedgerResult<Sale> {
        sale.ensure_draft()?;
        if sale.is_empty() {
            tracing::warn!(sale_id = %sale.id(), "refusing to commit empty sale");
            return Err(LedgerError::EmptySale(sale.id()));
        }

        let mut sales = self.lock()?;

        // A cloned draft must not be committed twice.
        if find_by_id(sales.as_slice(), sale.id()).is_some() {
            return Err(LedgerError::NotDraft(sale.id()));
        }

        let lines = sale.stock_lines();
        let mut committed = sale.clone();
        committed.set_status(SaleStatus::Committed);

        let mut next = sales.clone();
        next.push(committed.clone());

        // The history write runs under the catalog lock; if it fails the
        // catalog writes its pre-commit stock back before anyone else can edit it.
        self.catalog.decrement_stock_then(&lines, || {
            self.store.save(&next).map_err(|e| {
                tracing::error!(sale_id = %sale.id(), error = %e, "failed to persist sale; restoring stock");
                LedgerError::from(e)
            })
        })?;

        *sales = next;
        sale.set_status(SaleStatus::Committed);

        tracing::info!(
            sale_id = %committed.id(),
            lines = committed.item_count(),
            total = %committed.total(),
            "sale committed"
        );
        Ok(committed)
    }

    /// Discard a draft. No stock or storage effect.
    pub fn abandon(&self, sale: &mut Sale) -> LedgerResult<()> {
        sale.ensure_draft()?;
        sale.set_status(SaleStatus::Abandoned);
        tracing::debug!(sale_id = %sale.id(), "sale abandoned");
        Ok(())
    }

    /// Committed sales in commit order.
    pub fn list(&self) -> LedgerResult<Vec<Sale>> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, id: SaleId) -> LedgerResult<Option<Sale>> {
        Ok(find_by_id(self.lock()?.as_slice(), id).cloned())
    }

    /// Aggregate figures over committed history plus the `recent` newest sales.
    pub fn summary(&self, recent: usize) -> LedgerResult<SalesSummary> {
        Ok(SalesSummary::from_sales(&self.lock()?, recent))
    }
}
