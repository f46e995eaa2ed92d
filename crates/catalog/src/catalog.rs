//! The catalog store.
//!
//! `Catalog` owns the product set. Reads take a shared lock; every mutation
//! runs under the exclusive lock, is applied to a copy of the set, written to
//! the durable store, and only then swapped into memory:
//!
//! ```text
//! write lock → clone set → mutate copy → RecordStore::save → swap in
//! ```
//!
//! A failed save therefore leaves both the store and the in-memory set exactly
//! as they were before the call.

use std::sync::{RwLock, RwLockReadGuard};

use chrono::Utc;

use stockledger_core::{
    LedgerError, LedgerResult, ProductCode, find_by_id, find_by_id_mut, first_duplicate_id,
    position_by_id,
};
use stockledger_infra::RecordStore;

use crate::product::{NewProduct, Product, ProductUpdate};

pub struct Catalog<S> {
    store: S,
    products: RwLock<Vec<Product>>,
}

impl<S> core::fmt::Debug for Catalog<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl<S> Catalog<S>
where
    S: RecordStore<Product>,
{
    /// Load the full product set from `store` (empty if nothing was stored yet).
    ///
    /// A store holding two products with the same code, or a product that
    /// would not pass validation today, is rejected as corrupt.
    pub fn load(store: S) -> LedgerResult<Self> {
        let products = store.load()?;

        if let Some(dup) = first_duplicate_id(products.as_slice()) {
            tracing::error!(code = %dup, "duplicate product code in store");
            return Err(LedgerError::io(format!(
                "product store contains duplicate code {dup}"
            )));
        }
        for product in &products {
            if let Err(e) = product.validate_stored() {
                tracing::error!(code = %product.code(), error = %e, "invalid product in store");
                return Err(LedgerError::io(format!(
                    "product store holds invalid product {}: {e}",
                    product.code()
                )));
            }
        }

        tracing::debug!(count = products.len(), "catalog loaded");
        Ok(Self {
            store,
            products: RwLock::new(products),
        })
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, Vec<Product>>> {
        self.products
            .read()
            .map_err(|_| LedgerError::io("catalog lock poisoned"))
    }

    /// Run `change` against a copy of the product set, persist the result,
    /// then publish it. Nothing is published if `change` or the save fails.
    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut Vec<Product>) -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        let mut current = self
            .products
            .write()
            .map_err(|_| LedgerError::io("catalog lock poisoned"))?;

        let mut next = current.clone();
        let out = change(&mut next)?;

        if let Err(e) = self.store.save(&next) {
            tracing::error!(error = %e, "failed to persist product store");
            return Err(e.into());
        }

        *current = next;
        Ok(out)
    }

    /// Insert a new product. Fails with `DuplicateKey` if the code is taken.
    pub fn add(&self, new: NewProduct) -> LedgerResult<Product> {
        let product = Product::create(new, Utc::now())?;

        let added = self.mutate(|products| {
            if find_by_id(products.as_slice(), product.code()).is_some() {
                tracing::warn!(code = %product.code(), "rejected duplicate product code");
                return Err(LedgerError::DuplicateKey(product.code()));
            }
            products.push(product.clone());
            Ok(product)
        })?;

        tracing::info!(code = %added.code(), name = added.name(), "product added");
        Ok(added)
    }

    /// All products in insertion order.
    pub fn list(&self) -> LedgerResult<Vec<Product>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> LedgerResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn find_by_code(&self, code: ProductCode) -> LedgerResult<Option<Product>> {
        Ok(find_by_id(self.read()?.as_slice(), code).cloned())
    }

    /// Products whose name contains `text`, ignoring case.
    pub fn find_by_name(&self, text: &str) -> LedgerResult<Vec<Product>> {
        let needle = text.to_lowercase();
        Ok(self
            .read()?
            .iter()
            .filter(|p| p.name_contains(&needle))
            .cloned()
            .collect())
    }

    /// Overwrite the mutable fields of an existing product.
    pub fn update(&self, code: ProductCode, update: ProductUpdate) -> LedgerResult<Product> {
        let updated = self.mutate(|products| {
            let product = find_mut(products, code)?;
            product.apply_update(update)?;
            Ok(product.clone())
        })?;

        tracing::info!(code = %code, "product updated");
        Ok(updated)
    }

    pub fn remove(&self, code: ProductCode) -> LedgerResult<Product> {
        let removed = self.mutate(|products| {
            let idx = position_by_id(products.as_slice(), code).ok_or(LedgerError::NotFound(code))?;
            Ok(products.remove(idx))
        })?;

        tracing::info!(code = %code, "product removed");
        Ok(removed)
    }

    /// Take `quantity` units out of stock.
    pub fn decrement_stock(&self, code: ProductCode, quantity: u32) -> LedgerResult<Product> {
        let updated = self.mutate(|products| {
            take_all(products, &[(code, quantity)])?;
            Ok(find_mut(products, code)?.clone())
        })?;

        tracing::info!(code = %code, quantity, remaining = updated.stock_quantity(), "stock decremented");
        Ok(updated)
    }

    /// Take stock for several lines at once, all or nothing.
    ///
    /// Quantities for the same code are summed before the availability check,
    /// so two lines that each fit on their own can still be rejected together.
    /// If any line fails, no stock changes and nothing is written.
    pub fn decrement_stock_many(&self, lines: &[(ProductCode, u32)]) -> LedgerResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        self.mutate(|products| take_all(products, lines))?;

        tracing::info!(lines = lines.len(), "stock decremented for batch");
        Ok(())
    }

    /// Take stock for `lines` and run `then` while the catalog is still locked.
    ///
    /// The decrement is checked and written exactly like
    /// [`Catalog::decrement_stock_many`]. `then` runs after that write but
    /// before the lock is released, so no other catalog mutation can land in
    /// between. If `then` fails, the pre-decrement product set is written back
    /// and nothing is published.
    pub fn decrement_stock_then<R>(
        &self,
        lines: &[(ProductCode, u32)],
        then: impl FnOnce() -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        let mut current = self
            .products
            .write()
            .map_err(|_| LedgerError::io("catalog lock poisoned"))?;

        let mut next = current.clone();
        take_all(&mut next, lines)?;

        if let Err(e) = self.store.save(&next) {
            tracing::error!(error = %e, "failed to persist product store");
            return Err(e.into());
        }

        match then() {
            Ok(out) => {
                *current = next;
                tracing::info!(lines = lines.len(), "stock decremented for batch");
                Ok(out)
            }
            Err(e) => {
                if let Err(undo) = self.store.save(&current) {
                    // The store now holds the decremented set; keep memory in step with it.
                    tracing::error!(error = %undo, "failed to restore product store");
                    *current = next;
                } else {
                    tracing::warn!(error = %e, "stock decrement rolled back");
                }
                Err(e)
            }
        }
    }

    /// Put `quantity` units back into stock.
    pub fn restock(&self, code: ProductCode, quantity: u32) -> LedgerResult<Product> {
        let updated = self.mutate(|products| {
            give_all(products, &[(code, quantity)])?;
            Ok(find_mut(products, code)?.clone())
        })?;

        tracing::info!(code = %code, quantity, stock = updated.stock_quantity(), "stock replenished");
        Ok(updated)
    }

    /// Batch form of [`Catalog::restock`], all or nothing.
    pub fn restock_many(&self, lines: &[(ProductCode, u32)]) -> LedgerResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        self.mutate(|products| give_all(products, lines))?;

        tracing::info!(lines = lines.len(), "stock replenished for batch");
        Ok(())
    }

    /// Products at or below their reorder threshold, in insertion order.
    pub fn low_stock(&self) -> LedgerResult<Vec<Product>> {
        Ok(self
            .read()?
            .iter()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect())
    }
}

fn find_mut(products: &mut [Product], code: ProductCode) -> LedgerResult<&mut Product> {
    find_by_id_mut(products, code).ok_or(LedgerError::NotFound(code))
}

fn ensure_positive(quantity: u32) -> LedgerResult<()> {
    if quantity == 0 {
        return Err(LedgerError::invalid_input("quantity must be positive"));
    }
    Ok(())
}

/// Sum quantities per code, keeping first-seen order.
fn aggregate(lines: &[(ProductCode, u32)]) -> LedgerResult<Vec<(ProductCode, u64)>> {
    let mut totals: Vec<(ProductCode, u64)> = Vec::with_capacity(lines.len());
    for &(code, quantity) in lines {
        ensure_positive(quantity)?;
        match totals.iter_mut().find(|(c, _)| *c == code) {
            Some((_, total)) => *total += u64::from(quantity),
            None => totals.push((code, u64::from(quantity))),
        }
    }
    Ok(totals)
}

fn take_all(products: &mut [Product], lines: &[(ProductCode, u32)]) -> LedgerResult<()> {
    let totals = aggregate(lines)?;

    // Check every line before touching any of them.
    for &(code, total) in &totals {
        let product = find_by_id(products, code).ok_or(LedgerError::NotFound(code))?;
        if !product.has_stock_for(total) {
            tracing::warn!(code = %code, requested = total, available = product.stock_quantity(), "insufficient stock");
            return Err(LedgerError::InsufficientStock {
                code,
                requested: total,
                available: product.stock_quantity(),
            });
        }
    }

    for (code, total) in totals {
        find_mut(products, code)?.take_stock(total)?;
    }
    Ok(())
}

fn give_all(products: &mut [Product], lines: &[(ProductCode, u32)]) -> LedgerResult<()> {
    for &(code, quantity) in lines {
        ensure_positive(quantity)?;
        find_mut(products, code)?.add_stock(quantity)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use stockledger_core::ErrorKind;
    use stockledger_infra::InMemoryStore;

    fn code(n: u32) -> ProductCode {
        ProductCode::new(n)
    }

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn test_product(n: u32, name: &str, stock: u32, threshold: u32) -> NewProduct {
        NewProduct::new(code(n), name, price("2.50")).with_stock(stock, threshold)
    }

    fn test_catalog() -> (Catalog<Arc<InMemoryStore<Product>>>, Arc<InMemoryStore<Product>>) {
        let store = Arc::new(InMemoryStore::new());
        let catalog = Catalog::load(store.clone()).unwrap();
        (catalog, store)
    }

    #[test]
    fn add_persists_and_lists_in_insertion_order() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(3, "Beans", 5, 1)).unwrap();
        catalog.add(test_product(1, "Rice", 5, 1)).unwrap();

        let codes: Vec<_> = catalog.list().unwrap().iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec![code(3), code(1)]);
        assert_eq!(store.records(), catalog.list().unwrap());
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn add_rejects_duplicate_code_without_mutation() {
        let (catalog, store) = test_catalog();
        let original = catalog.add(test_product(1, "Rice", 10, 2)).unwrap();

        let err = catalog.add(test_product(1, "Other", 99, 0)).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateKey(code(1)));
        assert_eq!(catalog.list().unwrap(), vec![original]);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn add_rejects_invalid_input() {
        let (catalog, _) = test_catalog();
        let mut bad = test_product(1, "Rice", 1, 0);
        bad.unit_price = Decimal::ZERO;
        assert_eq!(catalog.add(bad).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert!(catalog.is_empty().unwrap());
    }

    #[test]
    fn find_by_code_and_name() {
        let (catalog, _) = test_catalog();
        catalog.add(test_product(1, "White Rice", 1, 0)).unwrap();
        catalog.add(test_product(2, "Black beans", 1, 0)).unwrap();
        catalog.add(test_product(3, "RICE flour", 1, 0)).unwrap();

        assert_eq!(catalog.find_by_code(code(2)).unwrap().unwrap().name(), "Black beans");
        assert!(catalog.find_by_code(code(9)).unwrap().is_none());

        let names: Vec<_> = catalog
            .find_by_name("rIcE")
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["White Rice", "RICE flour"]);
        assert!(catalog.find_by_name("milk").unwrap().is_empty());
        assert_eq!(catalog.find_by_name("").unwrap().len(), 3);
    }

    #[test]
    fn update_overwrites_mutable_fields_only() {
        let (catalog, store) = test_catalog();
        let before = catalog.add(test_product(1, "Rice", 10, 2)).unwrap();

        let update = ProductUpdate {
            name: "Jasmine rice".to_string(),
            description: Some("1kg".to_string()),
            unit_price: price("7.10"),
            stock_quantity: 4,
            reorder_threshold: 5,
        };
        let after = catalog.update(code(1), update).unwrap();

        assert_eq!(after.code(), before.code());
        assert_eq!(after.created_at(), before.created_at());
        assert_eq!(after.description(), Some("1kg"));
        assert_eq!(after.stock_quantity(), 4);
        assert_eq!(store.records(), vec![after]);
    }

    #[test]
    fn update_and_remove_unknown_code_fail_with_not_found() {
        let (catalog, store) = test_catalog();
        let update = ProductUpdate {
            name: "x".to_string(),
            description: None,
            unit_price: price("1"),
            stock_quantity: 0,
            reorder_threshold: 0,
        };
        assert_eq!(catalog.update(code(5), update).unwrap_err(), LedgerError::NotFound(code(5)));
        assert_eq!(catalog.remove(code(5)).unwrap_err(), LedgerError::NotFound(code(5)));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn remove_deletes_and_persists() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 1, 0)).unwrap();
        catalog.add(test_product(2, "Beans", 1, 0)).unwrap();

        let removed = catalog.remove(code(1)).unwrap();
        assert_eq!(removed.code(), code(1));
        assert_eq!(catalog.len().unwrap(), 1);
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn rice_low_stock_scenario() {
        let (catalog, _) = test_catalog();
        catalog
            .add(NewProduct::new(code(1), "Rice", price("5.00")).with_stock(10, 2))
            .unwrap();
        assert!(catalog.low_stock().unwrap().is_empty());

        let rice = catalog.decrement_stock(code(1), 9).unwrap();
        assert_eq!(rice.stock_quantity(), 1);

        let low: Vec<_> = catalog.low_stock().unwrap().iter().map(|p| p.code()).collect();
        assert_eq!(low, vec![code(1)]);
    }

    #[test]
    fn decrement_beyond_stock_leaves_stock_unchanged() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 3, 0)).unwrap();

        let err = catalog.decrement_stock(code(1), 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 3);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn decrement_rejects_zero_and_unknown() {
        let (catalog, _) = test_catalog();
        catalog.add(test_product(1, "Rice", 3, 0)).unwrap();
        assert_eq!(catalog.decrement_stock(code(1), 0).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(catalog.decrement_stock(code(2), 1).unwrap_err(), LedgerError::NotFound(code(2)));
    }

    #[test]
    fn decrement_many_is_all_or_nothing() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 5, 0)).unwrap();
        catalog.add(test_product(2, "Beans", 1, 0)).unwrap();

        let err = catalog
            .decrement_stock_many(&[(code(1), 2), (code(2), 2)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 5);
        assert_eq!(store.save_count(), 2);

        catalog
            .decrement_stock_many(&[(code(1), 2), (code(2), 1)])
            .unwrap();
        let stocks: Vec<_> = catalog.list().unwrap().iter().map(|p| p.stock_quantity()).collect();
        assert_eq!(stocks, vec![3, 0]);
        assert_eq!(store.save_count(), 3);
    }

    #[test]
    fn decrement_many_sums_repeated_codes() {
        let (catalog, _) = test_catalog();
        catalog.add(test_product(1, "Rice", 5, 0)).unwrap();

        let err = catalog
            .decrement_stock_many(&[(code(1), 3), (code(1), 3)])
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                code: code(1),
                requested: 6,
                available: 5,
            }
        );
        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 5);
    }

    #[test]
    fn restock_adds_units() {
        let (catalog, _) = test_catalog();
        catalog.add(test_product(1, "Rice", 1, 0)).unwrap();
        assert_eq!(catalog.restock(code(1), 4).unwrap().stock_quantity(), 5);
        catalog.restock_many(&[(code(1), 1), (code(1), 1)]).unwrap();
        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 7);
        assert_eq!(catalog.restock(code(1), 0).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn failed_write_keeps_memory_in_step_with_store() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 10, 2)).unwrap();
        let snapshot = catalog.list().unwrap();

        store.fail_writes(true);
        assert_eq!(catalog.add(test_product(2, "Beans", 1, 0)).unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(catalog.decrement_stock(code(1), 1).unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(catalog.remove(code(1)).unwrap_err().kind(), ErrorKind::Io);

        assert_eq!(catalog.list().unwrap(), snapshot);
        assert_eq!(store.records(), snapshot);
    }

    #[test]
    fn load_reads_existing_records() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 10, 2)).unwrap();
        catalog.add(test_product(2, "Beans", 4, 1)).unwrap();

        let reopened = Catalog::load(store.clone()).unwrap();
        assert_eq!(reopened.list().unwrap(), catalog.list().unwrap());
    }

    #[test]
    fn load_rejects_duplicate_codes_in_store() {
        let (catalog, _) = test_catalog();
        let rice = catalog.add(test_product(1, "Rice", 10, 2)).unwrap();

        let corrupt = InMemoryStore::with_records(vec![rice.clone(), rice]);
        assert_eq!(Catalog::load(corrupt).unwrap_err().kind(), ErrorKind::Io);
    }

    #[test]
    fn load_rejects_products_that_fail_validation() {
        let (catalog, _) = test_catalog();
        let rice = catalog.add(test_product(1, "Rice", 10, 2)).unwrap();

        for (field, value) in [("unit_price", "0"), ("name", " ")] {
            let mut json = serde_json::to_value(&rice).unwrap();
            json[field] = value.into();
            let edited: Product = serde_json::from_value(json).unwrap();

            let err = Catalog::load(InMemoryStore::with_records(vec![edited])).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Io, "{field} = {value:?}");
        }
    }

    #[test]
    fn decrement_stock_then_publishes_once_follow_up_succeeds() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 5, 1)).unwrap();

        let seen = catalog
            .decrement_stock_then(&[(code(1), 2)], || Ok(store.records()[0].stock_quantity()))
            .unwrap();

        // The follow-up runs after the stock write.
        assert_eq!(seen, 3);
        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 3);
    }

    #[test]
    fn decrement_stock_then_writes_back_when_follow_up_fails() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 5, 1)).unwrap();
        let snapshot = catalog.list().unwrap();
        let saves_before = store.save_count();

        let err = catalog
            .decrement_stock_then(&[(code(1), 2)], || -> LedgerResult<()> {
                Err(LedgerError::io("history unavailable"))
            })
            .unwrap_err();

        assert_eq!(err, LedgerError::io("history unavailable"));
        assert_eq!(catalog.list().unwrap(), snapshot);
        assert_eq!(store.records(), snapshot);
        assert_eq!(store.save_count(), saves_before + 2);
    }

    #[test]
    fn decrement_stock_then_skips_follow_up_when_stock_is_short() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 1, 0)).unwrap();

        let mut ran = false;
        let err = catalog
            .decrement_stock_then(&[(code(1), 2)], || {
                ran = true;
                Ok(())
            })
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert!(!ran);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn decrement_stock_then_holds_the_lock_until_done() {
        let (catalog, store) = test_catalog();
        catalog.add(test_product(1, "Rice", 5, 1)).unwrap();
        let catalog = Arc::new(catalog);

        let mut edit = ProductUpdate::from(&catalog.find_by_code(code(1)).unwrap().unwrap());
        edit.stock_quantity = 10;

        let (tx, rx) = std::sync::mpsc::channel();
        let mut editor = None;
        catalog
            .decrement_stock_then(&[(code(1), 2)], || {
                let shared = catalog.clone();
                editor = Some(std::thread::spawn(move || {
                    let result = shared.update(code(1), edit);
                    tx.send(()).unwrap();
                    result
                }));
                // The edit cannot start while the batch is in flight.
                assert!(rx.recv_timeout(std::time::Duration::from_millis(100)).is_err());
                Err::<(), _>(LedgerError::io("history unavailable"))
            })
            .unwrap_err();

        editor.unwrap().join().unwrap().unwrap();
        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 10);
        assert_eq!(store.records()[0].stock_quantity(), 10);
    }

    #[test]
    fn catalog_is_shareable_across_threads() {
        let (catalog, _) = test_catalog();
        catalog.add(test_product(1, "Rice", 100, 0)).unwrap();
        let catalog = Arc::new(catalog);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = catalog.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        catalog.decrement_stock(code(1), 1).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity(), 0);
        assert_eq!(catalog.decrement_stock(code(1), 1).unwrap_err().kind(), ErrorKind::InsufficientStock);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: every distinct-code add is listed and retrievable.
            #[test]
            fn distinct_adds_are_listed_and_retrievable(
                codes in proptest::collection::hash_set(0u32..10_000, 0..30)
            ) {
                let (catalog, _) = test_catalog();
                let codes: Vec<u32> = codes.into_iter().collect();
                for &n in &codes {
                    catalog.add(test_product(n, "Item", n % 50, 5)).unwrap();
                }

                let listed: Vec<u32> = catalog.list().unwrap().iter().map(|p| p.code().get()).collect();
                prop_assert_eq!(&listed, &codes);
                for &n in &codes {
                    prop_assert!(catalog.find_by_code(code(n)).unwrap().is_some());
                }
            }

            /// Property: a duplicate add never mutates state.
            #[test]
            fn duplicate_add_never_mutates(stock in 0u32..1000, other_stock in 0u32..1000) {
                let (catalog, store) = test_catalog();
                catalog.add(test_product(1, "Rice", stock, 0)).unwrap();
                let before = catalog.list().unwrap();

                let err = catalog.add(test_product(1, "Other", other_stock, 0)).unwrap_err();
                prop_assert_eq!(err, LedgerError::DuplicateKey(code(1)));
                prop_assert_eq!(catalog.list().unwrap(), before.clone());
                prop_assert_eq!(store.records(), before);
            }

            /// Property: decrement subtracts exactly `q` or fails leaving stock unchanged.
            #[test]
            fn decrement_is_exact_or_rejected(stock in 0u32..500, q in 1u32..600) {
                let (catalog, _) = test_catalog();
                catalog.add(test_product(1, "Rice", stock, 0)).unwrap();

                let result = catalog.decrement_stock(code(1), q);
                let after = catalog.find_by_code(code(1)).unwrap().unwrap().stock_quantity();
                if q > stock {
                    prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InsufficientStock);
                    prop_assert_eq!(after, stock);
                } else {
                    prop_assert!(result.is_ok());
                    prop_assert_eq!(after, stock - q);
                }
            }
        }
    }
}
