use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_catalog::{Product, validate_unit_price};
use stockledger_core::{Entity, LedgerError, LedgerResult, ProductCode, SaleId};

/// Sale status lifecycle.
///
/// `Draft → Committed` or `Draft → Abandoned`; both targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Draft,
    Committed,
    Abandoned,
}

impl SaleStatus {
    /// Only committed sales are ever written to the sale store.
    fn stored() -> Self {
        SaleStatus::Committed
    }
}

/// Sale line: a product snapshot taken when the line was added.
///
/// Name and price are copied so later catalog edits (or removal of the
/// product) do not rewrite past sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    product_code: ProductCode,
    product_name: String,
    quantity: u32,
    unit_price: Decimal,
}

impl LineItem {
    pub(crate) fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_code: product.code(),
            product_name: product.name().to_string(),
            quantity,
            unit_price: product.unit_price(),
        }
    }

    pub fn product_code(&self) -> ProductCode {
        self.product_code
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A sale transaction.
///
/// Persisted as `{ id, items, created_at }`; the total is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,
    items: Vec<LineItem>,
    created_at: DateTime<Utc>,
    #[serde(skip, default = "SaleStatus::stored")]
    status: SaleStatus,
}

impl Sale {
    pub(crate) fn draft(id: SaleId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            items: Vec::new(),
            created_at,
            status: SaleStatus::Draft,
        }
    }

    pub fn id(&self) -> SaleId {
        self.id
    }

    /// Lines in the order they were added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.status, SaleStatus::Draft)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines, not units.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Total units across all lines.
    pub fn units(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// `(code, quantity)` pairs for taking stock, one per line.
    pub(crate) fn stock_lines(&self) -> Vec<(ProductCode, u32)> {
        self.items
            .iter()
            .map(|i| (i.product_code, i.quantity))
            .collect()
    }

    /// Re-check a sale read back from storage: at least one line, every line
    /// with a positive quantity and an acceptable price.
    pub(crate) fn validate_stored(&self) -> LedgerResult<()> {
        if self.items.is_empty() {
            return Err(LedgerError::EmptySale(self.id));
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(LedgerError::invalid_input(format!(
                    "line for {} has zero quantity",
                    item.product_code
                )));
            }
            validate_unit_price(item.unit_price)?;
        }
        Ok(())
    }

    pub(crate) fn ensure_draft(&self) -> LedgerResult<()> {
        if !self.is_draft() {
            return Err(LedgerError::NotDraft(self.id));
        }
        Ok(())
    }

    pub(crate) fn push_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub(crate) fn set_status(&mut self, status: SaleStatus) {
        self.status = status;
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
