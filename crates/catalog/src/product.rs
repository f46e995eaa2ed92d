use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, LedgerError, LedgerResult, ProductCode};

/// A sellable product and its current stock level.
///
/// `code` and `created_at` are fixed at creation; everything else is replaced
/// wholesale through [`ProductUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    code: ProductCode,
    name: String,
    #[serde(default)]
    description: Option<String>,
    unit_price: Decimal,
    stock_quantity: u32,
    reorder_threshold: u32,
    created_at: DateTime<Utc>,
}

/// Attributes for a product that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub code: ProductCode,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub stock_quantity: u32,
    pub reorder_threshold: u32,
}

/// Replacement values for a product's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub stock_quantity: u32,
    pub reorder_threshold: u32,
}

impl NewProduct {
    pub fn new(code: ProductCode, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            code,
            name: name.into(),
            description: None,
            unit_price,
            stock_quantity: 0,
            reorder_threshold: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stock(mut self, stock_quantity: u32, reorder_threshold: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self.reorder_threshold = reorder_threshold;
        self
    }
}

impl From<&Product> for ProductUpdate {
    /// Start an update from the product's current values.
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: product.unit_price,
            stock_quantity: product.stock_quantity,
            reorder_threshold: product.reorder_threshold,
        }
    }
}

/// Highest accepted unit price. Keeps `price * quantity` and sale totals far
/// inside `Decimal`'s range for any `u32` quantity.
pub const MAX_UNIT_PRICE: u32 = 1_000_000_000;

/// Positive and no higher than [`MAX_UNIT_PRICE`].
pub fn validate_unit_price(unit_price: Decimal) -> LedgerResult<()> {
    if unit_price <= Decimal::ZERO {
        return Err(LedgerError::invalid_input("unit_price must be positive"));
    }
    if unit_price > Decimal::from(MAX_UNIT_PRICE) {
        return Err(LedgerError::invalid_input(format!(
            "unit_price cannot exceed {MAX_UNIT_PRICE}"
        )));
    }
    Ok(())
}

fn validate_attributes(name: &str, unit_price: Decimal) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::invalid_input("name cannot be empty"));
    }
    validate_unit_price(unit_price)
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

impl Product {
    /// Validate `new` and stamp it with its creation time.
    pub fn create(new: NewProduct, created_at: DateTime<Utc>) -> LedgerResult<Self> {
        validate_attributes(&new.name, new.unit_price)?;

        Ok(Self {
            code: new.code,
            name: new.name.trim().to_string(),
            description: normalize_description(new.description),
            unit_price: new.unit_price,
            stock_quantity: new.stock_quantity,
            reorder_threshold: new.reorder_threshold,
            created_at,
        })
    }

    pub fn code(&self) -> ProductCode {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    pub fn reorder_threshold(&self) -> u32 {
        self.reorder_threshold
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// At or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.reorder_threshold
    }

    pub fn has_stock_for(&self, quantity: u64) -> bool {
        quantity <= u64::from(self.stock_quantity)
    }

    /// Case-insensitive substring match on the name. `needle` must already be lowercase.
    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    pub(crate) fn apply_update(&mut self, update: ProductUpdate) -> LedgerResult<()> {
        validate_attributes(&update.name, update.unit_price)?;

        self.name = update.name.trim().to_string();
        self.description = normalize_description(update.description);
        self.unit_price = update.unit_price;
        self.stock_quantity = update.stock_quantity;
        self.reorder_threshold = update.reorder_threshold;
        Ok(())
    }

    /// Re-check a product read back from storage.
    pub(crate) fn validate_stored(&self) -> LedgerResult<()> {
        validate_attributes(&self.name, self.unit_price)
    }

    pub(crate) fn take_stock(&mut self, quantity: u64) -> LedgerResult<()> {
        if !self.has_stock_for(quantity) {
            return Err(LedgerError::InsufficientStock {
                code: self.code,
                requested: quantity,
                available: self.stock_quantity,
            });
        }
        // Bounded by stock_quantity, so the narrowing cannot truncate.
        self.stock_quantity -= quantity as u32;
        Ok(())
    }

    pub(crate) fn add_stock(&mut self, quantity: u32) -> LedgerResult<()> {
        self.stock_quantity = self
            .stock_quantity
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::invalid_input("stock quantity overflow"))?;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductCode;

    fn id(&self) -> Self::Id {
        self.code
    }
}
