//! Read-only figures over committed sale history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stockledger_core::SaleId;

use crate::sale::Sale;

/// Headline of one committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentSale {
    pub id: SaleId,
    pub created_at: DateTime<Utc>,
    pub lines: usize,
    pub units: u64,
    pub total: Decimal,
}

impl From<&Sale> for RecentSale {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id(),
            created_at: sale.created_at(),
            lines: sale.item_count(),
            units: sale.units(),
            total: sale.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub sale_count: usize,
    pub revenue: Decimal,
    pub units_sold: u64,
    /// Newest first.
    pub recent: Vec<RecentSale>,
}

impl SalesSummary {
    pub fn from_sales(sales: &[Sale], recent: usize) -> Self {
        let mut newest: Vec<&Sale> = sales.iter().collect();
        newest.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        Self {
            sale_count: sales.len(),
            revenue: sales.iter().map(Sale::total).sum(),
            units_sold: sales.iter().map(Sale::units).sum(),
            recent: newest.into_iter().take(recent).map(RecentSale::from).collect(),
        }
    }
}
