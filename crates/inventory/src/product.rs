use serde::{Deserialize, Serialize};

use shelfwise_core::{DomainError, DomainResult, Sku};

use crate::sale::SaleDecision;

/// Lead time applied when a product is created without one.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

/// Reorder point applied when a product is created without one.
pub const DEFAULT_REORDER_POINT: u32 = 10;

/// Annual demand estimate applied when a product is created without one.
pub const DEFAULT_ANNUAL_DEMAND: u32 = 0;

/// A stocked product, keyed by SKU.
///
/// This is a plain record: stores hand out owned copies, never live views into
/// storage. `quantity` is unsigned, so stock cannot be represented as negative;
/// the decision methods below keep every transition within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub size: String,
    pub color: String,
    /// Unit selling price.
    pub price: f64,
    /// Unit purchase cost (input to the EOQ holding cost).
    pub cost: f64,
    /// On-hand quantity.
    pub quantity: u32,
    pub lead_time_days: u32,
    /// Stored reorder threshold used by low-stock queries.
    pub reorder_point: u32,
    /// Static demand estimate; never derived from the sales log.
    pub estimated_annual_demand: u32,
}

impl Product {
    /// Create a product with default lead time, reorder point and demand.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sku: Sku,
        name: impl Into<String>,
        category: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
        price: f64,
        cost: f64,
        quantity: u32,
    ) -> Self {
        Self {
            sku,
            name: name.into(),
            category: category.into(),
            size: size.into(),
            color: color.into(),
            price,
            cost,
            quantity,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            reorder_point: DEFAULT_REORDER_POINT,
            estimated_annual_demand: DEFAULT_ANNUAL_DEMAND,
        }
    }

    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_reorder_point(mut self, reorder_point: u32) -> Self {
        self.reorder_point = reorder_point;
        self
    }

    pub fn with_annual_demand(mut self, demand: u32) -> Self {
        self.estimated_annual_demand = demand;
        self
    }

    /// Check the record before it is written.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation(format!(
                "price must be a non-negative amount (got {})",
                self.price
            )));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(DomainError::validation(format!(
                "cost must be a non-negative amount (got {})",
                self.cost
            )));
        }
        if self.lead_time_days == 0 {
            return Err(DomainError::validation("lead time must be at least one day"));
        }
        Ok(())
    }

    /// At or below the stored reorder point.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_point
    }

    /// Decide the quantity after adding `amount` units.
    ///
    /// Does not mutate; callers persist the returned quantity.
    pub fn restock(&self, amount: u32) -> DomainResult<u32> {
        if amount == 0 {
            return Err(DomainError::validation("restock amount must be positive"));
        }
        self.quantity.checked_add(amount).ok_or_else(|| {
            DomainError::invariant(format!(
                "restocking {} by {amount} overflows the stock counter",
                self.sku
            ))
        })
    }

    /// Decide whether `quantity` units can be sold from current stock.
    ///
    /// Revenue is snapshotted as the current unit price times `quantity`.
    pub fn decide_sale(&self, quantity: u32) -> DomainResult<SaleDecision> {
        if quantity == 0 {
            return Err(DomainError::validation("sale quantity must be positive"));
        }
        if quantity > self.quantity {
            return Ok(SaleDecision::Insufficient {
                available: self.quantity,
            });
        }
        Ok(SaleDecision::Fulfil {
            remaining: self.quantity - quantity,
            revenue: self.price * f64::from(quantity),
        })
    }
}
