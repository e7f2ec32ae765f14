//! EOQ and reorder point formulas.

use serde::{Deserialize, Serialize};

use shelfwise_core::{DomainError, DomainResult};
use shelfwise_inventory::Product;

/// Fixed cost of placing one replenishment order.
pub const DEFAULT_ORDER_COST: f64 = 50.0;

/// Fraction of unit cost charged per year to hold one unit.
pub const DEFAULT_HOLDING_COST_PERCENT: f64 = 0.20;

const DAYS_PER_YEAR: f64 = 365.0;

/// Economic Order Quantity: `round(sqrt(2 * D * S / (C * H)))`.
///
/// - `D` annual demand in units
/// - `S` cost per order
/// - `C` unit cost, `H` annual holding fraction
///
/// Degenerate inputs (no demand, no unit cost, no holding cost) yield `0`
/// rather than an error. Rounding is half away from zero.
pub fn economic_order_quantity(
    annual_demand: u32,
    unit_cost: f64,
    order_cost: f64,
    holding_cost_percent: f64,
) -> u32 {
    if annual_demand == 0 || unit_cost.is_nan() || unit_cost <= 0.0 {
        return 0;
    }
    if order_cost.is_nan() || order_cost <= 0.0 {
        return 0;
    }
    let holding_cost_per_unit = unit_cost * holding_cost_percent;
    if !holding_cost_per_unit.is_finite() || holding_cost_per_unit <= 0.0 {
        return 0;
    }

    let eoq = ((2.0 * f64::from(annual_demand) * order_cost) / holding_cost_per_unit).sqrt();
    if !eoq.is_finite() {
        return 0;
    }
    // `as` saturates at u32::MAX.
    eoq.round() as u32
}

/// Reorder point: average daily demand times lead time, rounded up.
///
/// No safety stock term. Returns `0` when there is no demand.
pub fn reorder_point(annual_demand: u32, lead_time_days: u32) -> u32 {
    if annual_demand == 0 {
        return 0;
    }
    let daily_demand = f64::from(annual_demand) / DAYS_PER_YEAR;
    (daily_demand * f64::from(lead_time_days)).ceil() as u32
}

/// Cost parameters of the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub order_cost_per_order: f64,
    pub holding_cost_percent: f64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            order_cost_per_order: DEFAULT_ORDER_COST,
            holding_cost_percent: DEFAULT_HOLDING_COST_PERCENT,
        }
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if !self.order_cost_per_order.is_finite() || self.order_cost_per_order < 0.0 {
            return Err(DomainError::validation(format!(
                "order cost must be a non-negative amount (got {})",
                self.order_cost_per_order
            )));
        }
        if !self.holding_cost_percent.is_finite() || self.holding_cost_percent <= 0.0 {
            return Err(DomainError::validation(format!(
                "holding cost percent must be positive (got {})",
                self.holding_cost_percent
            )));
        }
        Ok(())
    }
}

/// Calculator bound to one cost configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderQuantityCalculator {
    config: CalculatorConfig,
}

impl OrderQuantityCalculator {
    pub fn new(config: CalculatorConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn eoq(&self, annual_demand: u32, unit_cost: f64) -> u32 {
        economic_order_quantity(
            annual_demand,
            unit_cost,
            self.config.order_cost_per_order,
            self.config.holding_cost_percent,
        )
    }

    pub fn reorder_point(&self, annual_demand: u32, lead_time_days: u32) -> u32 {
        reorder_point(annual_demand, lead_time_days)
    }

    pub fn eoq_for(&self, product: &Product) -> u32 {
        self.eoq(product.estimated_annual_demand, product.cost)
    }

    pub fn reorder_point_for(&self, product: &Product) -> u32 {
        self.reorder_point(product.estimated_annual_demand, product.lead_time_days)
    }
}
