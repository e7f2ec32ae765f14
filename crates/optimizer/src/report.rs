//! Reorder recommendations (the optimization report).
//!
//! Recommendations are derived on demand and never persisted.

use serde::{Deserialize, Serialize};

use shelfwise_core::Sku;
use shelfwise_inventory::Product;

use crate::calculator::OrderQuantityCalculator;

/// What to do about one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "quantity", rename_all = "snake_case")]
pub enum ReorderAction {
    Ok,
    /// Place an order for this many units (the EOQ).
    Order(u32),
}

impl core::fmt::Display for ReorderAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReorderAction::Ok => f.write_str("OK"),
            ReorderAction::Order(qty) => write!(f, "ORDER {qty}"),
        }
    }
}

/// One row of the optimization report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub sku: Sku,
    pub name: String,
    pub quantity: u32,
    pub annual_demand: u32,
    pub eoq: u32,
    /// Computed from demand and lead time, not the stored threshold.
    pub reorder_point: u32,
    pub action: ReorderAction,
}

impl Recommendation {
    pub fn needs_reorder(&self) -> bool {
        matches!(self.action, ReorderAction::Order(_))
    }
}

impl OrderQuantityCalculator {
    /// A product needs reordering when its on-hand quantity is at or below the
    /// computed reorder point; the suggested order size is the EOQ.
    pub fn recommend(&self, product: &Product) -> Recommendation {
        let eoq = self.eoq_for(product);
        let reorder_point = self.reorder_point_for(product);
        let action = if product.quantity <= reorder_point {
            ReorderAction::Order(eoq)
        } else {
            ReorderAction::Ok
        };

        Recommendation {
            sku: product.sku.clone(),
            name: product.name.clone(),
            quantity: product.quantity,
            annual_demand: product.estimated_annual_demand,
            eoq,
            reorder_point,
            action,
        }
    }

    /// One recommendation per product, in the order given.
    pub fn report(&self, products: &[Product]) -> Vec<Recommendation> {
        products.iter().map(|p| self.recommend(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CalculatorConfig;

    fn product(sku: &str, quantity: u32, demand: u32, lead: u32, cost: f64) -> Product {
        Product::new(
            Sku::parse(sku).unwrap(),
            "Item",
            "Casual Tops",
            "M",
            "Black",
            cost * 2.0,
            cost,
            quantity,
        )
        .with_lead_time_days(lead)
        .with_annual_demand(demand)
    }

    #[test]
    fn product_at_reorder_point_is_ordered() {
        let calc = OrderQuantityCalculator::default();
        // ROP = ceil(1200 / 365 * 7) = 24
        let rec = calc.recommend(&product("SL-SH-M-BLK", 24, 1200, 7, 10.0));
        assert_eq!(rec.reorder_point, 24);
        // sqrt(2 * 1200 * 50 / 2) = sqrt(60000) = 244.95
        assert_eq!(rec.eoq, 245);
        assert_eq!(rec.action, ReorderAction::Order(245));
        assert!(rec.needs_reorder());
    }

    #[test]
    fn product_above_reorder_point_is_ok() {
        let calc = OrderQuantityCalculator::default();
        let rec = calc.recommend(&product("SL-SH-M-BLK", 25, 1200, 7, 10.0));
        assert_eq!(rec.action, ReorderAction::Ok);
        assert!(!rec.needs_reorder());
    }

    #[test]
    fn zero_demand_with_empty_shelf_orders_zero() {
        // Both metrics degenerate to zero; 0 <= 0 still flags the product.
        let calc = OrderQuantityCalculator::default();
        let rec = calc.recommend(&product("JK-LT-L-BRN", 0, 0, 14, 80.0));
        assert_eq!(rec.reorder_point, 0);
        assert_eq!(rec.action, ReorderAction::Order(0));
    }

    #[test]
    fn report_preserves_input_order_and_config() {
        let calc = OrderQuantityCalculator::new(CalculatorConfig {
            order_cost_per_order: 100.0,
            holding_cost_percent: 0.25,
        })
        .unwrap();
        let products = vec![
            product("TS-SH-L-WHT", 100, 1000, 7, 8.0),
            product("HD-ZK-L-GRY", 1, 1000, 7, 8.0),
        ];

        let report = calc.report(&products);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].sku.as_str(), "TS-SH-L-WHT");
        assert_eq!(report[0].action, ReorderAction::Ok);
        assert_eq!(report[1].action, ReorderAction::Order(316));
    }

    #[test]
    fn action_renders_like_report_column() {
        assert_eq!(ReorderAction::Ok.to_string(), "OK");
        assert_eq!(ReorderAction::Order(158).to_string(), "ORDER 158");
    }
}
