//! Order-quantity calculator.
//!
//! Pure, side-effect-free reorder math over values read from the inventory
//! store: Economic Order Quantity (EOQ), Reorder Point (ROP) without safety
//! stock, and the per-product recommendation that combines them.

pub mod calculator;
pub mod report;

pub use calculator::{
    CalculatorConfig, DEFAULT_HOLDING_COST_PERCENT, DEFAULT_ORDER_COST, OrderQuantityCalculator,
    economic_order_quantity, reorder_point,
};
pub use report::{Recommendation, ReorderAction};
