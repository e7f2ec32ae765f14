//! Inventory domain module.
//!
//! This crate contains the product and sale records shared by the store and the
//! calculator, and the stock rules every store backend applies (restock and sale
//! decisions), implemented purely as deterministic domain logic (no IO, no
//! storage).

pub mod product;
pub mod sale;

pub use product::{
    DEFAULT_ANNUAL_DEMAND, DEFAULT_LEAD_TIME_DAYS, DEFAULT_REORDER_POINT, Product,
};
pub use sale::{Sale, SaleDecision, SaleOutcome};
