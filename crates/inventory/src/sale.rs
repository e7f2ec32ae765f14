use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{SaleId, Sku};

/// A recorded point-of-sale transaction (append-only, never mutated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    /// Informational link to the sold product (not enforced as a foreign key).
    pub sku: Sku,
    pub quantity: u32,
    /// `unit price x quantity` at the time of sale, unrounded.
    pub revenue: f64,
}

/// Pure decision for a requested sale, computed from current stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaleDecision {
    /// Stock suffices: persist `remaining` and append a sale with `revenue`.
    Fulfil { remaining: u32, revenue: f64 },
    /// Requested more than `available`; nothing may be written.
    Insufficient { available: u32 },
}

/// Result of `record_sale` as seen by callers.
///
/// Insufficient stock is an expected business outcome, so it is a variant here
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaleOutcome {
    Completed(Sale),
    InsufficientStock {
        sku: Sku,
        requested: u32,
        available: u32,
    },
}

impl SaleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SaleOutcome::Completed(_))
    }

    pub fn sale(&self) -> Option<&Sale> {
        match self {
            SaleOutcome::Completed(sale) => Some(sale),
            SaleOutcome::InsufficientStock { .. } => None,
        }
    }
}
