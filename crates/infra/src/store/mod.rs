//! Inventory store boundary.
//!
//! The store exclusively owns the persisted products and sales. Callers only
//! ever receive owned snapshots (`Product`, `Sale`), never live references into
//! storage.
//!
//! ## Implementation Requirements
//!
//! Implementations must:
//! - run every mutation atomically (all fields written or none)
//! - serialize restocks and sales so that read-check-write sequences never
//!   interleave (no lost updates, no overselling)
//! - reject non-positive amounts even if the caller already validated them
//! - return products in SKU order

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfwise_core::{DomainError, Sku};
use shelfwise_inventory::{Product, Sale, SaleOutcome};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryInventoryStore;
pub use sqlite::SqliteInventoryStore;

/// Result type of store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error: a domain failure, or the storage engine itself failing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::NotFound(_)))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::Conflict(_)))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::Validation(_)))
    }
}

/// Whether `add_product` created a row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddOutcome {
    Inserted,
    Replaced,
}

/// Durable, consistent bookkeeping of products and sales.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert a product keyed by SKU. Duplicate SKUs follow the configured
    /// `DuplicateSkuPolicy`.
    async fn add_product(&self, product: Product) -> StoreResult<AddOutcome>;

    /// Increase on-hand quantity by `amount` and return the updated product.
    async fn restock(&self, sku: &Sku, amount: u32) -> StoreResult<Product>;

    /// Sell `quantity` units: decrement stock and append one sale record, or
    /// report insufficient stock without writing anything.
    async fn record_sale(&self, sku: &Sku, quantity: u32) -> StoreResult<SaleOutcome>;

    async fn get_product(&self, sku: &Sku) -> StoreResult<Option<Product>>;

    /// Snapshot of every product, in SKU order.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// Products at or below their stored reorder point, in SKU order.
    async fn low_stock_items(&self) -> StoreResult<Vec<Product>>;

    /// The sales log, oldest first.
    async fn list_sales(&self) -> StoreResult<Vec<Sale>>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn add_product(&self, product: Product) -> StoreResult<AddOutcome> {
        (**self).add_product(product).await
    }

    async fn restock(&self, sku: &Sku, amount: u32) -> StoreResult<Product> {
        (**self).restock(sku, amount).await
    }

    async fn record_sale(&self, sku: &Sku, quantity: u32) -> StoreResult<SaleOutcome> {
        (**self).record_sale(sku, quantity).await
    }

    async fn get_product(&self, sku: &Sku) -> StoreResult<Option<Product>> {
        (**self).get_product(sku).await
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn low_stock_items(&self) -> StoreResult<Vec<Product>> {
        (**self).low_stock_items().await
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        (**self).list_sales().await
    }
}

/// Reject zero amounts before touching storage.
pub(crate) fn ensure_positive(what: &str, amount: u32) -> StoreResult<()> {
    if amount == 0 {
        return Err(DomainError::validation(format!("{what} must be a positive integer")).into());
    }
    Ok(())
}

pub(crate) fn unknown_sku(sku: &Sku) -> StoreError {
    DomainError::not_found(format!("no product with sku {sku}")).into()
}

pub(crate) fn duplicate_sku(sku: &Sku) -> StoreError {
    DomainError::conflict(format!("product with sku {sku} already exists")).into()
}
