use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use shelfwise_core::{SaleId, Sku};
use shelfwise_inventory::{Product, Sale, SaleDecision, SaleOutcome};

use super::{
    AddOutcome, InventoryStore, StoreError, StoreResult, duplicate_sku, ensure_positive,
    unknown_sku,
};
use crate::config::DuplicateSkuPolicy;

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<Sku, Product>,
    sales: Vec<Sale>,
}

/// In-memory inventory store.
///
/// Intended for tests/dev. Each mutation holds the write guard for its whole
/// read-check-write sequence, so operations are serialized.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    state: RwLock<State>,
    duplicate_policy: DuplicateSkuPolicy,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(duplicate_policy: DuplicateSkuPolicy) -> Self {
        Self {
            state: RwLock::new(State::default()),
            duplicate_policy,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::storage("in-memory store lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::storage("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn add_product(&self, product: Product) -> StoreResult<AddOutcome> {
        product.validate()?;
        let mut state = self.write()?;

        let sku = product.sku.clone();
        let exists = state.products.contains_key(&sku);
        if exists && self.duplicate_policy == DuplicateSkuPolicy::Reject {
            return Err(duplicate_sku(&sku));
        }

        tracing::info!(%sku, replaced = exists, "product stored");
        state.products.insert(sku, product);
        Ok(if exists {
            AddOutcome::Replaced
        } else {
            AddOutcome::Inserted
        })
    }

    async fn restock(&self, sku: &Sku, amount: u32) -> StoreResult<Product> {
        ensure_positive("restock amount", amount)?;
        let mut state = self.write()?;

        let product = state.products.get_mut(sku).ok_or_else(|| unknown_sku(sku))?;
        product.quantity = product.restock(amount)?;

        tracing::info!(%sku, amount, quantity = product.quantity, "product restocked");
        Ok(product.clone())
    }

    async fn record_sale(&self, sku: &Sku, quantity: u32) -> StoreResult<SaleOutcome> {
        ensure_positive("sale quantity", quantity)?;
        let mut state = self.write()?;

        let product = state.products.get_mut(sku).ok_or_else(|| unknown_sku(sku))?;
        let revenue = match product.decide_sale(quantity)? {
            SaleDecision::Insufficient { available } => {
                tracing::warn!(%sku, requested = quantity, available, "insufficient stock");
                return Ok(SaleOutcome::InsufficientStock {
                    sku: sku.clone(),
                    requested: quantity,
                    available,
                });
            }
            SaleDecision::Fulfil { remaining, revenue } => {
                product.quantity = remaining;
                revenue
            }
        };

        let sale = Sale {
            id: SaleId::new(state.sales.len() as i64 + 1),
            date: Utc::now(),
            sku: sku.clone(),
            quantity,
            revenue,
        };
        state.sales.push(sale.clone());

        tracing::info!(%sku, quantity, revenue, sale_id = %sale.id, "sale recorded");
        Ok(SaleOutcome::Completed(sale))
    }

    async fn get_product(&self, sku: &Sku) -> StoreResult<Option<Product>> {
        Ok(self.read()?.products.get(sku).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn low_stock_items(&self) -> StoreResult<Vec<Product>> {
        Ok(self
            .read()?
            .products
            .values()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect())
    }

    async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        Ok(self.read()?.sales.clone())
    }
}
