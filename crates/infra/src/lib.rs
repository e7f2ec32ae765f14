//! Infrastructure layer: persistence of products and sales.

pub mod config;
pub mod store;


pub use config::{DuplicateSkuPolicy, StoreConfig};
pub use store::{
    AddOutcome, InMemoryInventoryStore, InventoryStore, SqliteInventoryStore, StoreError,
    StoreResult,
};
