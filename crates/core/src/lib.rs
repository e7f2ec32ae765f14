//! `shelfwise-core`: shared building blocks.
//!
//! This crate contains **pure** primitives (no infrastructure concerns): the
//! identifier types and the error taxonomy used by the store and the calculator.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{SaleId, Sku};
