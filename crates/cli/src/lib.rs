//! `shelfwise-cli`
//!
//! **Responsibility:** thin command-line presentation over the inventory store
//! and the order-quantity calculator.
//!
//! This crate parses and validates user input, formats output (currency to two
//! decimals), and maps errors to messages. It holds no business rules.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

pub use cli::{Cli, Command};
pub use config::AppConfig;
