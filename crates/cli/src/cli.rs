//! Command-line surface.
//!
//! Every option also reads a `SHELFWISE_*` environment variable, so the same
//! binary can be configured from flags or from the environment.

use clap::{Args, Parser, Subcommand};

use shelfwise_core::Sku;
use shelfwise_infra::DuplicateSkuPolicy;
use shelfwise_infra::config::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS};
use shelfwise_inventory::{
    DEFAULT_ANNUAL_DEMAND, DEFAULT_LEAD_TIME_DAYS, DEFAULT_REORDER_POINT, Product,
};
use shelfwise_observability::LogFormat;
use shelfwise_optimizer::{DEFAULT_HOLDING_COST_PERCENT, DEFAULT_ORDER_COST};

#[derive(Debug, Parser)]
#[command(
    name = "shelfwise",
    version,
    about = "Retail inventory, point of sale and reorder planning"
)]
pub struct Cli {
    /// SQLite database URL (`sqlite://file.db` or `sqlite::memory:`).
    #[arg(long, env = "SHELFWISE_DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    pub database_url: String,

    #[arg(long, env = "SHELFWISE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS, global = true)]
    pub max_connections: u32,

    /// What `add` does with an existing SKU: `reject` or `upsert`.
    #[arg(long, env = "SHELFWISE_DUPLICATE_SKU", default_value_t = DuplicateSkuPolicy::Reject, global = true)]
    pub duplicate_sku: DuplicateSkuPolicy,

    /// Fixed cost of one replenishment order.
    #[arg(long, env = "SHELFWISE_ORDER_COST", default_value_t = DEFAULT_ORDER_COST, global = true)]
    pub order_cost: f64,

    /// Fraction of unit cost charged per year to hold one unit.
    #[arg(long, env = "SHELFWISE_HOLDING_COST_PERCENT", default_value_t = DEFAULT_HOLDING_COST_PERCENT, global = true)]
    pub holding_cost_percent: f64,

    /// Log format: `json` or `pretty`.
    #[arg(long, env = "SHELFWISE_LOG_FORMAT", default_value = "json", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a product to the catalog.
    Add(AddArgs),

    /// Show current inventory.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add stock to an existing product.
    Restock {
        sku: Sku,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        amount: u32,
    },

    /// Record a point-of-sale transaction.
    Sell {
        sku: Sku,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },

    /// Show products at or below their reorder point.
    LowStock {
        #[arg(long)]
        json: bool,
    },

    /// Show the sales log.
    Sales {
        #[arg(long)]
        json: bool,
    },

    /// Show EOQ / reorder point recommendations for every product.
    Report {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    pub sku: Sku,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub size: String,

    #[arg(long)]
    pub color: String,

    /// Unit selling price.
    #[arg(long)]
    pub price: f64,

    /// Unit purchase cost.
    #[arg(long)]
    pub cost: f64,

    /// Initial on-hand quantity.
    #[arg(long, default_value_t = 0)]
    pub quantity: u32,

    #[arg(long, default_value_t = DEFAULT_LEAD_TIME_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    pub lead_time_days: u32,

    #[arg(long, default_value_t = DEFAULT_REORDER_POINT)]
    pub reorder_point: u32,

    #[arg(long, default_value_t = DEFAULT_ANNUAL_DEMAND)]
    pub annual_demand: u32,
}

impl AddArgs {
    pub fn into_product(self) -> Product {
        Product::new(
            self.sku,
            self.name,
            self.category,
            self.size,
            self.color,
            self.price,
            self.cost,
            self.quantity,
        )
        .with_lead_time_days(self.lead_time_days)
        .with_reorder_point(self.reorder_point)
        .with_annual_demand(self.annual_demand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_applies_catalog_defaults() {
        let cli = Cli::try_parse_from([
            "shelfwise", "add", "JK-LT-L-BRN", "--name", "Leather Jacket", "--category",
            "Outerwear", "--size", "L", "--color", "Brown", "--price", "150", "--cost", "80",
            "--quantity", "15", "--lead-time-days", "14",
        ])
        .unwrap();

        let Command::Add(args) = cli.command else {
            panic!("Expected add command");
        };
        let product = args.into_product();
        assert_eq!(product.sku.as_str(), "JK-LT-L-BRN");
        assert_eq!(product.lead_time_days, 14);
        assert_eq!(product.reorder_point, 10);
        assert_eq!(product.estimated_annual_demand, 0);
        assert_eq!(product.quantity, 15);
    }

    #[test]
    fn restock_rejects_non_positive_amounts() {
        assert!(Cli::try_parse_from(["shelfwise", "restock", "TS-SH-L-WHT", "0"]).is_err());
        assert!(Cli::try_parse_from(["shelfwise", "restock", "TS-SH-L-WHT", "-4"]).is_err());
        assert!(Cli::try_parse_from(["shelfwise", "restock", "TS-SH-L-WHT", "ten"]).is_err());
        assert!(Cli::try_parse_from(["shelfwise", "restock", "TS-SH-L-WHT", "10"]).is_ok());
    }

    #[test]
    fn sell_rejects_empty_sku() {
        assert!(Cli::try_parse_from(["shelfwise", "sell", " ", "1"]).is_err());
    }

    #[test]
    fn global_options_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shelfwise", "report", "--json", "--duplicate-sku", "upsert", "--order-cost", "75",
        ])
        .unwrap();
        assert_eq!(cli.duplicate_sku, DuplicateSkuPolicy::Upsert);
        assert_eq!(cli.order_cost, 75.0);
        assert!(matches!(cli.command, Command::Report { json: true }));
    }
}
