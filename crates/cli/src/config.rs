//! Application configuration assembled from parsed command-line options.

use anyhow::Context;

use shelfwise_infra::StoreConfig;
use shelfwise_observability::LogFormat;
use shelfwise_optimizer::CalculatorConfig;

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub calculator: CalculatorConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Build and validate the configuration. Fails before any database is
    /// opened.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let store = StoreConfig {
            database_url: cli.database_url.clone(),
            max_connections: cli.max_connections,
            duplicate_policy: cli.duplicate_sku,
        };
        store.validate().context("invalid store configuration")?;

        let calculator = CalculatorConfig {
            order_cost_per_order: cli.order_cost,
            holding_cost_percent: cli.holding_cost_percent,
        };
        calculator
            .validate()
            .context("invalid calculator configuration")?;

        Ok(Self {
            store,
            calculator,
            log_format: cli.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use shelfwise_infra::DuplicateSkuPolicy;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["shelfwise"];
        argv.extend_from_slice(args);
        argv.push("list");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_produce_valid_config() {
        let config = AppConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config.store.database_url, "sqlite://inventory.db");
        assert_eq!(config.store.duplicate_policy, DuplicateSkuPolicy::Reject);
        assert_eq!(config.calculator, CalculatorConfig::default());
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn options_flow_into_config() {
        let config = AppConfig::from_cli(&parse(&[
            "--database-url",
            "sqlite::memory:",
            "--duplicate-sku",
            "upsert",
            "--holding-cost-percent",
            "0.25",
            "--log-format",
            "pretty",
        ]))
        .unwrap();
        assert!(config.store.is_in_memory());
        assert_eq!(config.store.duplicate_policy, DuplicateSkuPolicy::Upsert);
        assert_eq!(config.calculator.holding_cost_percent, 0.25);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_non_sqlite_url() {
        let err = AppConfig::from_cli(&parse(&["--database-url", "postgres://localhost/db"]))
            .unwrap_err();
        assert!(err.to_string().contains("store configuration"));
    }

    #[test]
    fn rejects_non_positive_holding_cost() {
        let err = AppConfig::from_cli(&parse(&["--holding-cost-percent", "0"])).unwrap_err();
        assert!(err.to_string().contains("calculator configuration"));
    }
}
