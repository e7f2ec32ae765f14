use anyhow::Context;
use clap::Parser;

use shelfwise_cli::{AppConfig, Cli, commands};
use shelfwise_infra::SqliteInventoryStore;
use shelfwise_optimizer::OrderQuantityCalculator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;

    shelfwise_observability::init(config.log_format);

    let store = SqliteInventoryStore::connect(&config.store)
        .await
        .with_context(|| format!("failed to open inventory store at {}", config.store.database_url))?;
    let calculator = OrderQuantityCalculator::new(config.calculator)?;

    let mut stdout = std::io::stdout();
    let result = commands::run(&store, &calculator, cli.command, &mut stdout).await;

    store.close().await;
    result
}
