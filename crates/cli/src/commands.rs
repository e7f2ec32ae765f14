//! Command execution.
//!
//! Each command is one store call (plus, for `report`, one calculator pass)
//! followed by rendering. Output goes to the supplied writer.

use std::io::Write;

use anyhow::{Context, bail};
use serde::Serialize;

use shelfwise_infra::{AddOutcome, InventoryStore};
use shelfwise_inventory::SaleOutcome;
use shelfwise_optimizer::OrderQuantityCalculator;

use crate::cli::Command;
use crate::render;

pub async fn run<S, W>(
    store: &S,
    calculator: &OrderQuantityCalculator,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: InventoryStore + ?Sized,
    W: Write,
{
    match command {
        Command::Add(args) => {
            let product = args.into_product();
            let sku = product.sku.clone();
            let outcome = store
                .add_product(product)
                .await
                .with_context(|| format!("failed to add product {sku}"))?;
            match outcome {
                AddOutcome::Inserted => writeln!(out, "Added product {sku}")?,
                AddOutcome::Replaced => writeln!(out, "Replaced product {sku}")?,
            }
        }
        Command::List { json } => {
            let products = store.list_products().await?;
            if json {
                write_json(out, &products)?;
            } else {
                out.write_all(render::inventory_table(&products).as_bytes())?;
            }
        }
        Command::Restock { sku, amount } => {
            let product = store
                .restock(&sku, amount)
                .await
                .with_context(|| format!("failed to restock {sku}"))?;
            writeln!(
                out,
                "Restocked {sku} by {amount}; {} on hand",
                product.quantity
            )?;
        }
        Command::Sell { sku, quantity } => {
            let outcome = store
                .record_sale(&sku, quantity)
                .await
                .with_context(|| format!("failed to record sale of {sku}"))?;
            match outcome {
                SaleOutcome::Completed(sale) => writeln!(
                    out,
                    "Sale #{}: {} x {} for {}",
                    sale.id,
                    sale.quantity,
                    sale.sku,
                    render::money(sale.revenue)
                )?,
                SaleOutcome::InsufficientStock {
                    requested,
                    available,
                    ..
                } => {
                    bail!("insufficient stock for {sku}: requested {requested}, available {available}")
                }
            }
        }
        Command::LowStock { json } => {
            let products = store.low_stock_items().await?;
            if json {
                write_json(out, &products)?;
            } else {
                out.write_all(render::low_stock_table(&products).as_bytes())?;
            }
        }
        Command::Sales { json } => {
            let sales = store.list_sales().await?;
            if json {
                write_json(out, &sales)?;
            } else {
                out.write_all(render::sales_table(&sales).as_bytes())?;
            }
        }
        Command::Report { json } => {
            let products = store.list_products().await?;
            let report = calculator.report(&products);
            tracing::debug!(
                products = report.len(),
                reorders = report.iter().filter(|r| r.needs_reorder()).count(),
                "optimization report generated"
            );
            if json {
                write_json(out, &report)?;
            } else {
                out.write_all(render::report_table(&report).as_bytes())?;
            }
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
