//! Plain-text rendering of store snapshots and reports.

use shelfwise_inventory::{Product, Sale};
use shelfwise_optimizer::Recommendation;

/// Currency is always shown with two decimals.
pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub fn inventory_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products.\n".to_string();
    }

    let mut out = format!(
        "{:<15} {:<25} {:<15} {:<6} {:<10} {:>10} {:>10} {:>6} {:>6} {:>6} {:>8}\n",
        "SKU", "NAME", "CATEGORY", "SIZE", "COLOR", "PRICE", "COST", "QTY", "ROP", "LEAD", "DEMAND"
    );
    for p in products {
        out.push_str(&format!(
            "{:<15} {:<25} {:<15} {:<6} {:<10} {:>10} {:>10} {:>6} {:>6} {:>6} {:>8}\n",
            p.sku.as_str(),
            p.name,
            p.category,
            p.size,
            p.color,
            money(p.price),
            money(p.cost),
            p.quantity,
            p.reorder_point,
            p.lead_time_days,
            p.estimated_annual_demand,
        ));
    }
    out
}

pub fn low_stock_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products at or below their reorder point.\n".to_string();
    }

    let mut out = format!("{:<15} {:<25} {:>6} {:>6}\n", "SKU", "NAME", "QTY", "ROP");
    for p in products {
        out.push_str(&format!(
            "{:<15} {:<25} {:>6} {:>6}\n",
            p.sku.as_str(),
            p.name,
            p.quantity,
            p.reorder_point
        ));
    }
    out
}

pub fn sales_table(sales: &[Sale]) -> String {
    if sales.is_empty() {
        return "No sales recorded.\n".to_string();
    }

    let mut out = format!(
        "{:>6} {:<20} {:<15} {:>6} {:>10}\n",
        "ID", "DATE", "SKU", "QTY", "REVENUE"
    );
    let mut total = 0.0;
    for s in sales {
        total += s.revenue;
        out.push_str(&format!(
            "{:>6} {:<20} {:<15} {:>6} {:>10}\n",
            s.id,
            s.date.format("%Y-%m-%d %H:%M:%S"),
            s.sku.as_str(),
            s.quantity,
            money(s.revenue),
        ));
    }
    out.push_str(&format!("Total revenue: {}\n", money(total)));
    out
}

pub fn report_table(report: &[Recommendation]) -> String {
    if report.is_empty() {
        return "No products.\n".to_string();
    }

    let mut out = format!(
        "{:<15} {:<25} {:>6} {:>8} {:>6} {:>6}  {}\n",
        "SKU", "NAME", "QTY", "DEMAND", "EOQ", "ROP", "ACTION"
    );
    for r in report {
        out.push_str(&format!(
            "{:<15} {:<25} {:>6} {:>8} {:>6} {:>6}  {}\n",
            r.sku.as_str(),
            r.name,
            r.quantity,
            r.annual_demand,
            r.eoq,
            r.reorder_point,
            r.action,
        ));
    }
    out
}
