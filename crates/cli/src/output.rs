//! Terminal rendering for command results.

use anyhow::Result;
use serde::Serialize;

use stockmaster_client::Navigation;
use stockmaster_client::services::reports::format_movement_datetime;
use stockmaster_client::types::{
    DashboardSummary, InactiveRecord, LowStockRow, MovementReportRow, Product, StockMovement,
    TopSellingRow, UserAccount, Warehouse,
};

/// Print `value` as pretty JSON, or through `text` for humans.
pub fn emit<T>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()>
where
    T: Serialize + ?Sized,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn navigation(nav: &Navigation) {
    match nav {
        Navigation::Public { route } => println!("{} ({}) - public view", route.title, route.path),
        Navigation::Render { route, chrome, context } => {
            println!("{} ({})", route.title, route.path);
            println!(
                "signed in as {} [{}] role={} id={}",
                chrome.user_name, chrome.user_initials, chrome.user_role, context.user_id
            );
            for entry in &chrome.sidebar {
                let marker = if entry.active { '*' } else { ' ' };
                println!("  {marker} {:<12} {}", entry.title, entry.path);
            }
        }
        Navigation::Denied { route, denied } => {
            println!("{} ({})", route.title, route.path);
            println!("{}", denied.notice());
        }
        Navigation::Redirect { to } => println!("redirect to {to}"),
        Navigation::NotFound => println!("no such view"),
    }
}

pub fn products(rows: &[Product]) {
    for p in rows {
        let price = p.price.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<30} {:>10}  {}",
            p.id,
            p.name,
            price,
            or_dash(p.category_name.as_deref())
        );
    }
}

pub fn warehouses(rows: &[Warehouse]) {
    for w in rows {
        println!(
            "{:>5}  {:<24} {:<16} {}",
            w.id,
            w.name,
            or_dash(w.city.as_deref()),
            or_dash(w.address.as_deref())
        );
    }
}

pub fn users(rows: &[UserAccount]) {
    for u in rows {
        println!("{:>5}  {:<24} {:<32} {}", u.id, u.name, u.email, u.role);
    }
}

pub fn movements(rows: &[StockMovement]) {
    for m in rows {
        let date = m.movement_date.as_deref().map(format_movement_datetime);
        println!(
            "{:<16}  {:<14} {:<24} {:>6}  {:<16} {}",
            or_dash(date.as_deref()),
            m.movement_type,
            or_dash(m.product_name.as_deref()),
            m.quantity,
            or_dash(m.warehouse_name.as_deref()),
            or_dash(m.motive.as_deref())
        );
    }
}

pub fn low_stock(rows: &[LowStockRow]) {
    if rows.is_empty() {
        println!("no products below minimum stock");
    }
    for r in rows {
        println!(
            "{:<30} {:<16} {:>6} / min {}",
            r.product_name,
            or_dash(r.warehouse_name.as_deref()),
            r.current_stock,
            r.minimum_stock
        );
    }
}

pub fn movement_report(rows: &[MovementReportRow]) {
    for r in rows {
        println!(
            "{:<16}  {:<14} {:<24} {:>6}  {}",
            format_movement_datetime(&r.movement_date),
            r.movement_type,
            r.product_name,
            r.quantity,
            or_dash(r.user_name.as_deref())
        );
    }
}

pub fn sales(rows: &[TopSellingRow]) {
    for (idx, r) in rows.iter().enumerate() {
        let position = r.position.map_or(idx + 1, |p| p as usize);
        println!(
            "{position:>3}. {:<30} {:>6} units  avg {:.2}",
            r.product_name,
            r.units_sold,
            r.effective_average_price()
        );
    }
}

pub fn dashboard(summary: &DashboardSummary) {
    println!("low stock products: {}", summary.low_stock);
    println!("total movements:    {}", summary.total_movements);
    println!("units sold:         {}", summary.total_sold);
    println!("revenue:            {:.2}", summary.total_revenue);
}

pub fn inactive(rows: &[InactiveRecord]) {
    if rows.is_empty() {
        println!("nothing to restore");
    }
    for r in rows {
        println!("{:>5}  {}", r.id, or_dash(r.name.as_deref()));
    }
}
