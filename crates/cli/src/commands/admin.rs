//! Admin console views.
//!
//! All of these require the cached session to belong to an admin; sign in
//! with `uhsin login --admin` first.

use uhsin_core::{Category, OrderStatus};

use super::{CommandError, Context};

/// Print all orders, optionally filtered by status.
pub fn orders(context: &Context, status: Option<OrderStatus>) -> Result<(), CommandError> {
    let store = context.open_store()?;
    let orders: Vec<_> = store
        .orders()?
        .iter()
        .filter(|o| status.is_none_or(|s| o.status == s))
        .collect();

    println!(
        "{:<14} {:<17} {:>10} {:>5}  {:<12} {}",
        "ORDER", "STATUS", "TOTAL", "UNITS", "TRACKING", "PLACED"
    );
    for order in &orders {
        println!(
            "{:<14} {:<17} {:>10} {:>5}  {:<12} {}",
            order.id,
            order.status,
            order.total.to_string(),
            order.unit_count(),
            order.tracking_number,
            order.date.format("%Y-%m-%d %H:%M")
        );
    }
    println!("{} order(s)", orders.len());
    Ok(())
}

/// Print the newest `limit` audit entries.
pub fn logs(context: &Context, limit: usize) -> Result<(), CommandError> {
    let store = context.open_store()?;
    for entry in store.admin_logs()?.iter().take(limit) {
        println!(
            "{}  {:<8} {:<18} {:<30} by {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.severity,
            entry.action,
            entry.target,
            entry.admin_name
        );
    }
    Ok(())
}

/// Print dashboard numbers.
pub fn stats(context: &Context) -> Result<(), CommandError> {
    let store = context.open_store()?;
    let stats = store.dashboard()?;
    println!("Revenue:    {}", stats.revenue);
    println!("Orders:     {}", stats.order_count);
    println!("Products:   {}", stats.product_count);
    println!("Users:      {}", stats.user_count);
    println!("Low stock:  {}", stats.low_stock_count);
    Ok(())
}

/// Print a generated description.
pub async fn describe(context: &Context, name: &str, category: Category) -> Result<(), CommandError> {
    let store = context.open_store()?;
    if context.config.description.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, using the fallback description");
    }
    let text = store.generate_description(name, category).await?;
    println!("{text}");
    Ok(())
}
