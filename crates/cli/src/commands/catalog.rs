//! Catalog listing and reset.

use uhsin_store::{CacheKey, ProductQuery, StateCache};

use super::{CommandError, Context};

/// Print products matching `query`.
pub fn list(context: &Context, query: &ProductQuery) -> Result<(), CommandError> {
    let store = context.open_store()?;
    let products = store.search(query);

    if products.is_empty() {
        println!("No products match");
        return Ok(());
    }

    println!(
        "{:<10} {:<28} {:<13} {:>10} {:>6} {:>7}",
        "ID", "NAME", "CATEGORY", "PRICE", "STOCK", "RATING"
    );
    for product in &products {
        let stock_flag = if product.is_low_stock() { "!" } else { "" };
        println!(
            "{:<10} {:<28} {:<13} {:>10} {:>5}{:<1} {:>4.1} ({})",
            product.id,
            product.name,
            product.category,
            product.price.to_string(),
            product.stock,
            stock_flag,
            product.rating,
            product.rating_count
        );
    }
    println!("{} product(s)", products.len());
    Ok(())
}

/// Drop the cached catalog so the next open reseeds the starter products.
pub fn reset(context: &Context) -> Result<(), CommandError> {
    context.cache.remove(CacheKey::Products)?;
    let store = context.open_store()?;
    tracing::info!("Catalog reset to {} starter products", store.products().len());
    store.close()?;
    Ok(())
}
