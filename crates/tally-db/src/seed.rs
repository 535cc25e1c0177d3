//! # Sample Catalog
//!
//! A fresh store boots with six products so the till is usable right away.
//! Seeding only happens when the catalog is empty; an existing catalog is
//! never touched.

use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use tally_core::{Money, NewProduct};

/// `(name, price in cents, stock, barcode)`
const SAMPLE_PRODUCTS: &[(&str, i64, i64, &str)] = &[
    ("Agua 500ml", 250, 500, "7861001200015"),
    ("Coca-Cola 355ml", 150, 120, "7861001200022"),
    ("Pan de molde", 320, 40, "7861001200039"),
    ("Leche entera 1L", 110, 60, "7861001200046"),
    ("Galletas de chocolate", 95, 80, "7861001200053"),
    ("Cafe molido 250g", 475, 25, "7861001200060"),
];

/// The sample catalog as insertable products.
pub fn sample_products() -> Vec<NewProduct> {
    SAMPLE_PRODUCTS
        .iter()
        .map(|(name, cents, stock, barcode)| {
            NewProduct::new(*name, Money::from_cents(*cents), *stock).with_barcode(*barcode)
        })
        .collect()
}

/// Seeds the sample catalog if there are no products.
///
/// ## Returns
/// How many products were inserted (0 when the catalog already had data).
pub async fn ensure_sample_catalog(db: &Database) -> DbResult<usize> {
    let repo = db.products();

    let existing = repo.count().await?;
    if existing > 0 {
        debug!(existing, "Catalog already populated, skipping seed");
        return Ok(0);
    }

    let products = sample_products();
    for product in &products {
        repo.insert(product).await?;
    }

    info!(count = products.len(), "Seeded sample catalog");
    Ok(products.len())
}
