//! # Sale Repository
//!
//! The sale ledger: the atomic commit and the history queries.
//!
//! ## Sale Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     commit(NewSale) : one transaction                   │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   ├── INSERT sales (total, created_at)              → sale_id          │
//! │   ├── for each line:                                                   │
//! │   │     UPDATE products SET stock = stock - qty     (missing → abort)  │
//! │   │     INSERT sale_items (sale_id, product, qty, unit price)          │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction, which rolls back:      │
//! │  no header, no lines, no stock change.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller's total is stored as given. Stock is not floored at zero.

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use tally_core::{NewSale, Sale, SaleDetail, SaleLineDetail, SaleSummary};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and decrements stock, all or nothing.
    ///
    /// ## Returns
    /// The id assigned to the new sale.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if a line references an unknown product
    /// - any store error; in every error case nothing is persisted
    pub async fn commit(&self, sale: &NewSale) -> DbResult<i64> {
        match sale.line_sum() {
            Some(line_sum) if line_sum != sale.total => warn!(
                total = %sale.total,
                line_sum = %line_sum,
                "Sale total does not match its lines, storing the supplied total"
            ),
            None => warn!(
                total = %sale.total,
                "Sale lines overflow when summed, storing the supplied total"
            ),
            Some(_) => {}
        }

        let created_at = timestamp_now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sale_id = sqlx::query(
            r#"
            INSERT INTO sales (total_cents, created_at)
            VALUES (?1, ?2)
            "#,
        )
        .bind(sale.total.cents())
        .bind(&created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for line in &sale.items {
            let remaining: Option<i64> = sqlx::query_scalar(
                r#"
                UPDATE products
                SET stock = stock - ?2
                WHERE id = ?1
                RETURNING stock
                "#,
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(remaining) = remaining else {
                warn!(
                    product_id = line.product_id,
                    "Sale references unknown product, rolling back"
                );
                return Err(DbError::not_found("Product", line.product_id));
            };

            if remaining < 0 {
                warn!(
                    product_id = line.product_id,
                    stock = remaining,
                    "Stock went negative"
                );
            }

            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            total = %sale.total,
            lines = sale.items.len(),
            "Sale committed"
        );
        Ok(sale_id)
    }

    /// Every sale with its number of lines, newest first.
    pub async fn list_summaries(&self) -> DbResult<Vec<SaleSummary>> {
        let sales: Vec<SaleSummary> = sqlx::query_as(
            r#"
            SELECT
                s.id AS id,
                s.total_cents AS total,
                s.created_at AS created_at,
                COUNT(si.id) AS item_count
            FROM sales s
            LEFT JOIN sale_items si ON si.sale_id = s.id
            GROUP BY s.id
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale: Option<Sale> = sqlx::query_as(
            r#"
            SELECT
                id,
                total_cents AS total,
                created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the lines of a sale, in the order they were submitted.
    ///
    /// The price is the one captured at sale time, not the product's
    /// current price.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleLineDetail>> {
        let items: Vec<SaleLineDetail> = sqlx::query_as(
            r#"
            SELECT
                p.name AS name,
                si.quantity AS quantity,
                si.unit_price_cents AS price
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = ?1
            ORDER BY si.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a sale with all of its lines, or `None` for an unknown id.
    pub async fn get_detail(&self, id: i64) -> DbResult<Option<SaleDetail>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let items = self.get_items(id).await?;
        Ok(Some(SaleDetail::from_parts(sale, items)))
    }

    /// Counts sales in the ledger.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// UTC now as fixed-precision RFC 3339 text (`2026-10-19T14:03:11.123456Z`).
///
/// Fixed precision keeps lexical order equal to time order.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tally_core::{Money, NewProduct, SaleLine};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_product(db: &Database, name: &str, cents: i64, stock: i64) -> i64 {
        db.products()
            .insert(&NewProduct::new(name, Money::from_cents(cents), stock))
            .await
            .unwrap()
    }

    fn line(product_id: i64, quantity: i64, cents: i64) -> SaleLine {
        SaleLine {
            product_id,
            quantity,
            price: Money::from_cents(cents),
        }
    }

    fn sale_of(items: Vec<SaleLine>) -> NewSale {
        let total = Money::checked_sum(items.iter().filter_map(SaleLine::line_total)).unwrap();
        NewSale { total, items }
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_commit_decrements_stock_and_records_total() {
        let db = test_db().await;
        let water = add_product(&db, "Agua 500ml", 250, 500).await;

        let sale_id = db
            .sales()
            .commit(&sale_of(vec![line(water, 3, 250)]))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, water).await, 497);

        let sale = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total, Money::from_cents(750));
    }

    #[tokio::test]
    async fn test_commit_rolls_back_on_unknown_product() {
        let db = test_db().await;
        let water = add_product(&db, "Agua 500ml", 250, 500).await;

        let err = db
            .sales()
            .commit(&sale_of(vec![line(water, 2, 250), line(9999, 1, 100)]))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(stock_of(&db, water).await, 500);
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert!(db.sales().list_summaries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_allows_negative_stock() {
        let db = test_db().await;
        let bread = add_product(&db, "Pan", 120, 2).await;

        db.sales()
            .commit(&sale_of(vec![line(bread, 5, 120)]))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, bread).await, -3);
    }

    #[tokio::test]
    async fn test_commit_stores_supplied_total() {
        let db = test_db().await;
        let water = add_product(&db, "Agua 500ml", 250, 500).await;

        let mut checkout = sale_of(vec![line(water, 1, 250)]);
        checkout.total = Money::from_cents(999);
        let sale_id = db.sales().commit(&checkout).await.unwrap();

        let sale = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total, Money::from_cents(999));
    }

    #[tokio::test]
    async fn test_detail_matches_cart_lines() {
        let db = test_db().await;
        let water = add_product(&db, "Agua 500ml", 250, 500).await;
        let bread = add_product(&db, "Pan", 120, 30).await;

        let sale_id = db
            .sales()
            .commit(&sale_of(vec![line(bread, 2, 120), line(water, 3, 250)]))
            .await
            .unwrap();

        let detail = db.sales().get_detail(sale_id).await.unwrap().unwrap();
        assert_eq!(detail.id, sale_id);
        assert_eq!(detail.total, Money::from_cents(990));
        assert_eq!(
            detail.items,
            vec![
                SaleLineDetail {
                    name: "Pan".to_string(),
                    quantity: 2,
                    price: Money::from_cents(120),
                },
                SaleLineDetail {
                    name: "Agua 500ml".to_string(),
                    quantity: 3,
                    price: Money::from_cents(250),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_detail_keeps_price_at_sale_time() {
        let db = test_db().await;
        let water = add_product(&db, "Agua 500ml", 250, 500).await;

        let sale_id = db
            .sales()
            .commit(&sale_of(vec![line(water, 1, 200)]))
            .await
            .unwrap();

        let detail = db.sales().get_detail(sale_id).await.unwrap().unwrap();
        assert_eq!(detail.items[0].price, Money::from_cents(200));
    }

    #[tokio::test]
    async fn test_unknown_sale_detail_is_none() {
        let db = test_db().await;
        assert!(db.sales().get_detail(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_summaries_newest_first_with_counts() {
        let db = test_db().await;
        let water = add_product(&db, "Agua 500ml", 250, 500).await;
        let bread = add_product(&db, "Pan", 120, 30).await;

        let first = db
            .sales()
            .commit(&sale_of(vec![line(water, 1, 250)]))
            .await
            .unwrap();
        let second = db
            .sales()
            .commit(&sale_of(vec![line(water, 1, 250), line(bread, 4, 120)]))
            .await
            .unwrap();

        let summaries = db.sales().list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, second);
        assert_eq!(summaries[0].item_count, 2);
        assert_eq!(summaries[1].id, first);
        assert_eq!(summaries[1].item_count, 1);
        assert!(summaries[0].created_at >= summaries[1].created_at);
    }

    #[tokio::test]
    async fn test_list_summaries_breaks_timestamp_ties_by_id() {
        let db = test_db().await;

        for _ in 0..3 {
            sqlx::query("INSERT INTO sales (total_cents, created_at) VALUES (100, ?1)")
                .bind("2026-10-19T14:03:11.123456Z")
                .execute(db.pool())
                .await
                .unwrap();
        }

        let ids: Vec<i64> = db
            .sales()
            .list_summaries()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2026-10-19T14:03:11.123456Z".len());
        assert!(ts.ends_with('Z'));
    }
}
