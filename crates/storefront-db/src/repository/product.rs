//! # Product Repository
//!
//! Backs the [`ProductCatalog`] port: snapshot reads and the stock write.
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   for each update:                                                      │
//! │     UPDATE products SET quantity = quantity - reserved                  │
//! │      WHERE id = ? AND quantity >= reserved                              │
//! │        │                                                                │
//! │        ├── 1 row  → covered                                             │
//! │        └── 0 rows → read current quantity, record shortfall             │
//! │                     (current - reserved), or NotFound if no row         │
//! │   any shortfall? ── yes ──► ROLLBACK, StockConflict(shortfalls)         │
//! │                  └─ no ───► COMMIT                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first statement in the transaction is a write, so SQLite takes the
//! write lock up front and concurrent batches queue behind it. A batch that
//! was priced against a stale snapshot fails here instead of driving stock
//! negative.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};

use storefront_core::{Product, StockShortfall, StockUpdate};
use storefront_orders::{ProductCatalog, StoreResult};

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, quantity, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Returns the products that exist among `ids`, in no particular order.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM products WHERE id IN (", PRODUCT_COLUMNS));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(requested = ids.len(), found = products.len(), "Loaded products");
        Ok(products)
    }

    /// Inserts a product. Negative quantities are rejected by the schema.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies every decrement in `updates` or none of them.
    ///
    /// ## Returns
    /// * `Ok(())` - All rows decremented by their `reserved` amount
    /// * `Err(DbError::StockConflict)` - At least one row could not cover its
    ///   reservation; nothing was written
    /// * `Err(DbError::NotFound)` - A product row is gone
    pub async fn reserve_stock(&self, updates: &[StockUpdate]) -> DbResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut shortfalls = Vec::new();

        for update in updates {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND quantity >= ?2
                "#,
            )
            .bind(&update.product_id)
            .bind(update.reserved)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 1 {
                continue;
            }

            let current: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                    .bind(&update.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            match current {
                Some(current) => shortfalls.push(StockShortfall::new(
                    &update.product_id,
                    current - update.reserved,
                )),
                None => return Err(DbError::not_found("Product", &update.product_id)),
            }
        }

        if !shortfalls.is_empty() {
            warn!(
                products = shortfalls.len(),
                "Stock reservation conflicted, rolling back"
            );
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return Err(DbError::StockConflict(shortfalls));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(products = updates.len(), "Stock reserved");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProductCatalog for ProductRepository {
    async fn find_all_by_id(&self, ids: &[String]) -> StoreResult<Vec<Product>> {
        Ok(self.get_many(ids).await?)
    }

    async fn update_quantity(&self, updates: &[StockUpdate]) -> StoreResult<()> {
        Ok(self.reserve_stock(updates).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use storefront_orders::StoreError;

    fn product(id: &str, price_cents: i64, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    fn reserve(id: &str, reserved: i64, quantity: i64) -> StockUpdate {
        StockUpdate {
            product_id: id.to_string(),
            quantity,
            reserved,
        }
    }

    async fn seeded() -> (Database, ProductRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.insert(&product("A", 1000, 5)).await.unwrap();
        repo.insert(&product("B", 250, 1)).await.unwrap();
        (db, repo)
    }

    async fn quantity(repo: &ProductRepository, id: &str) -> i64 {
        repo.get_by_id(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_find_all_by_id_returns_existing_subset() {
        let (_db, repo) = seeded().await;

        let mut found = repo
            .find_all_by_id(&["B".to_string(), "X".to_string(), "A".to_string()])
            .await
            .unwrap();
        found.sort_by(|a, b| a.id.cmp(&b.id));

        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(found[0].price_cents, 1000);
    }

    #[tokio::test]
    async fn test_find_all_by_id_empty() {
        let (_db, repo) = seeded().await;
        assert!(repo.find_all_by_id(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_decrements() {
        let (_db, repo) = seeded().await;

        repo.update_quantity(&[reserve("A", 3, 2), reserve("B", 1, 0)])
            .await
            .unwrap();

        assert_eq!(quantity(&repo, "A").await, 2);
        assert_eq!(quantity(&repo, "B").await, 0);
    }

    #[tokio::test]
    async fn test_update_quantity_is_all_or_nothing() {
        let (_db, repo) = seeded().await;

        let err = repo
            .update_quantity(&[reserve("A", 3, 2), reserve("B", 4, -3)])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::StockConflict(vec![StockShortfall::new("B", -3)])
        );
        assert_eq!(quantity(&repo, "A").await, 5);
        assert_eq!(quantity(&repo, "B").await, 1);
    }

    #[tokio::test]
    async fn test_update_quantity_uses_current_not_snapshot_quantity() {
        let (_db, repo) = seeded().await;

        // First reservation wins; the second was priced against quantity 5.
        repo.update_quantity(&[reserve("A", 4, 1)]).await.unwrap();
        let err = repo
            .update_quantity(&[reserve("A", 3, 2)])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::StockConflict(vec![StockShortfall::new("A", -2)])
        );
        assert_eq!(quantity(&repo, "A").await, 1);
    }

    #[tokio::test]
    async fn test_update_quantity_missing_product() {
        let (_db, repo) = seeded().await;

        let err = repo
            .update_quantity(&[reserve("A", 1, 4), reserve("gone", 1, 0)])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(quantity(&repo, "A").await, 5);
    }

    #[tokio::test]
    async fn test_schema_rejects_negative_quantity() {
        let (_db, repo) = seeded().await;
        assert!(repo.insert(&product("N", 100, -1)).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
