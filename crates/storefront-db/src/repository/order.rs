//! # Order Repository
//!
//! Backs the [`OrderStore`] port.
//!
//! ## Snapshot Pattern
//! Each line stores the catalog price it was sold at. Later price changes
//! never touch existing orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(NewOrder)                                                       │
//! │     └── one transaction: INSERT orders + INSERT order_lines (n)         │
//! │                                                                         │
//! │  discard(order_id)      (compensation after a failed stock write)      │
//! │     └── one transaction: DELETE order_lines + DELETE orders             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use storefront_core::{NewOrder, Order, OrderLine};
use storefront_orders::{OrderStore, StoreResult};

use crate::error::{DbError, DbResult};

/// `orders` row without its lines.
#[derive(Debug, sqlx::FromRow)]
struct OrderHeader {
    id: String,
    customer_id: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderHeader {
    fn with_lines(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            total_cents: self.total_cents,
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Writes the header and every line together, or nothing.
    ///
    /// Ids are UUID v4, positions follow `order.lines`, timestamps are UTC
    /// now. A customer or product id the schema does not know fails with
    /// `ForeignKeyViolation`.
    pub async fn insert(&self, order: NewOrder) -> DbResult<Order> {
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %order_id, customer_id = %order.customer_id, lines = order.lines.len(), "Inserting order");

        let lines: Vec<OrderLine> = order
            .lines
            .into_iter()
            .enumerate()
            .map(|(position, line)| OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                position: position as i64,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                line_total_cents: line.line_total_cents,
                created_at: now,
            })
            .collect();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, total_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&order_id)
        .bind(&order.customer_id)
        .bind(order.total_cents)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, position, product_id,
                    quantity, unit_price_cents, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&line.id)
            .bind(&line.order_id)
            .bind(line.position)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.line_total_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Order {
            id: order_id,
            customer_id: order.customer_id,
            total_cents: order.total_cents,
            lines,
            created_at: now,
            updated_at: now,
        })
    }

    /// Removes an order and its lines.
    pub async fn delete(&self, order_id: &str) -> DbResult<()> {
        debug!(id = %order_id, "Deleting order");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets an order with its lines, in position order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let header = sqlx::query_as::<_, OrderHeader>(
            r#"
            SELECT id, customer_id, total_cents, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match header {
            Some(header) => {
                let lines = self.get_lines(&header.id).await?;
                Ok(Some(header.with_lines(lines)))
            }
            None => Ok(None),
        }
    }

    /// All orders for a customer, oldest first.
    ///
    /// Ordered by insertion (`rowid`). Stored timestamps are RFC 3339 text
    /// with a variable fractional part, so they do not sort reliably as text.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let headers = sqlx::query_as::<_, OrderHeader>(
            r#"
            SELECT id, customer_id, total_cents, created_at, updated_at
            FROM orders
            WHERE customer_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(headers.len());
        for header in headers {
            let lines = self.get_lines(&header.id).await?;
            orders.push(header.with_lines(lines));
        }

        Ok(orders)
    }

    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT
                id, order_id, position, product_id,
                quantity, unit_price_cents, line_total_cents, created_at
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        Ok(self.insert(order).await?)
    }

    async fn discard(&self, order_id: &str) -> StoreResult<()> {
        Ok(self.delete(order_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use storefront_core::{Customer, PricedLine, Product};
    use storefront_orders::StoreError;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        db.customers()
            .insert(&Customer {
                id: "c-1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                created_at: now,
            })
            .await
            .unwrap();

        for (id, price) in [("A", 1000), ("B", 250)] {
            db.products()
                .insert(&Product {
                    id: id.to_string(),
                    name: id.to_string(),
                    price_cents: price,
                    quantity: 10,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }

        db
    }

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> PricedLine {
        PricedLine {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
            line_total_cents: unit_price_cents * quantity,
        }
    }

    fn new_order(customer_id: &str) -> NewOrder {
        NewOrder {
            customer_id: customer_id.to_string(),
            lines: vec![line("A", 3, 1000), line("B", 2, 250)],
            total_cents: 3500,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_lines_in_order() {
        let db = seeded().await;
        let repo = db.orders();

        let created = repo.create(new_order("c-1")).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded, created);
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[0].product_id, "A");
        assert_eq!(loaded.lines[1].position, 1);
        assert_eq!(loaded.total_cents, 3500);
    }

    #[tokio::test]
    async fn test_create_for_unknown_customer_writes_nothing() {
        let db = seeded().await;
        let repo = db.orders();

        let err = repo.create(new_order("ghost")).await.unwrap_err();

        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_line_failure_rolls_back_header() {
        let db = seeded().await;
        let repo = db.orders();

        let mut order = new_order("c-1");
        order.lines.push(line("missing", 1, 100));

        assert!(repo.create(order).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_discard_removes_order_and_lines() {
        let db = seeded().await;
        let repo = db.orders();

        let created = repo.create(new_order("c-1")).await.unwrap();
        repo.discard(&created.id).await.unwrap();

        assert_eq!(repo.get_by_id(&created.id).await.unwrap(), None);
        assert!(repo.get_lines(&created.id).await.unwrap().is_empty());

        let err = repo.discard(&created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_by_customer() {
        let db = seeded().await;
        let repo = db.orders();

        let first = repo.create(new_order("c-1")).await.unwrap();
        let second = repo.create(new_order("c-1")).await.unwrap();
        let third = repo.create(new_order("c-1")).await.unwrap();

        let listed = repo.list_by_customer("c-1").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![first.id.as_str(), second.id.as_str(), third.id.as_str()]
        );
        assert!(repo.list_by_customer("c-2").await.unwrap().is_empty());
    }
}
