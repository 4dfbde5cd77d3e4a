//! The order workflow running against the SQLite repositories.

use chrono::Utc;

use storefront_core::{
    CoreError, CreateOrderRequest, Customer, OrderLineRequest, Product, StockShortfall,
};
use storefront_db::{Database, DbConfig};
use storefront_orders::{ErrorCode, OrderError};

async fn seeded() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let now = Utc::now();

    db.customers()
        .insert(&Customer {
            id: "C".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: now,
        })
        .await
        .unwrap();

    for (id, price, quantity) in [("A", 1000, 5), ("B", 250, 2)] {
        db.products()
            .insert(&Product {
                id: id.to_string(),
                name: format!("Product {}", id),
                price_cents: price,
                quantity,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    db
}

fn request(customer_id: &str, lines: &[(&str, i64)]) -> CreateOrderRequest {
    CreateOrderRequest::new(
        customer_id,
        lines
            .iter()
            .map(|(id, qty)| OrderLineRequest::new(*id, *qty))
            .collect(),
    )
}

async fn quantity(db: &Database, id: &str) -> i64 {
    db.products().get_by_id(id).await.unwrap().unwrap().quantity
}

#[tokio::test]
async fn test_order_is_persisted_and_stock_decremented() {
    let db = seeded().await;

    let order = db
        .order_service()
        .execute(request("C", &[("A", 3), ("B", 2)]))
        .await
        .unwrap();

    assert_eq!(order.total_cents, 3500);
    assert_eq!(quantity(&db, "A").await, 2);
    assert_eq!(quantity(&db, "B").await, 0);

    let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(stored, order);
    assert_eq!(stored.line_for("A").unwrap().unit_price_cents, 1000);
}

#[tokio::test]
async fn test_rejections_leave_database_untouched() {
    let db = seeded().await;
    let service = db.order_service();

    let cases = [
        (request("ghost", &[("A", 1)]), ErrorCode::CustomerNotFound),
        (request("C", &[("X", 1)]), ErrorCode::NoProductsResolved),
        (request("C", &[("A", 1), ("X", 1)]), ErrorCode::ProductsNotFound),
        (request("C", &[("A", 6)]), ErrorCode::InsufficientStock),
        (request("C", &[("A", -1)]), ErrorCode::ValidationError),
    ];

    for (request, expected) in cases {
        let err = service.execute(request).await.unwrap_err();
        assert_eq!(err.code(), expected, "{}", err);
    }

    assert_eq!(db.orders().count().await.unwrap(), 0);
    assert_eq!(quantity(&db, "A").await, 5);
    assert_eq!(quantity(&db, "B").await, 2);
}

#[tokio::test]
async fn test_insufficient_stock_reports_every_short_product() {
    let db = seeded().await;

    let err = db
        .order_service()
        .execute(request("C", &[("B", 3), ("A", 6)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::Domain(CoreError::InsufficientStock(vec![
            StockShortfall::new("B", -1),
            StockShortfall::new("A", -1),
        ]))
    );
}

#[tokio::test]
async fn test_competing_orders_never_oversell() {
    let db = seeded().await;
    let first = db.order_service();
    let second = db.order_service();

    let (a, b) = tokio::join!(
        first.execute(request("C", &[("A", 3)])),
        second.execute(request("C", &[("A", 3)])),
    );

    let outcomes = [a, b];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let rejection = outcomes
        .into_iter()
        .find_map(|r| r.err())
        .unwrap();
    assert_eq!(
        rejection,
        OrderError::Domain(CoreError::InsufficientStock(vec![StockShortfall::new("A", -1)]))
    );

    assert_eq!(quantity(&db, "A").await, 2);
    assert_eq!(db.orders().count().await.unwrap(), 1);
}
