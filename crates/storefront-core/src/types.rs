//! # Domain Types
//!
//! Core domain types used throughout the order-creation workflow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id (UUID)      │       │
//! │  │  name           │   │  price_cents    │   │  customer_id    │       │
//! │  │  email          │   │  quantity       │   │  lines[]        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Caller input:   CreateOrderRequest ── OrderLineRequest (id, qty)      │
//! │  Derived:        PricedLine, StockUpdate, StockShortfall               │
//! │  Persisted:      NewOrder ──► Order ── OrderLine (price frozen)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Order lines freeze the catalog price at order time. A later price
//! change in the catalog never reprices an existing order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer known to the customer directory.
///
/// Only existence matters to the workflow; the other fields ride along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog record, as read in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Quantity on hand. Never negative.
    pub quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Caller Input
// =============================================================================

/// One requested line: a product id and a quantity.
///
/// There is deliberately no price field. Prices come from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl OrderLineRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        OrderLineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Entry payload for the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub lines: Vec<OrderLineRequest>,
}

impl CreateOrderRequest {
    pub fn new(customer_id: impl Into<String>, lines: Vec<OrderLineRequest>) -> Self {
        CreateOrderRequest {
            customer_id: customer_id.into(),
            lines,
        }
    }

    /// Requested product ids in first-occurrence order, without repeats.
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if !ids.contains(&line.product_id) {
                ids.push(line.product_id.clone());
            }
        }
        ids
    }
}

// =============================================================================
// Derived Values
// =============================================================================

/// A line priced from the catalog snapshot, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub quantity: i64,
    /// Catalog price at order time (frozen).
    pub unit_price_cents: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

/// Stock change for one product, computed from the snapshot.
///
/// Stores apply only `reserved`, as a conditional decrement against the
/// current row, so stock never goes below zero even when the snapshot is
/// stale. A store that finds too little stock reports the shortfall
/// against what it actually holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub product_id: String,
    /// Quantity on hand the snapshot predicts after this order. Informational;
    /// stores never write it.
    pub quantity: i64,
    /// Units taken by this order.
    pub reserved: i64,
}

/// A product that cannot cover the requested amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortfall {
    pub product_id: String,
    /// What quantity on hand would become. Always negative.
    pub resulting_quantity: i64,
}

impl StockShortfall {
    pub fn new(product_id: impl Into<String>, resulting_quantity: i64) -> Self {
        StockShortfall {
            product_id: product_id.into(),
            resulting_quantity,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order about to be persisted. The store assigns ids and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: String,
    pub lines: Vec<PricedLine>,
    pub total_cents: i64,
}

/// A persisted order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub total_cents: i64,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Finds the line for a product, if the order has one.
    pub fn line_for(&self, product_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }
}

/// A persisted order line. Price and quantity are immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    /// Position within the order, starting at 0.
    pub position: i64,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of order (frozen).
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids_keep_first_occurrence_order() {
        let request = CreateOrderRequest::new(
            "c-1",
            vec![
                OrderLineRequest::new("B", 1),
                OrderLineRequest::new("A", 2),
                OrderLineRequest::new("B", 3),
            ],
        );
        assert_eq!(request.product_ids(), vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_request_ignores_price_field() {
        let json = r#"{
            "customer_id": "c-1",
            "lines": [{ "product_id": "A", "quantity": 3, "price": 1 }]
        }"#;
        let request: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.lines, vec![OrderLineRequest::new("A", 3)]);
    }

    #[test]
    fn test_product_price() {
        let now = Utc::now();
        let product = Product {
            id: "A".to_string(),
            name: "Widget".to_string(),
            price_cents: 1000,
            quantity: 5,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.price(), Money::from_cents(1000));
    }
}
