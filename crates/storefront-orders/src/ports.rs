//! # Collaborator Ports
//!
//! The three capabilities the workflow consumes. Everything else about
//! storage stays behind these traits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CustomerDirectory   find_by_id(id)          -> Option<Customer>       │
//! │  ProductCatalog      find_all_by_id(ids)     -> Vec<Product> (subset)  │
//! │                      update_quantity(batch)  -> () | StockConflict     │
//! │  OrderStore          create(NewOrder)        -> Order                  │
//! │                      discard(order_id)       -> ()                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{Customer, NewOrder, Order, Product, StockUpdate};

use crate::error::StoreResult;

/// Looks up customers by id.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Customer>>;
}

/// Reads product snapshots and applies stock updates.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Returns the products that exist among `ids`. Unknown ids are
    /// silently absent from the result.
    async fn find_all_by_id(&self, ids: &[String]) -> StoreResult<Vec<Product>>;

    /// Applies a batch of conditional decrements, all or nothing.
    ///
    /// Each product is decremented by `reserved` only if its current
    /// quantity covers it. Otherwise nothing is written and the error is
    /// `StoreError::StockConflict` listing every product that could not be
    /// covered, with `resulting_quantity = current - reserved`.
    async fn update_quantity(&self, updates: &[StockUpdate]) -> StoreResult<()>;
}

/// Persists orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Stores the header and every line together, or nothing. Assigns ids
    /// and timestamps.
    async fn create(&self, order: NewOrder) -> StoreResult<Order>;

    /// Removes an order and its lines. Used to compensate when the stock
    /// write fails after the order was created.
    async fn discard(&self, order_id: &str) -> StoreResult<()>;
}

// =============================================================================
// Shared Handles
// =============================================================================

#[async_trait]
impl<T: CustomerDirectory + ?Sized> CustomerDirectory for Arc<T> {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Customer>> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    async fn find_all_by_id(&self, ids: &[String]) -> StoreResult<Vec<Product>> {
        (**self).find_all_by_id(ids).await
    }

    async fn update_quantity(&self, updates: &[StockUpdate]) -> StoreResult<()> {
        (**self).update_quantity(updates).await
    }
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        (**self).create(order).await
    }

    async fn discard(&self, order_id: &str) -> StoreResult<()> {
        (**self).discard(order_id).await
    }
}
