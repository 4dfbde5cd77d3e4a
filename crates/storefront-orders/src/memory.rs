//! # In-Memory Store
//!
//! A single process-local store implementing all three ports. Used by the
//! workflow tests and by callers that embed the workflow without a
//! database.
//!
//! ## Thread Safety
//! State sits behind `Arc<Mutex<_>>`. Each port call takes the lock once,
//! so a batch stock update is checked and applied atomically, and two
//! concurrent orders for the same product serialize at the decrement.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use storefront_core::{Customer, NewOrder, Order, OrderLine, Product, StockShortfall, StockUpdate};

use crate::error::{StoreError, StoreResult};
use crate::ports::{CustomerDirectory, OrderStore, ProductCatalog};

#[derive(Debug, Default)]
struct MemoryState {
    customers: HashMap<String, Customer>,
    products: HashMap<String, Product>,
    orders: Vec<Order>,
}

/// Cloneable handle; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&MemoryState) -> R) -> R {
        let state = self.state.lock().expect("Memory store mutex poisoned");
        f(&state)
    }

    fn with_state_mut<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        let mut state = self.state.lock().expect("Memory store mutex poisoned");
        f(&mut state)
    }

    /// Adds or replaces a customer.
    pub fn insert_customer(&self, customer: Customer) {
        self.with_state_mut(|s| {
            s.customers.insert(customer.id.clone(), customer);
        });
    }

    /// Adds or replaces a product.
    pub fn insert_product(&self, product: Product) {
        self.with_state_mut(|s| {
            s.products.insert(product.id.clone(), product);
        });
    }

    /// Overwrites a product's quantity on hand, as a restock or an
    /// out-of-band sale would.
    pub fn set_quantity(&self, product_id: &str, quantity: i64) -> StoreResult<()> {
        self.with_state_mut(|s| {
            let product = s
                .products
                .get_mut(product_id)
                .ok_or_else(|| StoreError::not_found("Product", product_id))?;
            product.quantity = quantity;
            product.updated_at = Utc::now();
            Ok(())
        })
    }

    pub fn product(&self, product_id: &str) -> Option<Product> {
        self.with_state(|s| s.products.get(product_id).cloned())
    }

    /// All stored orders, oldest first.
    pub fn orders(&self) -> Vec<Order> {
        self.with_state(|s| s.orders.clone())
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.with_state(|s| s.customers.get(id).cloned()))
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn find_all_by_id(&self, ids: &[String]) -> StoreResult<Vec<Product>> {
        Ok(self.with_state(|s| {
            ids.iter()
                .filter_map(|id| s.products.get(id).cloned())
                .collect()
        }))
    }

    async fn update_quantity(&self, updates: &[StockUpdate]) -> StoreResult<()> {
        self.with_state_mut(|s| {
            let mut shortfalls = Vec::new();
            for update in updates {
                let product = s
                    .products
                    .get(&update.product_id)
                    .ok_or_else(|| StoreError::not_found("Product", &update.product_id))?;
                if product.quantity < update.reserved {
                    shortfalls.push(StockShortfall::new(
                        &update.product_id,
                        product.quantity - update.reserved,
                    ));
                }
            }

            if !shortfalls.is_empty() {
                return Err(StoreError::StockConflict(shortfalls));
            }

            let now = Utc::now();
            for update in updates {
                if let Some(product) = s.products.get_mut(&update.product_id) {
                    product.quantity -= update.reserved;
                    product.updated_at = now;
                }
            }

            Ok(())
        })
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let lines = order
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

        let order = Order {
            id: order_id,
            customer_id: order.customer_id,
            total_cents: order.total_cents,
            lines,
            created_at: now,
            updated_at: now,
        };

        self.with_state_mut(|s| s.orders.push(order.clone()));
        Ok(order)
    }

    async fn discard(&self, order_id: &str) -> StoreResult<()> {
        self.with_state_mut(|s| {
            let before = s.orders.len();
            s.orders.retain(|o| o.id != order_id);
            if s.orders.len() == before {
                return Err(StoreError::not_found("Order", order_id));
            }
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
