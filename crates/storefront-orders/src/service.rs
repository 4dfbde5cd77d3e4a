//! # Create Order Service
//!
//! Runs one order request through its stages, strictly in order.
//!
//! ## Request State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Received ──► Validated ──► Priced ──► Committed   (success)           │
//! │     │             │            │           │                            │
//! │     └─────────────┴────────────┴───────────┴──► Failed(reason)         │
//! │                                                                         │
//! │  Received   validate_request: quantities positive                      │
//! │  Validated  customer exists; every product id resolves in snapshot     │
//! │  Priced     catalog prices applied; no product goes below zero         │
//! │  Committed  order stored, then stock decremented (conditional)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commit Ordering
//! The order is created first. The stock write runs only after that
//! succeeds. If the stock write fails, the order is discarded so an order
//! never exists without its decrement. A stock write that loses a race
//! (`StockConflict`) is reported as `InsufficientStock`.
//!
//! No stage retries. Collaborator failures reach the caller unchanged.

use tracing::{debug, error, info, warn};

use storefront_core::pricing::{self, PricedOrder};
use storefront_core::validation::{validate_request, CatalogSnapshot};
use storefront_core::{CoreError, CreateOrderRequest, Customer, NewOrder, Order};

use crate::error::{OrderError, OrderResult, StoreError};
use crate::ports::{CustomerDirectory, OrderStore, ProductCatalog};

/// Output of the Validated stage.
#[derive(Debug, Clone)]
pub struct ValidatedContext {
    pub customer: Customer,
    /// Read once; pricing and the stock check both use it.
    pub snapshot: CatalogSnapshot,
}

/// The order-creation workflow, wired to its collaborators.
///
/// ## Usage
/// ```rust,ignore
/// let service = CreateOrderService::new(customers, catalog, orders);
/// let order = service
///     .execute(CreateOrderRequest::new("c-1", vec![OrderLineRequest::new("A", 3)]))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct CreateOrderService<C, P, O> {
    customers: C,
    catalog: P,
    orders: O,
}

impl<C, P, O> CreateOrderService<C, P, O>
where
    C: CustomerDirectory,
    P: ProductCatalog,
    O: OrderStore,
{
    pub fn new(customers: C, catalog: P, orders: O) -> Self {
        CreateOrderService {
            customers,
            catalog,
            orders,
        }
    }

    /// Creates an order for `request.customer_id` from `request.lines`.
    ///
    /// Not idempotent: submitting the same request twice creates two
    /// orders and reserves stock twice.
    pub async fn execute(&self, request: CreateOrderRequest) -> OrderResult<Order> {
        debug!(
            customer_id = %request.customer_id,
            lines = request.lines.len(),
            "Received order request"
        );

        let result = self.run(&request).await;

        if let Err(err) = &result {
            warn!(
                customer_id = %request.customer_id,
                code = ?err.code(),
                error = %err,
                "Order request failed"
            );
        }

        result
    }

    async fn run(&self, request: &CreateOrderRequest) -> OrderResult<Order> {
        validate_request(request)?;

        let context = self.validate(request).await?;
        debug!(
            customer_id = %context.customer.id,
            products = context.snapshot.len(),
            "Order request validated"
        );

        let priced = self.resolve(request, &context.snapshot)?;
        debug!(
            lines = priced.lines.len(),
            total = %priced.total,
            "Order priced"
        );

        self.commit(&context.customer, priced).await
    }

    /// Validated stage: the customer exists and every product resolves.
    ///
    /// Read-only against collaborators.
    pub async fn validate(&self, request: &CreateOrderRequest) -> OrderResult<ValidatedContext> {
        let customer = self
            .customers
            .find_by_id(&request.customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(request.customer_id.clone()))?;

        let requested_ids = request.product_ids();
        let products = self.catalog.find_all_by_id(&requested_ids).await?;

        let snapshot = CatalogSnapshot::new(products);
        snapshot.check_resolved(&requested_ids)?;

        Ok(ValidatedContext { customer, snapshot })
    }

    /// Priced stage: catalog prices and stock updates from the snapshot.
    pub fn resolve(
        &self,
        request: &CreateOrderRequest,
        snapshot: &CatalogSnapshot,
    ) -> OrderResult<PricedOrder> {
        Ok(pricing::resolve(&request.lines, snapshot)?)
    }

    /// Committed stage: store the order, then apply the stock updates.
    pub async fn commit(&self, customer: &Customer, priced: PricedOrder) -> OrderResult<Order> {
        let new_order = NewOrder {
            customer_id: customer.id.clone(),
            lines: priced.lines,
            total_cents: priced.total.cents(),
        };

        let order = self.orders.create(new_order).await?;

        if let Err(err) = self.catalog.update_quantity(&priced.stock_updates).await {
            warn!(order_id = %order.id, error = %err, "Stock update failed, discarding order");

            if let Err(discard_err) = self.orders.discard(&order.id).await {
                error!(
                    order_id = %order.id,
                    error = %discard_err,
                    "Failed to discard order after stock update failure"
                );
            }

            return Err(match err {
                StoreError::StockConflict(shortfalls) => {
                    OrderError::Domain(CoreError::InsufficientStock(shortfalls))
                }
                other => OrderError::Store(other),
            });
        }

        info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            lines = order.lines.len(),
            total = %order.total(),
            "Order created"
        );

        Ok(order)
    }
}
