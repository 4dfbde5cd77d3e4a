//! # Validation Module
//!
//! Request checks for order creation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request shape (validate_request)                             │
//! │  └── quantities positive; ids are left to the lookups                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog snapshot (CatalogSnapshot::check_resolved)           │
//! │  ├── nothing resolved        → NoProductsResolved                      │
//! │  └── some ids unresolved     → ProductsNotFound(all of them)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0) on products                                 │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{consolidate_lines, validate_request};
//! use storefront_core::{CreateOrderRequest, OrderLineRequest};
//!
//! let request = CreateOrderRequest::new(
//!     "c-1",
//!     vec![OrderLineRequest::new("A", 1), OrderLineRequest::new("A", 2)],
//! );
//! validate_request(&request).unwrap();
//!
//! let merged = consolidate_lines(&request.lines).unwrap();
//! assert_eq!(merged, vec![OrderLineRequest::new("A", 3)]);
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CreateOrderRequest, OrderLineRequest, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Shape
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the shape of an order request.
///
/// Ids are not checked here. A blank or unknown id is the directory's and
/// catalog's answer to give (`CustomerNotFound`, `ProductsNotFound`). An
/// empty line list passes too: it resolves no products later and is
/// rejected as `NoProductsResolved`.
pub fn validate_request(request: &CreateOrderRequest) -> ValidationResult<()> {
    for line in &request.lines {
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

/// Merges lines that name the same product, summing their quantities.
///
/// ## Rules
/// - Output keeps first-occurrence order
/// - Stock is checked against the merged quantity, so two lines of 3
///   against 5 on hand fail instead of passing one line at a time
///
/// ## Errors
/// `OutOfRange` if a merged quantity overflows.
pub fn consolidate_lines(lines: &[OrderLineRequest]) -> ValidationResult<Vec<OrderLineRequest>> {
    let mut merged: Vec<OrderLineRequest> = Vec::with_capacity(lines.len());

    for line in lines {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                    ValidationError::OutOfRange {
                        field: "quantity".to_string(),
                        min: 1,
                        max: i64::MAX,
                    }
                })?;
            }
            None => merged.push(line.clone()),
        }
    }

    Ok(merged)
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Products resolved for one request, keyed by id.
///
/// Read once per request. Pricing and stock checks both work from this
/// snapshot; nothing re-reads the catalog between them.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<String, Product>,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>) -> Self {
        CatalogSnapshot {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    /// Looks up a product that must be in the snapshot.
    ///
    /// Misses are `ProductNotFound`, an internal error: callers only ask
    /// for ids that passed [`CatalogSnapshot::check_resolved`].
    pub fn get(&self, product_id: &str) -> CoreResult<&Product> {
        self.products
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Checks that every requested id resolved.
    ///
    /// ## User Workflow
    /// ```text
    /// requested: [A, X, B, Y]     snapshot: {A, B}
    ///      │
    ///      ▼
    /// ProductsNotFound([X, Y])  ← every missing id, in request order
    /// ```
    pub fn check_resolved(&self, requested_ids: &[String]) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::NoProductsResolved);
        }

        let mut missing: Vec<String> = Vec::new();
        for id in requested_ids {
            if !self.contains(id) && !missing.contains(id) {
                missing.push(id.clone());
            }
        }

        if !missing.is_empty() {
            return Err(CoreError::ProductsNotFound(missing));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
