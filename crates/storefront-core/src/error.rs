//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Order rejections (unknown ids, low stock)      │
//! │  └── ValidationError  - Malformed request input                        │
//! │                                                                         │
//! │  storefront-orders errors                                              │
//! │  ├── StoreError       - Collaborator failures                          │
//! │  └── OrderError       - What `execute` returns                         │
//! │                                                                         │
//! │  storefront-db errors                                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrderError ← StoreError ← DbError │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rejection carries the structured data needed to render a precise
//! message: the missing ids, or every product that would go out of stock.

use thiserror::Error;

use crate::types::StockShortfall;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons an order request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The customer id does not resolve in the customer directory.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// None of the requested product ids exist in the catalog.
    #[error("Could not find any product with the given ids")]
    NoProductsResolved,

    /// Some requested product ids do not exist. Lists all of them.
    #[error("Could not find products: {}", .0.join(", "))]
    ProductsNotFound(Vec<String>),

    /// One or more products would end up with negative stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Request: A × 6
    ///      │
    ///      ▼
    /// Catalog: A has 5 on hand
    ///      │
    ///      ▼
    /// InsufficientStock([{ product_id: "A", resulting_quantity: -1 }])
    ///      │
    ///      ▼
    /// Caller shows: "Only 5 of A available"
    /// ```
    #[error("The available quantity is less than requested: {}", format_shortfalls(.0))]
    InsufficientStock(Vec<StockShortfall>),

    /// A price or quantity lookup was attempted for an id outside the
    /// resolved catalog snapshot. Indicates a broken internal contract,
    /// not bad user input.
    #[error("Product not found in catalog snapshot: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn format_shortfalls(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(|s| format!("(id: {}, resulting quantity: {})", s.product_id, s.resulting_quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when the request itself is malformed, before any
/// collaborator is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
