//! # Workflow Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Collaborator (SQLite, memory, ...)                                    │
//! │       │  StoreError                                                     │
//! │       ▼                                                                 │
//! │  CreateOrderService::execute ──► OrderError                            │
//! │       │         ▲                                                       │
//! │       │         └── CoreError (rejections from validation/pricing)     │
//! │       ▼                                                                 │
//! │  OrderError::report() ──► ErrorReport { code, message, ... }          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `StockConflict` from the catalog write means the conditional
//! decrement lost a race; the workflow surfaces it as
//! `CoreError::InsufficientStock`. Every other store failure propagates
//! unchanged.

use serde::Serialize;
use thiserror::Error;

use storefront_core::{CoreError, StockShortfall, ValidationError};

// =============================================================================
// Store Error
// =============================================================================

/// Failures reported by collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A conditional stock decrement could not be applied. Lists every
    /// product whose current quantity cannot cover the reservation.
    #[error("Stock changed concurrently for {} product(s)", .0.len())]
    StockConflict(Vec<StockShortfall>),

    /// A record the operation depends on does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The store cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for collaborator operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Order Error
// =============================================================================

/// What [`crate::CreateOrderService::execute`] returns on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The request was rejected by a business rule.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::Domain(CoreError::Validation(err))
    }
}

impl OrderError {
    /// Maps this error to a machine-readable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::Domain(CoreError::CustomerNotFound(_)) => ErrorCode::CustomerNotFound,
            OrderError::Domain(CoreError::NoProductsResolved) => ErrorCode::NoProductsResolved,
            OrderError::Domain(CoreError::ProductsNotFound(_)) => ErrorCode::ProductsNotFound,
            OrderError::Domain(CoreError::InsufficientStock(_)) => ErrorCode::InsufficientStock,
            OrderError::Domain(CoreError::Validation(_)) => ErrorCode::ValidationError,
            OrderError::Domain(CoreError::ProductNotFound(_)) => ErrorCode::Internal,
            OrderError::Store(_) => ErrorCode::StoreError,
        }
    }

    /// Builds a serializable report for the caller.
    ///
    /// ## Serialization
    /// ```json
    /// {
    ///   "code": "INSUFFICIENT_STOCK",
    ///   "message": "The available quantity is less than requested: (id: A, resulting quantity: -1)",
    ///   "shortfalls": [{ "product_id": "A", "resulting_quantity": -1 }]
    /// }
    /// ```
    pub fn report(&self) -> ErrorReport {
        let mut report = ErrorReport {
            code: self.code(),
            message: self.to_string(),
            missing_product_ids: Vec::new(),
            shortfalls: Vec::new(),
        };

        match self {
            OrderError::Domain(CoreError::ProductsNotFound(ids)) => {
                report.missing_product_ids = ids.clone();
            }
            OrderError::Domain(CoreError::InsufficientStock(shortfalls)) => {
                report.shortfalls = shortfalls.clone();
            }
            _ => {}
        }

        report
    }
}

/// Result type for the workflow.
pub type OrderResult<T> = Result<T, OrderError>;

// =============================================================================
// Error Report
// =============================================================================

/// Error codes for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    CustomerNotFound,
    NoProductsResolved,
    ProductsNotFound,
    InsufficientStock,
    ValidationError,
    /// Broken internal contract
    Internal,
    StoreError,
}

/// Structured failure for rendering a user-facing message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_product_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortfalls: Vec<StockShortfall>,
}

// =============================================================================
// Unit Tests
// =============================================================================
