//! # storefront-core: Pure Business Logic for Order Creation
//!
//! This crate holds the rules of the order-creation workflow as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Creation Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              storefront-orders (workflow)                       │   │
//! │  │   validate ──► price & reserve ──► commit                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  resolve  │  │  request  │  │   │
//! │  │   │   Order   │  │           │  │  shortfall│  │  snapshot │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Order, StockUpdate, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Request shape checks and catalog snapshot checks
//! - [`pricing`] - Line pricing and stock reservation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use storefront_core::pricing::resolve;
//! use storefront_core::validation::CatalogSnapshot;
//! use storefront_core::{OrderLineRequest, Product};
//!
//! let now = Utc::now();
//! let snapshot = CatalogSnapshot::new(vec![Product {
//!     id: "A".to_string(),
//!     name: "Widget".to_string(),
//!     price_cents: 1000,
//!     quantity: 5,
//!     created_at: now,
//!     updated_at: now,
//! }]);
//!
//! let priced = resolve(&[OrderLineRequest::new("A", 3)], &snapshot).unwrap();
//! assert_eq!(priced.lines[0].unit_price_cents, 1000);
//! assert_eq!(priced.stock_updates[0].quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
