//! # storefront-orders: Order-Creation Workflow
//!
//! Validates a request against the customer directory and catalog, prices
//! it from catalog records, reserves stock and persists the order.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller (HTTP handler, CLI, job, ...)                                   │
//! │       │  CreateOrderRequest { customer_id, lines: [{product_id, qty}] } │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            ★ storefront-orders (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   CreateOrderService<C, P, O>                                   │   │
//! │  │     validate ──► resolve ──► commit                             │   │
//! │  │        │            │           │                               │   │
//! │  └────────┼────────────┼───────────┼───────────────────────────────┘   │
//! │           ▼            ▼           ▼                                    │
//! │   CustomerDirectory  (storefront-core  ProductCatalog + OrderStore     │
//! │                       pure pricing)                                    │
//! │           └──────────── implemented by storefront-db / memory ──────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ports`] - Collaborator traits
//! - [`service`] - The workflow
//! - [`memory`] - In-memory adapter for every port
//! - [`error`] - StoreError, OrderError and caller-facing reports
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use storefront_orders::{CreateOrderService, InMemoryStore};
//! use storefront_core::{CreateOrderRequest, OrderLineRequest};
//!
//! let store = InMemoryStore::new();
//! let service = CreateOrderService::new(store.clone(), store.clone(), store.clone());
//! let order = service
//!     .execute(CreateOrderRequest::new("c-1", vec![OrderLineRequest::new("A", 3)]))
//!     .await?;
//! ```

pub mod error;
pub mod memory;
pub mod ports;
pub mod service;

pub use error::{ErrorCode, ErrorReport, OrderError, OrderResult, StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use ports::{CustomerDirectory, OrderStore, ProductCatalog};
pub use service::{CreateOrderService, ValidatedContext};
