//! # Repository Module
//!
//! One repository per table group, each implementing one workflow port.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CreateOrderService                                                     │
//! │       │                                                                 │
//! │       ├── CustomerDirectory ──► CustomerRepository  (customers)        │
//! │       ├── ProductCatalog    ──► ProductRepository   (products)         │
//! │       └── OrderStore        ──► OrderRepository     (orders,           │
//! │                                                      order_lines)      │
//! │                                                                         │
//! │  Inherent methods return DbResult; the port impls convert to           │
//! │  StoreResult.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customer;
pub mod order;
pub mod product;
