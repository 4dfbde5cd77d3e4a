//! # Pricing & Stock Resolution
//!
//! Turns requested lines into priced lines and stock updates, using only
//! the catalog snapshot read for this request.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  requested lines ──► consolidate (merge duplicate product ids)         │
//! │                            │                                           │
//! │                            ▼                                           │
//! │  pass 1, every line: resulting = snapshot[id].quantity - requested     │
//! │                            │                                           │
//! │              any resulting < 0 ?                                       │
//! │               ├── yes ──► InsufficientStock(every offending line)      │
//! │               └── no                                                   │
//! │                            ▼                                           │
//! │  pass 2, every line: price = snapshot[id].price_cents                  │
//! │                            └──► PricedOrder { lines, stock_updates,    │
//! │                                               total }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities must be positive; the caller never supplies a price.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{OrderLineRequest, PricedLine, Product, StockShortfall, StockUpdate};
use crate::validation::{consolidate_lines, validate_quantity, CatalogSnapshot};

/// Output of [`resolve`]: everything the committer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// One line per distinct product, first-occurrence order.
    pub lines: Vec<PricedLine>,
    /// One update per distinct product.
    pub stock_updates: Vec<StockUpdate>,
    /// Sum of line totals.
    pub total: Money,
}

/// Prices the request against the snapshot and computes stock updates.
///
/// Stock is checked for every line before anything is priced, so a
/// shortfall is always reported in full.
///
/// ## Errors
/// - `Validation(MustBePositive)` if a line quantity is zero or negative
/// - `InsufficientStock` listing every product that would go negative
/// - `ProductNotFound` if a line names an id outside the snapshot
/// - `Validation(OutOfRange)` if a quantity or amount overflows
pub fn resolve(lines: &[OrderLineRequest], snapshot: &CatalogSnapshot) -> CoreResult<PricedOrder> {
    for line in lines {
        validate_quantity(line.quantity)?;
    }
    let lines = consolidate_lines(lines)?;

    let mut checked: Vec<(&OrderLineRequest, &Product, i64)> = Vec::with_capacity(lines.len());
    let mut shortfalls: Vec<StockShortfall> = Vec::new();

    for line in &lines {
        let product = snapshot.get(&line.product_id)?;
        let resulting = product
            .quantity
            .checked_sub(line.quantity)
            .ok_or_else(|| amount_overflow("quantity"))?;

        if resulting < 0 {
            shortfalls.push(StockShortfall::new(&line.product_id, resulting));
        } else {
            checked.push((line, product, resulting));
        }
    }

    if !shortfalls.is_empty() {
        return Err(CoreError::InsufficientStock(shortfalls));
    }

    let mut priced: Vec<PricedLine> = Vec::with_capacity(checked.len());
    let mut stock_updates: Vec<StockUpdate> = Vec::with_capacity(checked.len());
    let mut total = Money::zero();

    for (line, product, resulting) in checked {
        let line_total = product
            .price()
            .checked_multiply_quantity(line.quantity)
            .ok_or_else(|| amount_overflow("line_total"))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| amount_overflow("total"))?;

        priced.push(PricedLine {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price_cents: product.price_cents,
            line_total_cents: line_total.cents(),
        });
        stock_updates.push(StockUpdate {
            product_id: line.product_id.clone(),
            quantity: resulting,
            reserved: line.quantity,
        });
    }

    Ok(PricedOrder {
        lines: priced,
        stock_updates,
        total,
    })
}

fn amount_overflow(field: &str) -> CoreError {
    CoreError::Validation(ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
