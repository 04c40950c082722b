//! # caja-core: Pure Business Logic for Caja
//!
//! This crate is the **heart** of Caja. It contains all business logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Caja Architecture                            │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                       UI Layer                              │   │
//! │  │   Sale form ──► Cart view ──► History ──► Summary cards     │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                ★ caja-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌───────┐ │   │
//! │  │  │  types  │ │  money  │ │  cart   │ │ pricing │ │period │ │   │
//! │  │  │ Product │ │  Money  │ │  Cart   │ │wholesale│ │monthly│ │   │
//! │  │  │ Ledger  │ │ integer │ │snapshots│ │discount │ │totals │ │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └───────┘ │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 caja-db (Database Layer)                    │   │
//! │  │       SQLite repositories + atomic sale/reversal commits    │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LedgerTransaction, closed enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The in-progress sale with stock snapshots
//! - [`pricing`] - Wholesale discount pricing
//! - [`period`] - Monthly summaries and the history filter
//! - [`validation`] - Boundary validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Explicit Snapshots**: Logic consumes inventory/ledger snapshots passed
//!    as arguments, never ambient global state
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::cart::Cart;
//! use caja_core::types::{Product, ProductCategory};
//! use chrono::{NaiveDate, Utc};
//!
//! let cera = Product {
//!     id: "11111111-1111-4111-8111-111111111111".into(),
//!     category: ProductCategory::Capilar,
//!     name: "Cera Inmortal".into(),
//!     price_cents: 20_000,
//!     stock: 12,
//!     created_at: Utc::now(),
//!     updated_at: Utc::now(),
//! };
//!
//! let mut cart = Cart::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! cart.add_item(&cera, 3).unwrap();
//!
//! let pricing = cart.pricing();
//! assert_eq!(pricing.subtotal.cents(), 60_000);
//! assert_eq!(pricing.total.cents(), 60_000); // below wholesale threshold
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod period;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use caja_core::Money` instead of
// `use caja_core::money::Money`

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use period::{aggregate_period, filter_and_sort, LedgerFilter, PeriodSummary};
pub use pricing::{compute_pricing, Pricing};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Subtotal (minor units) at which the wholesale discount applies.
///
/// ## Business Reason
/// Bulk buyers (other shops restocking) get an automatic flat discount
/// once the cart subtotal reaches this level.
pub const WHOLESALE_THRESHOLD_CENTS: i64 = 200_000;

/// Wholesale discount in basis points (1000 = 10%).
pub const WHOLESALE_DISCOUNT_BPS: u32 = 1_000;

/// Maximum quantity of a single product in a cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
