//! # Cart
//!
//! The in-progress sale: ordered lines plus the sale date and payment
//! method being drafted.
//!
//! ## Stock Snapshots
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Cart Line Lifecycle                               │
//! │                                                                     │
//! │  add_item(product, qty)                                             │
//! │       │                                                             │
//! │       ├── qty <= 0?                    → ValidationError            │
//! │       ├── carried + qty > stock?       → InsufficientStock          │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CartItem { stock_at_selection: product.stock, ... }                │
//! │                                                                     │
//! │  The snapshot is the authoritative pre-sale stock value:            │
//! │  • commit writes   stock_at_selection - quantity                    │
//! │  • reversal writes stock_at_selection back verbatim                 │
//! │                                                                     │
//! │  Adding never mutates the product (no reservation semantics);       │
//! │  stock only changes at commit.                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pricing::{compute_pricing, Pricing};
use crate::types::{PaymentMethod, Product, SaleLine};
use crate::validation::validate_quantity;
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Cart Item
// =============================================================================

/// A line of the in-progress sale.
///
/// ## Design Notes
/// - `unit_price_cents` is frozen when the product first enters the cart;
///   a later price edit does not reprice lines already drafted.
/// - `stock_at_selection` is the product's stock at that same moment and
///   is what reversal restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Quantity drafted. Always > 0.
    pub quantity: i64,

    /// Price in minor units at time of adding (frozen).
    pub unit_price_cents: i64,

    /// `unit_price_cents × quantity`, maintained on every quantity change.
    pub line_subtotal_cents: i64,

    /// Product stock observed when the line was added.
    pub stock_at_selection: i64,
}

impl CartItem {
    /// Creates a cart line from a product and quantity, freezing the
    /// price and the stock snapshot.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
            unit_price_cents: product.price_cents,
            line_subtotal_cents: product.price_cents * quantity,
            stock_at_selection: product.stock,
        }
    }
}

impl From<&CartItem> for SaleLine {
    fn from(item: &CartItem) -> Self {
        SaleLine {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_subtotal_cents: item.line_subtotal_cents,
            stock_at_selection: item.stock_at_selection,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress sale.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again
///   merges into the existing line, keeping its original snapshot).
/// - A product's drafted quantity never exceeds the stock observed at
///   cart-build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in the order their products first entered the cart.
    pub items: Vec<CartItem>,

    /// Calendar day the sale will be recorded under.
    pub sale_date: NaiveDate,

    pub payment_method: PaymentMethod,
}

impl Cart {
    /// Creates an empty cart for the given sale date.
    pub fn new(sale_date: NaiveDate) -> Self {
        Cart {
            items: Vec::new(),
            sale_date,
            payment_method: PaymentMethod::default(),
        }
    }

    /// Creates an empty cart dated today (local calendar date).
    pub fn today() -> Self {
        Cart::new(Local::now().date_naive())
    }

    /// Adds a product to the cart, or merges into its existing line.
    ///
    /// ## Errors
    /// - `Validation` if `quantity <= 0`
    /// - `QuantityTooLarge` if the line would exceed the per-line maximum
    /// - `InsufficientStock` if the product's drafted quantity (existing
    ///   line included) would exceed `product.stock`
    ///
    /// Never mutates the product: stock is only decremented at commit.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let carried = self.quantity_of(&product.id);
        if carried + quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: carried + quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        if carried + quantity > product.stock {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock - carried,
                requested: quantity,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity += quantity;
            item.line_subtotal_cents = item.unit_price_cents * item.quantity;
        } else {
            self.items.push(CartItem::from_product(product, quantity));
        }

        Ok(())
    }

    /// Removes the line for the given product. No-op when absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Drops all lines and restores the defaults for a fresh sale.
    pub fn reset(&mut self, sale_date: NaiveDate) {
        self.items.clear();
        self.sale_date = sale_date;
        self.payment_method = PaymentMethod::default();
    }

    /// Quantity currently drafted for a product.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Number of lines (distinct products).
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prices the cart as it stands.
    pub fn pricing(&self) -> Pricing {
        compute_pricing(&self.items)
    }

    /// Auto-generated ledger description for this sale.
    pub fn sale_description(&self) -> String {
        let modality = if self.pricing().is_wholesale {
            "Por Mayor"
        } else {
            "Detal"
        };
        format!(
            "Venta ({}) de {} tipo(s) de producto.",
            modality,
            self.line_count()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
