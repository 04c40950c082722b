//! # Pricing Calculator
//!
//! Turns a cart into a priced sale: subtotal, wholesale flag, discount,
//! total. Pure and infallible; an empty cart prices to all zeros.
//!
//! ## Wholesale Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  subtotal  = Σ line_subtotal (left-to-right)                        │
//! │  wholesale = subtotal >= 200,000                                    │
//! │  discount  = wholesale ? subtotal × 10% : 0                         │
//! │  total     = subtotal - discount                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line subtotals were computed when each line entered the cart
//! (`unit_price × quantity`); this module only sums them, so the same cart
//! always prices to the same result.

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::money::Money;
use crate::{WHOLESALE_DISCOUNT_BPS, WHOLESALE_THRESHOLD_CENTS};

/// Result of pricing a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub subtotal: Money,
    /// Whether the wholesale discount applies.
    pub is_wholesale: bool,
    /// Zero unless `is_wholesale`.
    pub discount: Money,
    /// `subtotal - discount`.
    pub total: Money,
}

impl Pricing {
    /// Pricing of an empty cart.
    pub const fn zero() -> Self {
        Pricing {
            subtotal: Money::zero(),
            is_wholesale: false,
            discount: Money::zero(),
            total: Money::zero(),
        }
    }
}

/// Prices a sequence of cart lines.
///
/// ## Example
/// ```rust
/// use caja_core::pricing::compute_pricing;
/// use caja_core::cart::CartItem;
///
/// let cart = [CartItem {
///     product_id: "p1".into(),
///     name: "Kit".into(),
///     quantity: 1,
///     unit_price_cents: 250_000,
///     line_subtotal_cents: 250_000,
///     stock_at_selection: 4,
/// }];
/// let pricing = compute_pricing(&cart);
/// assert!(pricing.is_wholesale);
/// assert_eq!(pricing.discount.cents(), 25_000);
/// assert_eq!(pricing.total.cents(), 225_000);
/// ```
pub fn compute_pricing(items: &[CartItem]) -> Pricing {
    let subtotal: Money = items
        .iter()
        .map(|item| Money::from_cents(item.line_subtotal_cents))
        .sum();

    let is_wholesale = subtotal.cents() >= WHOLESALE_THRESHOLD_CENTS;
    let discount = if is_wholesale {
        subtotal.percentage(WHOLESALE_DISCOUNT_BPS)
    } else {
        Money::zero()
    };

    Pricing {
        subtotal,
        is_wholesale,
        discount,
        total: subtotal - discount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, quantity: i64, unit_price_cents: i64) -> CartItem {
        CartItem {
            product_id: format!("id-{name}"),
            name: name.to_string(),
            quantity,
            unit_price_cents,
            line_subtotal_cents: unit_price_cents * quantity,
            stock_at_selection: quantity + 10,
        }
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        assert_eq!(compute_pricing(&[]), Pricing::zero());
    }

    #[test]
    fn test_retail_sale_no_discount() {
        // 3 x Cera at 20,000 = 60,000, below the threshold
        let pricing = compute_pricing(&[line("Cera", 3, 20_000)]);
        assert_eq!(pricing.subtotal.cents(), 60_000);
        assert!(!pricing.is_wholesale);
        assert_eq!(pricing.discount.cents(), 0);
        assert_eq!(pricing.total.cents(), 60_000);
    }

    #[test]
    fn test_wholesale_sale_discounted() {
        // 1 x Kit at 250,000 crosses the threshold
        let pricing = compute_pricing(&[line("Kit", 1, 250_000)]);
        assert_eq!(pricing.subtotal.cents(), 250_000);
        assert!(pricing.is_wholesale);
        assert_eq!(pricing.discount.cents(), 25_000);
        assert_eq!(pricing.total.cents(), 225_000);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let pricing = compute_pricing(&[line("Maquina", 1, 200_000)]);
        assert!(pricing.is_wholesale);
        assert_eq!(pricing.discount.cents(), 20_000);

        let pricing = compute_pricing(&[line("Maquina", 1, 199_999)]);
        assert!(!pricing.is_wholesale);
        assert_eq!(pricing.discount.cents(), 0);
    }

    #[test]
    fn test_total_equals_subtotal_minus_discount() {
        let carts = [
            vec![],
            vec![line("Cera", 3, 20_000)],
            vec![line("Kit", 1, 250_000)],
            vec![line("Cera", 2, 42_000), line("Aceite", 5, 35_000)],
        ];
        for cart in &carts {
            let p = compute_pricing(cart);
            assert_eq!(p.total, p.subtotal - p.discount);
            assert_eq!(p.discount.is_zero(), !p.is_wholesale);
        }
    }

    #[test]
    fn test_multi_line_subtotal_sums_in_order() {
        let pricing = compute_pricing(&[line("Cera", 2, 42_000), line("Aceite", 5, 35_000)]);
        assert_eq!(pricing.subtotal.cents(), 2 * 42_000 + 5 * 35_000);
    }
}
