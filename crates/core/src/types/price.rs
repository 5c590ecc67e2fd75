//! Price derivation for catalog products.
//!
//! Prices are currency-agnostic decimal amounts. The backend stores the
//! selling `price` and a `discount` percentage; the pre-discount price shown
//! struck through on product cards is derived here.

use rust_decimal::Decimal;

/// Derive the original (pre-discount) price of a product.
///
/// Returns `price * 100 / discount` when `discount` is positive and zero
/// otherwise. A result that does not fit a `Decimal` is also zero.
///
/// ```
/// use emberline_core::original_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(original_price(Decimal::from(50), Decimal::from(20)), Decimal::from(250));
/// assert_eq!(original_price(Decimal::from(50), Decimal::ZERO), Decimal::ZERO);
/// ```
#[must_use]
pub fn original_price(price: Decimal, discount: Decimal) -> Decimal {
    if discount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(discount))
        .unwrap_or(Decimal::ZERO)
}

/// Format an amount for display with two decimal places (e.g. `$19.99`).
#[must_use]
pub fn display_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_price_with_discount() {
        assert_eq!(
            original_price(Decimal::from(30), Decimal::from(10)),
            Decimal::from(300)
        );
        assert_eq!(
            original_price(Decimal::new(1999, 2), Decimal::from(50)),
            Decimal::new(3998, 2)
        );
    }

    #[test]
    fn test_original_price_without_discount() {
        assert_eq!(
            original_price(Decimal::from(30), Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            original_price(Decimal::from(30), Decimal::from(-5)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_original_price_out_of_range() {
        assert_eq!(original_price(Decimal::MAX, Decimal::from(50)), Decimal::ZERO);
        assert_eq!(
            original_price(Decimal::from(100), Decimal::new(1, 28)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_display_amount() {
        assert_eq!(display_amount(Decimal::new(1999, 2)), "$19.99");
        assert_eq!(display_amount(Decimal::from(5)), "$5.00");
        assert_eq!(display_amount(Decimal::new(33_333, 3)), "$33.33");
    }
}
