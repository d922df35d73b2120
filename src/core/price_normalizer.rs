//! Price normalization
//!
//! Maps a catalog price onto a canonical tax-exclusive **base price** and the
//! price shown to the customer, so that line totals are always
//! `base_price × quantity` whatever the merchant's tax mode. Computing from
//! the catalog price directly would count tax twice for inclusive modes.
//!
//! | Mode             | base                     | display              |
//! |------------------|--------------------------|----------------------|
//! | Exclusive        | price                    | price × (1 + r/100)  |
//! | Inclusive split  | price / (1 + r/100)      | price                |
//! | Inclusive MRP    | price                    | price                |

use crate::types::TaxMode;
use rust_decimal::Decimal;

/// Base and display unit prices for a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedPrice {
    /// Tax-exclusive unit price (the MRP itself in MRP mode)
    pub base: Decimal,
    /// Unit price the customer sees
    pub display: Decimal,
}

/// `1 + rate/100`
fn tax_factor(rate: Decimal) -> Decimal {
    Decimal::ONE + rate / Decimal::ONE_HUNDRED
}

/// Normalize a unit price under the given tax mode
///
/// # Arguments
///
/// * `price` - Unit selling price (after any product discount)
/// * `rate` - Combined effective tax percentage for the line
/// * `mode` - Merchant tax mode
pub fn normalize(price: Decimal, rate: Decimal, mode: TaxMode) -> NormalizedPrice {
    match mode {
        TaxMode::Exclusive => NormalizedPrice {
            base: price,
            display: price * tax_factor(rate),
        },
        TaxMode::InclusiveSplit => {
            // A zero rate would divide by exactly one; skip it
            let base = if rate > Decimal::ZERO {
                price / tax_factor(rate)
            } else {
                price
            };
            NormalizedPrice {
                base,
                display: price,
            }
        }
        TaxMode::InclusiveMrp => NormalizedPrice {
            base: price,
            display: price,
        },
    }
}

/// Portion of a tax-inclusive amount attributable to one tax component
///
/// `amount × component_rate / (100 + total_rate)`. Used to report the tax
/// embedded in MRP prices without changing the amount payable.
///
/// # Returns
///
/// Zero when `total_rate` is not positive
pub fn embedded_tax(amount: Decimal, component_rate: Decimal, total_rate: Decimal) -> Decimal {
    if total_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount * component_rate / (Decimal::ONE_HUNDRED + total_rate)
}
