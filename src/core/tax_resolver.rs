//! Tax resolution
//!
//! Picks the side of the GST split that applies to a sale: CGST + SGST for
//! intra-state trade, IGST for inter-state trade. Rates are taken as entered;
//! the resolver never assumes CGST and SGST are equal halves.

use crate::types::{LineItem, TaxRates, TradeType};
use rust_decimal::Decimal;

/// Resolve the effective rates for a line
///
/// # Arguments
///
/// * `line` - The cart line whose configured rates are used
/// * `trade_type` - Intra- or inter-state sale
/// * `igst_override` - Operator-supplied IGST rate; wins over the line's
///   own IGST on inter-state sales and is ignored otherwise
///
/// # Returns
///
/// A rate triple with exactly one side populated
pub fn resolve(line: &LineItem, trade_type: TradeType, igst_override: Option<Decimal>) -> TaxRates {
    match trade_type {
        TradeType::InterState => {
            TaxRates::inter_state(igst_override.unwrap_or(line.tax_rates.igst))
        }
        TradeType::IntraState => {
            TaxRates::intra_state(line.tax_rates.cgst, line.tax_rates.sgst)
        }
    }
}
