//! Merchant tax and pricing settings
//!
//! The merchant's tax configuration is modelled as a single sum type,
//! [`TaxMode`], instead of a `mode` flag plus an `inclusive_variant` flag that
//! is only meaningful for one of the modes. Every branch on the tax regime in
//! the engine is a `match` over this enum.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How catalog prices relate to tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxMode {
    /// Catalog price excludes tax; tax is added at checkout
    #[default]
    Exclusive,

    /// Catalog price includes tax; the engine backs out the pre-tax base
    /// and reports tax separately
    InclusiveSplit,

    /// Catalog price is a final MRP; tax is never added to the total and is
    /// only reported for analytics
    InclusiveMrp,
}

impl TaxMode {
    /// Build a mode from the `mode` / `inclusive variant` pair used by
    /// merchant settings records
    ///
    /// The variant is ignored for `exclusive`. An inclusive mode without a
    /// variant defaults to `split`.
    ///
    /// # Returns
    ///
    /// `None` if either string is not recognised
    pub fn from_parts(mode: &str, variant: Option<&str>) -> Option<TaxMode> {
        match mode.trim().to_lowercase().as_str() {
            "exclusive" => Some(TaxMode::Exclusive),
            "inclusive" => match variant.map(|v| v.trim().to_lowercase()).as_deref() {
                None | Some("") | Some("split") => Some(TaxMode::InclusiveSplit),
                Some("mrp") => Some(TaxMode::InclusiveMrp),
                Some(_) => None,
            },
            _ => None,
        }
    }

    /// Returns true if tax figures are added to the payable total
    pub fn charges_tax(&self) -> bool {
        !matches!(self, TaxMode::InclusiveMrp)
    }
}

impl FromStr for TaxMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclusive" => Ok(TaxMode::Exclusive),
            "inclusive" | "inclusive-split" | "split" => Ok(TaxMode::InclusiveSplit),
            "inclusive-mrp" | "mrp" => Ok(TaxMode::InclusiveMrp),
            other => Err(format!(
                "unknown tax mode '{}' (expected exclusive, inclusive-split or inclusive-mrp)",
                other
            )),
        }
    }
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxMode::Exclusive => write!(f, "exclusive"),
            TaxMode::InclusiveSplit => write!(f, "inclusive-split"),
            TaxMode::InclusiveMrp => write!(f, "inclusive-mrp"),
        }
    }
}

/// Whether the sale crosses a state border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TradeType {
    /// Seller and buyer in the same state: CGST + SGST
    #[default]
    IntraState,

    /// Different states: IGST only
    InterState,
}

impl FromStr for TradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intra-state" | "intra" | "intrastate" => Ok(TradeType::IntraState),
            "inter-state" | "inter" | "interstate" => Ok(TradeType::InterState),
            other => Err(format!(
                "unknown trade type '{}' (expected intra-state or inter-state)",
                other
            )),
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::IntraState => write!(f, "intra-state"),
            TradeType::InterState => write!(f, "inter-state"),
        }
    }
}

/// Per-merchant tax configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxSettings {
    pub mode: TaxMode,
    pub trade_type: TradeType,
}

impl TaxSettings {
    pub fn new(mode: TaxMode, trade_type: TradeType) -> Self {
        TaxSettings { mode, trade_type }
    }
}

/// Everything the totals aggregator needs from merchant configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricingSettings {
    /// Tax regime
    pub tax: TaxSettings,

    /// Operator-supplied IGST rate replacing the line's own IGST rate on
    /// inter-state sales
    pub igst_override: Option<Decimal>,

    /// Merchant surcharge percentage applied to the post-coupon amount
    pub additional_tax_rate: Option<Decimal>,

    /// Minimum point balance before a loyalty redemption is honoured
    pub min_points_to_redeem: u64,
}

impl PricingSettings {
    /// Settings with the given tax regime and no overrides
    pub fn new(tax: TaxSettings) -> Self {
        PricingSettings {
            tax,
            ..Default::default()
        }
    }
}
