//! CSV format handling for cart inputs and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Raw record structures for deserialization (all fields as strings)
//! - Conversion from raw records to domain types
//! - Ledger output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    Coupon, DiscountKind, LedgerRecord, LineItem, LoyaltyRedemption, OrderId, OrderPromotion,
    PriceType, PricingError, ProductDiscount, ProductRef, TaxRates,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Header of the ledger CSV written to stdout
pub const LEDGER_HEADER: [&str; 11] = [
    "order",
    "bill_number",
    "subtotal",
    "cgst",
    "sgst",
    "igst",
    "tax_amount",
    "discount_amount",
    "loyalty_points",
    "loyalty_discount_amount",
    "total_amount",
];

/// Raw cart line: `order,product,quantity,price,cgst,sgst,igst,price_type`
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvLineItem {
    pub order: String,
    pub product: String,
    pub quantity: String,
    pub price: String,
    pub cgst: Option<String>,
    pub sgst: Option<String>,
    pub igst: Option<String>,
    pub price_type: Option<String>,
}

/// Raw order promotion:
/// `order,coupon_kind,coupon_value,points_requested,points_available,rupees_per_point`
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvPromotion {
    pub order: String,
    pub coupon_kind: Option<String>,
    pub coupon_value: Option<String>,
    pub points_requested: Option<String>,
    pub points_available: Option<String>,
    pub rupees_per_point: Option<String>,
}

/// Raw product discount: `product,kind,value,start_at,end_at`
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvDiscount {
    pub product: String,
    pub kind: String,
    pub value: String,
    pub start_at: String,
    pub end_at: String,
}

/// Raw stock level: `product,available`
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvStock {
    pub product: String,
    pub available: String,
}

/// Convert a raw cart line into the order it belongs to and a `LineItem`
///
/// Blank tax rates are read as zero and a blank price type as fixed.
///
/// # Errors
///
/// Returns `InvalidRecord` if the order or product is blank, a number does
/// not parse, the quantity is not positive, the price or a rate is negative,
/// or the price type is unknown.
pub fn convert_line_item(record: CsvLineItem) -> Result<(OrderId, LineItem), PricingError> {
    let order = required("order", &record.order, None)?;
    let product = required("product", &record.product, Some(&order))?;
    let context = format!("product {} in order {}", product, order);

    let quantity = parse_decimal("quantity", &record.quantity, &context)?;
    if quantity <= Decimal::ZERO {
        return Err(PricingError::invalid_record(
            "quantity",
            &record.quantity,
            Some(&context),
        ));
    }

    let price = parse_non_negative("price", &record.price, &context)?;
    let rates = TaxRates::new(
        parse_rate("cgst", record.cgst.as_deref(), &context)?,
        parse_rate("sgst", record.sgst.as_deref(), &context)?,
        parse_rate("igst", record.igst.as_deref(), &context)?,
    );

    let price_type = match record
        .price_type
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .as_deref()
    {
        None | Some("") | Some("fixed") => PriceType::Fixed,
        Some("weight") => PriceType::Weight,
        Some(other) => {
            return Err(PricingError::invalid_record(
                "price_type",
                other,
                Some(&context),
            ))
        }
    };

    let mut item = LineItem::new(product, quantity, price, rates);
    item.price_type = price_type;
    Ok((order, item))
}

/// Convert a raw promotion row into an order's coupon and loyalty request
///
/// A blank `coupon_kind` means no coupon; a blank `points_requested` means
/// no redemption.
pub fn convert_promotion(record: CsvPromotion) -> Result<(OrderId, OrderPromotion), PricingError> {
    let order = required("order", &record.order, None)?;
    let context = format!("order {}", order);

    let coupon = match non_blank(record.coupon_kind.as_deref()) {
        None => None,
        Some(kind) => {
            let kind = DiscountKind::from_str(kind)
                .map_err(|_| PricingError::invalid_record("coupon_kind", kind, Some(&context)))?;
            let raw_value = record.coupon_value.as_deref().unwrap_or("");
            let value = parse_non_negative("coupon_value", raw_value, &context)?;
            Some(Coupon { kind, value })
        }
    };

    let loyalty = match non_blank(record.points_requested.as_deref()) {
        None => None,
        Some(requested) => {
            let points_requested = parse_points("points_requested", requested, &context)?;
            let points_available = match non_blank(record.points_available.as_deref()) {
                Some(raw) => parse_points("points_available", raw, &context)?,
                None => 0,
            };
            let raw_rate = record.rupees_per_point.as_deref().unwrap_or("");
            let rupees_per_point = parse_non_negative("rupees_per_point", raw_rate, &context)?;
            Some(LoyaltyRedemption {
                points_requested,
                points_available,
                rupees_per_point,
            })
        }
    };

    Ok((order, OrderPromotion { coupon, loyalty }))
}

/// Convert a raw discount row into a product's time-windowed discount
pub fn convert_discount(record: CsvDiscount) -> Result<(ProductRef, ProductDiscount), PricingError> {
    let product = required("product", &record.product, None)?;
    let context = format!("product {}", product);

    let kind = DiscountKind::from_str(&record.kind)
        .map_err(|_| PricingError::invalid_record("kind", &record.kind, Some(&context)))?;
    let value = parse_non_negative("value", &record.value, &context)?;
    let start_at = parse_timestamp("start_at", &record.start_at, &context)?;
    let end_at = parse_timestamp("end_at", &record.end_at, &context)?;

    Ok((
        product,
        ProductDiscount {
            start_at,
            end_at,
            kind,
            value,
        },
    ))
}

/// Convert a raw stock row into a product's available quantity
pub fn convert_stock(record: CsvStock) -> Result<(ProductRef, Decimal), PricingError> {
    let product = required("product", &record.product, None)?;
    let context = format!("product {}", product);
    let available = parse_non_negative("available", &record.available, &context)?;
    Ok((product, available))
}

/// Write ledger records as CSV
///
/// Records are written in the order given. Amounts are printed with exactly
/// two decimal places; a missing bill number is written as an empty field.
///
/// # Errors
///
/// Returns an error if writing to the output fails
pub fn write_ledger_csv(
    records: &[LedgerRecord],
    output: &mut dyn Write,
) -> Result<(), PricingError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(LEDGER_HEADER)?;

    for record in records {
        writer.write_record(&[
            record.order.clone(),
            record
                .bill_number
                .as_ref()
                .map(|b| b.to_string())
                .unwrap_or_default(),
            money(record.subtotal),
            money(record.cgst),
            money(record.sgst),
            money(record.igst),
            money(record.tax_amount),
            money(record.discount_amount),
            record.loyalty_points_redeemed.to_string(),
            money(record.loyalty_discount_amount),
            money(record.total_amount),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn required(field: &str, raw: &str, context: Option<&str>) -> Result<String, PricingError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(PricingError::invalid_record(field, raw, context));
    }
    Ok(value.to_string())
}

fn parse_decimal(field: &str, raw: &str, context: &str) -> Result<Decimal, PricingError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| PricingError::invalid_record(field, raw, Some(context)))
}

fn parse_non_negative(field: &str, raw: &str, context: &str) -> Result<Decimal, PricingError> {
    let value = parse_decimal(field, raw, context)?;
    if value < Decimal::ZERO {
        return Err(PricingError::invalid_record(field, raw, Some(context)));
    }
    Ok(value)
}

fn parse_rate(field: &str, raw: Option<&str>, context: &str) -> Result<Decimal, PricingError> {
    match non_blank(raw) {
        None => Ok(Decimal::ZERO),
        Some(value) => parse_non_negative(field, value, context),
    }
}

fn parse_points(field: &str, raw: &str, context: &str) -> Result<u64, PricingError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| PricingError::invalid_record(field, raw, Some(context)))
}

fn parse_timestamp(field: &str, raw: &str, context: &str) -> Result<DateTime<Utc>, PricingError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| PricingError::invalid_record(field, raw, Some(context)))
}
