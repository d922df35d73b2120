use crate::types::{MerchantId, PricingSettings, TaxMode, TaxSettings, TradeType};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MERCHANT_ID: &str = "default";

/// Merchant configuration read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tax_mode: TaxMode,
    pub trade_type: TradeType,
    pub igst_override: Option<Decimal>,
    pub additional_tax_rate: Option<Decimal>,
    pub min_points_to_redeem: u64,
    pub merchant_id: MerchantId,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tax_mode: TaxMode::default(),
            trade_type: TradeType::default(),
            igst_override: None,
            additional_tax_rate: None,
            min_points_to_redeem: 0,
            merchant_id: DEFAULT_MERCHANT_ID.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mode = env_map
            .get("POS_TAX_MODE")
            .map(|s| s.as_str())
            .unwrap_or("exclusive");
        let variant = env_map.get("POS_INCLUSIVE_VARIANT").map(|s| s.as_str());
        let tax_mode = TaxMode::from_parts(mode, variant)
            .or_else(|| {
                // Combined spellings such as "inclusive-mrp" carry their own variant
                variant.is_none().then(|| mode.parse().ok()).flatten()
            })
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "POS_TAX_MODE".to_string(),
                    format!(
                        "must be exclusive or inclusive (variant split or mrp), got {}",
                        match variant {
                            Some(v) => format!("{}/{}", mode, v),
                            None => mode.to_string(),
                        }
                    ),
                )
            })?;

        let trade_type = env_map
            .get("POS_TRADE_TYPE")
            .map(|s| s.as_str())
            .unwrap_or("intra-state")
            .parse::<TradeType>()
            .map_err(|e| ConfigError::InvalidValue("POS_TRADE_TYPE".to_string(), e))?;

        let igst_override = parse_rate(&env_map, "POS_IGST_OVERRIDE")?;
        let additional_tax_rate = parse_rate(&env_map, "POS_ADDITIONAL_TAX_RATE")?;

        let min_points_to_redeem = env_map
            .get("POS_MIN_POINTS_TO_REDEEM")
            .map(|s| s.as_str())
            .unwrap_or("0")
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "POS_MIN_POINTS_TO_REDEEM".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let merchant_id = env_map
            .get("POS_MERCHANT_ID")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MERCHANT_ID)
            .to_string();

        Ok(Config {
            tax_mode,
            trade_type,
            igst_override,
            additional_tax_rate,
            min_points_to_redeem,
            merchant_id,
        })
    }

    /// Pricing settings for the totals aggregator
    pub fn pricing_settings(&self) -> PricingSettings {
        PricingSettings {
            tax: TaxSettings::new(self.tax_mode, self.trade_type),
            igst_override: self.igst_override,
            additional_tax_rate: self.additional_tax_rate,
            min_points_to_redeem: self.min_points_to_redeem,
        }
    }
}

/// Parse an optional non-negative percentage
pub fn parse_rate(
    env_map: &HashMap<String, String>,
    key: &str,
) -> Result<Option<Decimal>, ConfigError> {
    match env_map.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => match Decimal::from_str(raw) {
            Ok(rate) if rate >= Decimal::ZERO => Ok(Some(rate)),
            _ => Err(ConfigError::InvalidValue(
                key.to_string(),
                "must be a non-negative decimal".to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tax_mode, TaxMode::Exclusive);
        assert_eq!(config.trade_type, TradeType::IntraState);
        assert_eq!(config.merchant_id, "default");
    }

    #[rstest]
    #[case::exclusive(&[("POS_TAX_MODE", "exclusive")], TaxMode::Exclusive)]
    #[case::inclusive_defaults_to_split(&[("POS_TAX_MODE", "inclusive")], TaxMode::InclusiveSplit)]
    #[case::inclusive_split(
        &[("POS_TAX_MODE", "inclusive"), ("POS_INCLUSIVE_VARIANT", "split")],
        TaxMode::InclusiveSplit
    )]
    #[case::inclusive_mrp(
        &[("POS_TAX_MODE", "inclusive"), ("POS_INCLUSIVE_VARIANT", "mrp")],
        TaxMode::InclusiveMrp
    )]
    #[case::combined_spelling(&[("POS_TAX_MODE", "inclusive-mrp")], TaxMode::InclusiveMrp)]
    #[case::variant_ignored_for_exclusive(
        &[("POS_TAX_MODE", "exclusive"), ("POS_INCLUSIVE_VARIANT", "mrp")],
        TaxMode::Exclusive
    )]
    fn test_tax_mode(#[case] pairs: &[(&str, &str)], #[case] expected: TaxMode) {
        let config = Config::from_env_map(env(pairs)).unwrap();
        assert_eq!(config.tax_mode, expected);
    }

    #[rstest]
    #[case::unknown_mode(&[("POS_TAX_MODE", "gross")], "POS_TAX_MODE")]
    #[case::unknown_variant(
        &[("POS_TAX_MODE", "inclusive"), ("POS_INCLUSIVE_VARIANT", "net")],
        "POS_TAX_MODE"
    )]
    #[case::trade_type(&[("POS_TRADE_TYPE", "overseas")], "POS_TRADE_TYPE")]
    #[case::negative_override(&[("POS_IGST_OVERRIDE", "-5")], "POS_IGST_OVERRIDE")]
    #[case::garbage_surcharge(&[("POS_ADDITIONAL_TAX_RATE", "two")], "POS_ADDITIONAL_TAX_RATE")]
    #[case::negative_min_points(&[("POS_MIN_POINTS_TO_REDEEM", "-1")], "POS_MIN_POINTS_TO_REDEEM")]
    fn test_invalid_values(#[case] pairs: &[(&str, &str)], #[case] key: &str) {
        match Config::from_env_map(env(pairs)) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, key),
            other => panic!("Expected InvalidValue for {}, got {:?}", key, other),
        }
    }

    #[test]
    fn test_full_configuration() {
        let config = Config::from_env_map(env(&[
            ("POS_TAX_MODE", "inclusive"),
            ("POS_INCLUSIVE_VARIANT", "split"),
            ("POS_TRADE_TYPE", "inter-state"),
            ("POS_IGST_OVERRIDE", "12"),
            ("POS_ADDITIONAL_TAX_RATE", "2.5"),
            ("POS_MIN_POINTS_TO_REDEEM", "100"),
            ("POS_MERCHANT_ID", "store-42"),
        ]))
        .unwrap();

        let settings = config.pricing_settings();
        assert_eq!(settings.tax.mode, TaxMode::InclusiveSplit);
        assert_eq!(settings.tax.trade_type, TradeType::InterState);
        assert_eq!(settings.igst_override, Some(Decimal::from(12)));
        assert_eq!(settings.additional_tax_rate, Some(Decimal::new(25, 1)));
        assert_eq!(settings.min_points_to_redeem, 100);
        assert_eq!(config.merchant_id, "store-42");
    }

    #[test]
    fn test_blank_optional_values_are_unset() {
        let config = Config::from_env_map(env(&[
            ("POS_IGST_OVERRIDE", " "),
            ("POS_MERCHANT_ID", ""),
        ]))
        .unwrap();
        assert_eq!(config.igst_override, None);
        assert_eq!(config.merchant_id, DEFAULT_MERCHANT_ID);
    }
}
