use std::{str::FromStr, sync::LazyLock};

use fractic_server_error::ServerError;
use regex::Regex;
use serde_json::Value;

use crate::{entities::VatRate, errors::InvalidVatRate};

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("numeric token pattern is valid"));

/// VAT rate bucket, from either a clean bucket value ("22") or free text
/// such as OCR output ("A 22.00%", "IVA 10%").
#[derive(Debug)]
pub(crate) struct VatRateModel(VatRate);
impl FromStr for VatRateModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Already normalized data passes through unbucketed.
        if let Some(rate) = VatRate::from_bucket_str(trimmed) {
            return Ok(VatRateModel(rate));
        }
        let token = NUMERIC_TOKEN
            .find(trimmed)
            .ok_or_else(|| InvalidVatRate::new(s))?;
        let percent = token
            .as_str()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|e| InvalidVatRate::with_debug(s, &e))?;
        Ok(VatRateModel(VatRate::snap(percent)))
    }
}

impl VatRateModel {
    /// Total variant: `None` when the value holds no numeric token.
    pub(crate) fn from_value(value: &Value) -> Option<VatRate> {
        match value {
            Value::String(s) => VatRateModel::from_str(s).ok().map(Into::into),
            Value::Number(n) => match n.as_u64() {
                Some(i) => VatRateModel::from_str(&i.to_string()).ok().map(Into::into),
                None => n.as_f64().filter(|p| p.is_finite()).map(VatRate::snap),
            },
            _ => None,
        }
    }
}

impl From<VatRateModel> for VatRate {
    fn from(model: VatRateModel) -> Self {
        model.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bucket(value: Value) -> &'static str {
        VatRateModel::from_value(&value).map_or("", |r| r.as_str())
    }

    #[test]
    fn free_text_is_snapped() {
        assert_eq!(bucket(json!("A 22.00%")), "22");
        assert_eq!(bucket(json!("IVA 10%")), "10");
        assert_eq!(bucket(json!("aliquota 4,00 %")), "4");
        assert_eq!(bucket(json!("5.5%")), "5");
        assert_eq!(bucket(json!("esente 0%")), "0");
    }

    #[test]
    fn first_numeric_token_decides() {
        assert_eq!(bucket(json!("22,00 % su 100")), "22");
        assert_eq!(bucket(json!("10 (ridotta)")), "10");
        assert_eq!(bucket(json!("reparto 1 IVA 22%")), "0");
    }

    #[test]
    fn integers_outside_the_bucket_set_are_snapped() {
        assert_eq!(bucket(json!("3")), "4");
        assert_eq!(bucket(json!("8")), "10");
        assert_eq!(bucket(json!("07")), "5");
    }

    #[test]
    fn clean_bucket_values_pass_through() {
        assert_eq!(bucket(json!("22")), "22");
        assert_eq!(bucket(json!(" 10 ")), "10");
        assert_eq!(bucket(json!(4)), "4");
        assert_eq!(bucket(json!(21.95)), "22");
    }

    #[test]
    fn text_without_numbers_is_unresolved() {
        assert_eq!(bucket(json!("standard")), "");
        assert_eq!(bucket(json!("")), "");
        assert_eq!(bucket(json!(null)), "");
    }
}
