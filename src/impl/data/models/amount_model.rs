use std::str::FromStr;

use fractic_server_error::ServerError;
use serde_json::Value;

use crate::errors::InvalidAmount;

#[derive(Debug)]
pub(crate) struct AmountModel(pub f64);
impl FromStr for AmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Receipts use a comma as decimal mark ("12,50").
        let raw = s.trim().replace(',', ".");
        let amount = raw
            .parse::<f64>()
            .map_err(|e| InvalidAmount::with_debug(s, &e))?;
        if !amount.is_finite() {
            return Err(InvalidAmount::new(s));
        }
        Ok(AmountModel(amount))
    }
}

impl AmountModel {
    /// Total variant: `None` for anything that is not a finite amount.
    pub(crate) fn from_value(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|a| a.is_finite()),
            Value::String(s) => AmountModel::from_str(s).ok().map(Into::into),
            _ => None,
        }
    }
}

impl From<AmountModel> for f64 {
    fn from(model: AmountModel) -> Self {
        model.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_comma_decimal_separator() {
        assert_eq!(AmountModel::from_value(&json!("12,50")), Some(12.5));
        assert_eq!(AmountModel::from_value(&json!(" 7.20 ")), Some(7.2));
    }

    #[test]
    fn accepts_numbers_directly() {
        assert_eq!(AmountModel::from_value(&json!(48)), Some(48.0));
        assert_eq!(AmountModel::from_value(&json!(3.75)), Some(3.75));
    }

    #[test]
    fn unparseable_values_are_unresolved() {
        assert_eq!(AmountModel::from_value(&json!("abc")), None);
        assert_eq!(AmountModel::from_value(&json!("inf")), None);
        assert_eq!(AmountModel::from_value(&json!("NaN")), None);
        assert_eq!(AmountModel::from_value(&json!(true)), None);
        assert_eq!(AmountModel::from_value(&json!({ "value": 1 })), None);
    }

    #[test]
    fn fallible_parser_reports_error() {
        assert!(AmountModel::from_str("12,,5").is_err());
        assert!(AmountModel::from_str("abc").is_err());
    }
}
