use std::{str::FromStr, sync::LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fractic_server_error::ServerError;
use regex::Regex;
use serde_json::Value;

use crate::errors::InvalidReceiptDate;

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4})$").expect("day-first date pattern is valid")
});
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("ISO date pattern is valid"));

/// Fallback formats, tried in order. Numeric formats are day-first, and
/// two-digit years come before `%Y` (which would accept "25" as year 25).
const GENERIC_DATE_FORMATS: &[&str] = &[
    "%d-%m-%y",
    "%d/%m/%y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];
const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M",
];

/// Calendar date of a receipt, parsed from any of the spellings backends and
/// OCR output use.
#[derive(Debug)]
pub(crate) struct ISODateModel(NaiveDate);
impl FromStr for ISODateModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        parse_known(trimmed)
            .or_else(|| {
                // Date-times and trailing noise ("14/11/2025 10:32 CASSA 2").
                trimmed
                    .get(..10)
                    .filter(|_| trimmed.len() > 10)
                    .and_then(parse_known)
            })
            .map(ISODateModel)
            .ok_or_else(|| InvalidReceiptDate::new(s))
    }
}

impl ISODateModel {
    /// Total variant: `None` when the value is not a recognizable date.
    pub(crate) fn from_value(value: &Value) -> Option<NaiveDate> {
        match value {
            Value::String(s) => ISODateModel::from_str(s).ok().map(Into::into),
            _ => None,
        }
    }
}

fn parse_known(s: &str) -> Option<NaiveDate> {
    if let Some(caps) = DAY_FIRST.captures(s) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if ISO_DATE.is_match(s) {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    }
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            GENERIC_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

impl From<ISODateModel> for NaiveDate {
    fn from(model: ISODateModel) -> Self {
        model.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn iso(value: Value) -> String {
        ISODateModel::from_value(&value)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    #[test]
    fn day_first_formats() {
        assert_eq!(iso(json!("14-11-2025")), "2025-11-14");
        assert_eq!(iso(json!("14/11/2025")), "2025-11-14");
        assert_eq!(iso(json!("1/2/2025")), "2025-02-01");
        assert_eq!(iso(json!("03-04-2025")), "2025-04-03");
    }

    #[test]
    fn iso_dates_are_kept() {
        assert_eq!(iso(json!("2025-11-14")), "2025-11-14");
    }

    #[test]
    fn generic_fallbacks() {
        assert_eq!(iso(json!("14.11.2025")), "2025-11-14");
        assert_eq!(iso(json!("2025/11/14")), "2025-11-14");
        assert_eq!(iso(json!("14/11/25")), "2025-11-14");
        assert_eq!(iso(json!("2025-11-14T09:30:00Z")), "2025-11-14");
        assert_eq!(iso(json!("14/11/2025 10:32 CASSA 2")), "2025-11-14");
        assert_eq!(iso(json!("14 Nov 2025")), "2025-11-14");
    }

    #[test]
    fn unparseable_dates_are_unresolved() {
        assert_eq!(iso(json!("not-a-date")), "");
        assert_eq!(iso(json!("2025-02-30")), "");
        assert_eq!(iso(json!("31-13-2025")), "");
        assert_eq!(iso(json!(20251114)), "");
        assert_eq!(iso(json!("")), "");
    }
}
