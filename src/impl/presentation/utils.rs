use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, EUR = 2).
fn decimal_places(currency: Currency) -> u32 {
    currency.exponent().map(u32::from).unwrap_or(0)
}

/// Format cash amount with currency symbol, correct number of decimal places,
/// and proper thousands separators.
///
/// Uses en locale ('.' as decimal mark, i.e. 1,000.00) regardless of the
/// currency, to keep reports comparable.
pub(crate) fn format_amount(amount: f64, currency: Currency) -> String {
    let places = decimal_places(currency);
    let scale = 10_i64.pow(places);
    let minor_units = (amount.abs() * scale as f64).round() as i64;
    let sign = if amount < 0.0 && minor_units != 0 { "-" } else { "" };
    let integer_part = (minor_units / scale).to_formatted_string(&Locale::en);
    if places == 0 {
        format!("{}{} {}", sign, integer_part, currency.symbol())
    } else {
        format!(
            "{}{}.{:0width$} {}",
            sign,
            integer_part,
            minor_units % scale,
            currency.symbol(),
            width = places as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimal_currencies() {
        let eur = Currency::EUR.symbol();
        assert_eq!(format_amount(1234.5, Currency::EUR), format!("1,234.50 {eur}"));
        assert_eq!(format_amount(0.996, Currency::EUR), format!("1.00 {eur}"));
        assert_eq!(format_amount(-12.3, Currency::EUR), format!("-12.30 {eur}"));
    }

    #[test]
    fn formats_zero_decimal_currencies() {
        let jpy = Currency::JPY.symbol();
        assert_eq!(format_amount(1500.4, Currency::JPY), format!("1,500 {jpy}"));
        assert_eq!(format_amount(-0.2, Currency::JPY), format!("0 {jpy}"));
    }
}
