//! Amount parsing and formatting.
//!
//! Staff type amounts into free-form inputs ("₱1,500", "1500.00 ", ""), so
//! parsing cleans the text before handing it to [`Decimal`]. A blank input is
//! not an error here: it parses to `None` and the payment ledger decides
//! whether an amount was required.

use rust_decimal::Decimal;
use thiserror::Error;

pub const CURRENCY_SYMBOL: &str = "₱";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountParseError {
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
    #[error("Amount cannot be negative")]
    Negative,
    #[error("Amount has more than two decimal places")]
    TooPrecise,
}

/// Parse an entered amount. Blank input yields `Ok(None)`.
pub fn parse_amount(input: &str) -> Result<Option<Decimal>, AmountParseError> {
    let cleaned: String = input
        .trim()
        .replace(CURRENCY_SYMBOL, "")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    let amount = cleaned
        .parse::<Decimal>()
        .map_err(|e| AmountParseError::InvalidFormat(format!("{}: {}", input.trim(), e)))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountParseError::Negative);
    }
    if amount.normalize().scale() > 2 {
        return Err(AmountParseError::TooPrecise);
    }

    Ok(Some(amount))
}

/// Clamp a derived amount at zero.
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Format as currency with thousands separators, e.g. `₱1,234.50`.
///
/// Negative values keep a leading `-` ahead of the symbol (`-₱250.00`);
/// anything that rounds to zero prints unsigned.
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_cleans_input() {
        assert_eq!(parse_amount("600").unwrap(), Some(dec!(600)));
        assert_eq!(parse_amount(" ₱1,500.50 ").unwrap(), Some(dec!(1500.50)));
        assert_eq!(parse_amount("1 000").unwrap(), Some(dec!(1000)));
        assert_eq!(parse_amount("0").unwrap(), Some(dec!(0)));
    }

    #[test]
    fn test_parse_amount_blank_is_none() {
        assert_eq!(parse_amount("").unwrap(), None);
        assert_eq!(parse_amount("   ").unwrap(), None);
        assert_eq!(parse_amount("₱").unwrap(), None);
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(
            parse_amount("abc"),
            Err(AmountParseError::InvalidFormat(_))
        ));
        assert_eq!(parse_amount("-5"), Err(AmountParseError::Negative));
        assert_eq!(parse_amount("10.005"), Err(AmountParseError::TooPrecise));
        // trailing zeros do not count as precision
        assert_eq!(parse_amount("10.500").unwrap(), Some(dec!(10.500)));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(0)), "₱0.00");
        assert_eq!(format_amount(dec!(999.5)), "₱999.50");
        assert_eq!(format_amount(dec!(1000)), "₱1,000.00");
        assert_eq!(format_amount(dec!(1234567.891)), "₱1,234,567.89");
        assert_eq!(format_amount(dec!(-250)), "-₱250.00");
        assert_eq!(format_amount(dec!(-0.001)), "₱0.00");
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(dec!(-0.01)), dec!(0));
        assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
    }
}
