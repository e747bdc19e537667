//! Input helpers shared by the engine and its callers.

use crate::{EngineError, ResultEngine};

/// Parse a decimal amount like `12.50`, `12,5` or `-3` into signed minor units.
///
/// At most two fractional digits are accepted.
pub fn parse_amount_minor(input: &str) -> ResultEngine<i64> {
    let invalid = || EngineError::InvalidAmount(format!("invalid amount: {input}"));
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());

    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits = digits.replace(',', ".");
    let (major, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let major: i64 = major.parse().map_err(|_| overflow())?;
    let minor: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        2 => fraction.parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
    };

    let total = major
        .checked_mul(100)
        .and_then(|v| v.checked_add(minor))
        .ok_or_else(overflow)?;
    Ok(if negative { -total } else { total })
}

/// Format signed minor units as a decimal string (`-12.50`).
pub fn format_amount_minor(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRule(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_amount_minor("10").unwrap(), 1000);
        assert_eq!(parse_amount_minor("10.5").unwrap(), 1050);
        assert_eq!(parse_amount_minor("10,50").unwrap(), 1050);
        assert_eq!(parse_amount_minor("-0.01").unwrap(), -1);
        assert_eq!(parse_amount_minor("+1.00").unwrap(), 100);
        assert_eq!(parse_amount_minor("  2.30 ").unwrap(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_amount_minor("").is_err());
        assert!(parse_amount_minor("-").is_err());
        assert!(parse_amount_minor("12.345").is_err());
        assert!(parse_amount_minor("1.2.3").is_err());
        assert!(parse_amount_minor("abc").is_err());
        assert!(parse_amount_minor(".50").is_err());
    }

    #[test]
    fn format_pads_minor_units() {
        assert_eq!(format_amount_minor(0), "0.00");
        assert_eq!(format_amount_minor(5), "0.05");
        assert_eq!(format_amount_minor(-1250), "-12.50");
    }
}
