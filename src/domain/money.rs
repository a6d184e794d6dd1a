use super::ValidationError;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// The ledger is currency-agnostic: 1 unit = 100 cents in whatever currency the
/// caller chooses to display.
pub type Cents = i64;

/// Largest single amount accepted from user input: 10 trillion units.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000_000;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents prefixed with a display currency symbol.
/// Example: ("€", 450) -> "€ 4.50", ("$", -1200) -> "-$ 12.00"
pub fn format_amount(symbol: &str, cents: Cents) -> String {
    let formatted = format_cents(cents);
    match formatted.strip_prefix('-') {
        Some(unsigned) => format!("-{} {}", symbol, unsigned),
        None => format!("{} {}", symbol, formatted),
    }
}

/// Parse user-entered amount text into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, ".5" -> 50
///
/// Negative amounts are rejected: direction is carried by the income flag.
/// Amounts above [`MAX_AMOUNT_CENTS`] are rejected as invalid.
pub fn parse_amount(input: &str) -> Result<Cents, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidAmount(input.to_string());

    if trimmed.starts_with('-') {
        return Err(ValidationError::NegativeAmount(input.to_string()));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (units_str, decimal_str) = match unsigned.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (unsigned, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };

    // Anything finer than a cent must be zero padding ("4.500")
    let (cent_digits, rest) = decimal_str.split_at(decimal_str.len().min(2));
    if rest.chars().any(|c| c != '0') {
        return Err(invalid());
    }
    let decimal_cents: i64 = match cent_digits.len() {
        0 => 0,
        // Single digit like "5" means 50 cents
        1 => cent_digits.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => cent_digits.parse().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(decimal_cents))
        .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("€", 450), "€ 4.50");
        assert_eq!(format_amount("R$", 0), "R$ 0.00");
        assert_eq!(format_amount("$", -120000), "-$ 1200.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.00"), Ok(5000));
        assert_eq!(parse_amount("50"), Ok(5000));
        assert_eq!(parse_amount("4.50"), Ok(450));
        assert_eq!(parse_amount("12.5"), Ok(1250));
        assert_eq!(parse_amount("0.01"), Ok(1));
        assert_eq!(parse_amount(".50"), Ok(50));
        assert_eq!(parse_amount("7."), Ok(700));
        assert_eq!(parse_amount("  3000 "), Ok(300000));
        assert_eq!(parse_amount("+2"), Ok(200));
        assert_eq!(parse_amount("0"), Ok(0));
        assert_eq!(parse_amount("4.500"), Ok(450));
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        assert!(matches!(
            parse_amount("-5"),
            Err(ValidationError::NegativeAmount(_))
        ));
        assert!(matches!(
            parse_amount(" -0.50"),
            Err(ValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_parse_amount_invalid() {
        for input in [
            "", "   ", ".", "abc", "12.34.56", "1,50", "1e3", "12.345", "4.-5", "++1", "NaN",
        ] {
            assert!(
                matches!(parse_amount(input), Err(ValidationError::InvalidAmount(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_amount_upper_bound() {
        assert_eq!(parse_amount("10000000000000"), Ok(MAX_AMOUNT_CENTS));
        assert!(matches!(
            parse_amount("10000000000000.01"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("92233720368547758.07"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("99999999999999999999"),
            Err(ValidationError::InvalidAmount(_))
        ));
    }
}
