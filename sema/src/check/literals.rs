//! Numeric literal parsing shared by raw value checking and literal
//! conversion

/// Parse an integer literal: optional sign, `0x`/`0o`/`0b` prefixes and `_`
/// separators. Returns `None` on malformed text or when the magnitude does
/// not fit in 128 bits.
pub fn parse_integer(text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = if let Some(d) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, d)
    } else if let Some(d) = body.strip_prefix("0o") {
        (8, d)
    } else if let Some(d) = body.strip_prefix("0b") {
        (2, d)
    } else {
        (10, body)
    };
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = u128::from_str_radix(&digits, radix).ok()?;
    if negative {
        if magnitude == 1u128 << 127 {
            return Some(i128::MIN);
        }
        i128::try_from(magnitude).ok().map(|m| -m)
    } else {
        i128::try_from(magnitude).ok()
    }
}

/// Parse a floating-point literal (decimal, `_` separators allowed)
pub fn parse_float(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Range of a fixed-width integer type
pub fn integer_bounds(bits: u32, signed: bool) -> (i128, i128) {
    if signed {
        let max = (1i128 << (bits - 1)) - 1;
        (-max - 1, max)
    } else {
        (0, (1i128 << bits) - 1)
    }
}
