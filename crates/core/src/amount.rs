//! Fixed-point amount codec.
//!
//! Human amounts such as `"32.555"` become integer magnitudes scaled by
//! `10^decimals`. Ledger arithmetic only ever sees those integers.

use crate::Rejection;
use num_bigint::BigUint;
use num_traits::Zero;

/// Largest supported decimal precision.
pub const MAX_DECIMALS: u8 = 18;

/// Parse a string of plain ASCII digits. Signs, separators and whitespace
/// yield `None`.
pub fn safe_parse_integer(s: &str) -> Option<BigUint> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(s.as_bytes(), 10)
}

/// Convert a human decimal into its fixed-point magnitude.
///
/// Fractional digits beyond `decimals` are accepted only when they are zeros.
pub fn to_fixed_point(decimal: &str, decimals: u8) -> Result<BigUint, Rejection> {
    if decimals > MAX_DECIMALS {
        return Err(Rejection::InvalidDecimals);
    }

    let (int_part, frac_part) = match decimal.split_once('.') {
        Some((i, f)) if !f.is_empty() => (i, f),
        Some(_) => return Err(Rejection::InvalidAmount),
        None => (decimal, ""),
    };

    if int_part.is_empty() || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::InvalidAmount);
    }

    let scale = decimals as usize;
    let (kept, excess) = frac_part.split_at(frac_part.len().min(scale));
    if excess.bytes().any(|b| b != b'0') {
        return Err(Rejection::InvalidAmount);
    }

    let mut digits = String::with_capacity(int_part.len() + scale);
    digits.push_str(int_part);
    digits.push_str(kept);
    digits.extend(std::iter::repeat_n('0', scale - kept.len()));

    safe_parse_integer(&digits).ok_or(Rejection::InvalidAmount)
}

/// [`to_fixed_point`], rendered as an integer string.
pub fn to_fixed_point_string(decimal: &str, decimals: u8) -> Result<String, Rejection> {
    to_fixed_point(decimal, decimals).map(|n| n.to_string())
}

/// Render a magnitude as a normalized human decimal.
pub fn from_fixed_point(magnitude: &BigUint, decimals: u8) -> String {
    let digits = magnitude.to_string();
    let scale = decimals as usize;
    if scale == 0 {
        return digits;
    }

    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Inverse of [`to_fixed_point_string`].
pub fn from_fixed_point_string(integer: &str, decimals: u8) -> Result<String, Rejection> {
    if decimals > MAX_DECIMALS {
        return Err(Rejection::InvalidDecimals);
    }
    let magnitude = safe_parse_integer(integer).ok_or(Rejection::InvalidAmount)?;
    Ok(from_fixed_point(&magnitude, decimals))
}

/// Parse a magnitude and require it to be strictly positive.
pub(crate) fn positive(decimal: &str, decimals: u8) -> Option<BigUint> {
    to_fixed_point(decimal, decimals)
        .ok()
        .filter(|n| !n.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_decimals() {
        assert_eq!(to_fixed_point_string("32.555", 18).unwrap(), "32555000000000000000");
        assert_eq!(to_fixed_point_string("50", 2).unwrap(), "5000");
        assert_eq!(to_fixed_point_string("0.01", 2).unwrap(), "1");
        assert_eq!(to_fixed_point_string("7", 0).unwrap(), "7");
        assert_eq!(to_fixed_point_string("007.50", 2).unwrap(), "750");
    }

    #[test]
    fn excess_zero_digits_are_exact() {
        assert_eq!(to_fixed_point_string("1.500", 1).unwrap(), "15");
        assert_eq!(to_fixed_point_string("1.0", 0).unwrap(), "1");
    }

    #[test]
    fn rejects_lossy_or_malformed_input() {
        for bad in ["1.05", "-1", "+1", "1e3", "", ".", "1.", ".5", "1.2.3", " 1", "1_000", "abc"] {
            assert_eq!(
                to_fixed_point_string(bad, 1),
                Err(Rejection::InvalidAmount),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_decimals() {
        assert_eq!(to_fixed_point_string("1", 19), Err(Rejection::InvalidDecimals));
        assert_eq!(from_fixed_point_string("1", 19), Err(Rejection::InvalidDecimals));
    }

    #[test]
    fn handles_38_digit_supplies_at_full_precision() {
        let supply = "9".repeat(38);
        let fixed = to_fixed_point_string(&supply, 18).unwrap();
        assert_eq!(fixed.len(), 56);
        assert_eq!(from_fixed_point_string(&fixed, 18).unwrap(), supply);
    }

    #[test]
    fn renders_normalized_decimals() {
        assert_eq!(from_fixed_point_string("5000", 2).unwrap(), "50");
        assert_eq!(from_fixed_point_string("3050", 2).unwrap(), "30.5");
        assert_eq!(from_fixed_point_string("1", 2).unwrap(), "0.01");
        assert_eq!(from_fixed_point_string("0", 18).unwrap(), "0");
        assert_eq!(from_fixed_point_string("120", 0).unwrap(), "120");
    }

    #[test]
    fn safe_parse_never_panics() {
        assert_eq!(safe_parse_integer("123"), Some(BigUint::from(123u32)));
        assert_eq!(safe_parse_integer(""), None);
        assert_eq!(safe_parse_integer("-1"), None);
        assert_eq!(safe_parse_integer("1_0"), None);
        assert_eq!(safe_parse_integer("١٢"), None);
    }

    #[test]
    fn positive_excludes_zero() {
        assert_eq!(positive("0.00", 2), None);
        assert_eq!(positive("0.01", 2), Some(BigUint::from(1u32)));
    }
}
