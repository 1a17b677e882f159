//! Render folded float constants as canonical decimal text.
//!
//! Constants are stored as text in the registry, so two runs must agree byte-for-byte on how a
//! float is written. The layout is the shortest round-trip digit string in “general” form:
//! positional notation for decimal exponents in `-4..6`, exponent notation otherwise, with a sign
//! and at least two exponent digits (`1e+06`, `2.5e-07`).
//!
//! ## Examples
//! ```rust
//! use cuegen_core::numbers::format_general;
//!
//! assert_eq!(format_general(3.14), "3.14");
//! assert_eq!(format_general(1_000_000.0), "1e+06");
//! assert_eq!(format_general(0.0001), "0.0001");
//! ```

/// Exponent at which positional notation switches to exponent notation.
const EXPONENT_THRESHOLD: i32 = 6;

/// Smallest exponent still written positionally.
const SMALLEST_POSITIONAL_EXPONENT: i32 = -4;

/// Format a float in shortest general notation.
///
/// ## Notes
/// - Digits come from Rust's shortest round-trip formatting; only the layout is adjusted.
/// - Non-finite values are spelled `+Inf`, `-Inf` and `NaN`.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let sign = if value < 0.0 { "-" } else { "" };

    if exp < SMALLEST_POSITIONAL_EXPONENT || exp >= EXPONENT_THRESHOLD {
        let (head, tail) = digits.split_at(1);
        let frac = if tail.is_empty() { String::new() } else { format!(".{tail}") };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{head}{frac}e{exp_sign}{:02}", exp.unsigned_abs());
    }

    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        let pad = "0".repeat(int_len - digits.len());
        format!("{sign}{digits}{pad}")
    } else {
        let (int_part, frac) = digits.split_at(int_len);
        format!("{sign}{int_part}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_range() {
        assert_eq!(format_general(1.0), "1");
        assert_eq!(format_general(2.5), "2.5");
        assert_eq!(format_general(100000.0), "100000");
        assert_eq!(format_general(123.456), "123.456");
        assert_eq!(format_general(-0.5), "-0.5");
    }

    #[test]
    fn test_exponent_range() {
        assert_eq!(format_general(1e21), "1e+21");
        assert_eq!(format_general(1234567.0), "1.234567e+06");
        assert_eq!(format_general(0.00001), "1e-05");
        assert_eq!(format_general(-2.5e-7), "-2.5e-07");
        assert_eq!(format_general(1e100), "1e+100");
    }

    #[test]
    fn test_shortest_digits() {
        assert_eq!(format_general(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_general(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_general(0.3), "0.3");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(f64::INFINITY), "+Inf");
        assert_eq!(format_general(f64::NAN), "NaN");
    }
}
