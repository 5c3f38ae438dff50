//! Numeric coercion of vendor-formatted strings.
//!
//! Sources report numbers in different units. The caller knows which source a
//! string came from and picks the [`Scale`]; nothing here guesses the unit
//! from the string itself.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// The explicit "no data" cell used by every source.
pub const NO_DATA: &str = "-";

/// Scaling rule applied while coercing a vendor string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    /// Values already in natural units (JSON API, profile values).
    #[default]
    Unit,
    /// Integer cells reported in thousands (static and rendered site pages).
    ///
    /// Cells with a decimal point are per-share figures and are not scaled.
    Thousands,
    /// Cells carrying a trailing `B` unit, reported in billions.
    Billions,
}

/// Coerces a vendor string into a number under the given scale.
///
/// `"-"` and blank cells are zero under every scale. Thousands separators are
/// ignored.
///
/// # Examples
///
/// ```
/// use fundamentals_core::coerce::{coerce, Scale};
///
/// assert_eq!(coerce("1,234", Scale::Thousands).unwrap(), 1_234_000.0);
/// assert_eq!(coerce("1,234", Scale::Unit).unwrap(), 1_234.0);
/// assert_eq!(coerce("1.2B", Scale::Billions).unwrap(), 1_200_000_000.0);
/// assert_eq!(coerce("-", Scale::Thousands).unwrap(), 0.0);
/// ```
pub fn coerce(raw: &str, scale: Scale) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_DATA {
        return Ok(0.0);
    }

    let cleaned = trimmed.replace(',', "");
    let parsed = match scale {
        Scale::Unit => parse_unit(&cleaned),
        Scale::Thousands if cleaned.contains('.') => parse_unit(&cleaned),
        Scale::Thousands => parse_scaled(&cleaned, 3),
        Scale::Billions => cleaned
            .strip_suffix('B')
            .and_then(|digits| parse_scaled(digits, 9)),
    };

    parsed.ok_or_else(|| {
        DataError::format(format!("cannot coerce {raw:?} under {scale:?} scale"))
    })
}

/// Coerces a JSON value with [`Scale::Unit`].
///
/// Numbers are taken as is, strings are coerced, `null` is zero.
pub fn coerce_json(value: &serde_json::Value) -> Result<f64> {
    match value {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| DataError::format(format!("number {n} is not representable as f64"))),
        serde_json::Value::String(s) => coerce(s, Scale::Unit),
        other => Err(DataError::format(format!(
            "expected a number or numeric string, got {other}"
        ))),
    }
}

fn parse_unit(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a plain decimal string and multiplies it by `10^exponent` exactly.
fn parse_scaled(s: &str, exponent: u32) -> Option<f64> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty())
        || !all_digits(int_part)
        || !all_digits(frac_part)
        || frac_part.len() > exponent as usize
    {
        return None;
    }

    let int_value: i128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let frac_value: i128 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().ok()?
    };
    let frac_shift = 10_i128.checked_pow(exponent - frac_part.len() as u32)?;

    let value = int_value
        .checked_mul(10_i128.checked_pow(exponent)?)?
        .checked_add(frac_value.checked_mul(frac_shift)?)?;

    let value = value as f64;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_sentinel() {
        for scale in [Scale::Unit, Scale::Thousands, Scale::Billions] {
            assert_eq!(coerce("-", scale).unwrap(), 0.0);
            assert_eq!(coerce(" - ", scale).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_blank_cell_is_zero() {
        for scale in [Scale::Unit, Scale::Thousands, Scale::Billions] {
            assert_eq!(coerce("", scale).unwrap(), 0.0);
            assert_eq!(coerce(" \t ", scale).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_thousands_scaling() {
        assert_eq!(coerce("1,234", Scale::Thousands).unwrap(), 1_234_000.0);
        assert_eq!(
            coerce("-48,995,000", Scale::Thousands).unwrap(),
            -48_995_000_000.0
        );
        assert_eq!(coerce("0", Scale::Thousands).unwrap(), 0.0);
    }

    #[test]
    fn test_thousands_decimal_is_not_scaled() {
        assert_eq!(coerce("2.97", Scale::Thousands).unwrap(), 2.97);
    }

    #[test]
    fn test_unit_scaling() {
        assert_eq!(coerce("1,234", Scale::Unit).unwrap(), 1_234.0);
        assert_eq!(coerce("1.5", Scale::Unit).unwrap(), 1.5);
        assert_eq!(coerce("265595000000.0", Scale::Unit).unwrap(), 265_595_000_000.0);
        assert_eq!(coerce("-12", Scale::Unit).unwrap(), -12.0);
    }

    #[test]
    fn test_billions_scaling() {
        assert_eq!(coerce("1.2B", Scale::Billions).unwrap(), 1_200_000_000.0);
        assert_eq!(coerce("12B", Scale::Billions).unwrap(), 12_000_000_000.0);
        assert_eq!(
            coerce("1,230.47B", Scale::Billions).unwrap(),
            1_230_470_000_000.0
        );
    }

    #[test]
    fn test_billions_requires_unit() {
        assert!(matches!(
            coerce("1.2", Scale::Billions),
            Err(DataError::Format(_))
        ));
        assert!(coerce("1.2T", Scale::Billions).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(coerce("N/A", Scale::Unit).is_err());
        assert!(coerce("inf", Scale::Unit).is_err());
        assert!(coerce("NaN", Scale::Unit).is_err());
        assert!(coerce("12a", Scale::Thousands).is_err());
        assert!(coerce(",", Scale::Thousands).is_err());
    }

    #[test]
    fn test_coerce_json() {
        assert_eq!(coerce_json(&serde_json::json!(100)).unwrap(), 100.0);
        assert_eq!(coerce_json(&serde_json::json!("90")).unwrap(), 90.0);
        assert_eq!(coerce_json(&serde_json::Value::Null).unwrap(), 0.0);
        assert!(coerce_json(&serde_json::json!(true)).is_err());
        assert!(coerce_json(&serde_json::json!({"a": 1})).is_err());
    }
}
