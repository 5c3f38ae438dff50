//! Period key parsing.
//!
//! Both sources label their reporting periods with plain calendar dates but
//! use different layouts. Each parses to the same [`NaiveDate`], so tables
//! from different sources are comparable column by column.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Date layout used by a source for its period labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodFormat {
    /// `YYYY-MM-DD`, used by the JSON API.
    Api,
    /// `MM/DD/YYYY`, used by the financial-data site.
    Site,
}

impl PeriodFormat {
    /// The chrono format string for this layout.
    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        match self {
            Self::Api => "%Y-%m-%d",
            Self::Site => "%m/%d/%Y",
        }
    }
}

/// Parses a period label under the given layout.
///
/// Single-digit months and days are accepted (`9/29/2018`, `2018-9-29`).
pub fn parse_period(raw: &str, format: PeriodFormat) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format.pattern()).map_err(|e| {
        DataError::format(format!(
            "period label {raw:?} does not match {}: {e}",
            format.pattern()
        ))
    })
}

/// Renders a period key in its canonical `YYYY-MM-DD` form.
#[must_use]
pub fn format_period(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_format() {
        assert_eq!(
            parse_period("2019-09-28", PeriodFormat::Api).unwrap(),
            NaiveDate::from_ymd_opt(2019, 9, 28).unwrap()
        );
        assert_eq!(
            parse_period("2018-9-29", PeriodFormat::Api).unwrap(),
            NaiveDate::from_ymd_opt(2018, 9, 29).unwrap()
        );
    }

    #[test]
    fn test_site_format() {
        assert_eq!(
            parse_period("9/29/2018", PeriodFormat::Site).unwrap(),
            NaiveDate::from_ymd_opt(2018, 9, 29).unwrap()
        );
        assert_eq!(
            parse_period(" 12/31/2020 ", PeriodFormat::Site).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_both_formats_agree() {
        assert_eq!(
            parse_period("2019-09-28", PeriodFormat::Api).unwrap(),
            parse_period("09/28/2019", PeriodFormat::Site).unwrap()
        );
    }

    #[test]
    fn test_mismatch_is_format_error() {
        assert!(matches!(
            parse_period("9/29/2018", PeriodFormat::Api),
            Err(DataError::Format(_))
        ));
        assert!(parse_period("2018-09-29", PeriodFormat::Site).is_err());
        assert!(parse_period("TTM", PeriodFormat::Site).is_err());
    }

    #[test]
    fn test_format_period() {
        let date = NaiveDate::from_ymd_opt(2018, 9, 29).unwrap();
        assert_eq!(format_period(date), "2018-09-29");
    }
}
