//! Static statement pages.
//!
//! A static page is a plain `<table>`: one row holds the period dates next to
//! a sentinel label, every following row with the same number of cells is a
//! line item. Decorative rows with any other cell count are dropped.

use std::sync::LazyLock;

use chrono::NaiveDate;
use fundamentals_core::{
    DataError, PeriodFormat, Profile, ProfileValue, Result, Scale, StatementKind, StatementTable,
    coerce, parse_period,
};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Sentinel label of the header row on balance sheet and cash flow pages.
pub const PERIOD_ENDING: &str = "Period Ending";

/// Sentinel label of the header row on income statement pages.
pub const INCOME_SENTINEL: &str = "Revenue";

/// Name given to the row-label column of tables read from the site.
pub const SITE_LABEL_COLUMN: &str = "row name";

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));

/// Sentinel label locating the header row for a statement kind.
#[must_use]
pub const fn sentinel(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::BalanceSheet | StatementKind::CashFlow => PERIOD_ENDING,
        StatementKind::IncomeStatement => INCOME_SENTINEL,
    }
}

/// Reduces every `<tr>` of every `<table>` to the text of its `<td>` cells.
pub fn parse_document(html: &str) -> Result<Vec<Vec<String>>> {
    let document = Html::parse_document(html);

    let rows: Vec<Vec<String>> = document
        .select(&TABLE_SELECTOR)
        .flat_map(|table| table.select(&ROW_SELECTOR))
        .map(|tr| tr.select(&CELL_SELECTOR).map(cell_text).collect())
        .collect();

    if rows.is_empty() {
        return Err(DataError::EmptyDocument("HTML document".to_string()));
    }
    Ok(rows)
}

/// Builds a statement table from table rows.
///
/// The first row labelled `sentinel` supplies the periods. Later rows with
/// exactly one cell per period become line items, their cells reported in
/// thousands.
pub fn extract_table(rows: &[Vec<String>], sentinel: &str) -> Result<StatementTable> {
    if rows.is_empty() {
        return Err(DataError::EmptyDocument("statement table".to_string()));
    }

    let mut header: Option<Vec<NaiveDate>> = None;
    let mut items = Vec::new();

    for row in rows {
        let Some((label, cells)) = row.split_first() else {
            continue;
        };

        if header.is_none() {
            if label == sentinel {
                header = Some(parse_header_cells(cells)?);
            }
            continue;
        }
        if label == sentinel {
            debug!(sentinel, "Skipping repeated header row");
            continue;
        }

        let width = header.as_ref().map_or(0, Vec::len);
        if cells.len() != width {
            debug!(
                label = label.as_str(),
                cells = cells.len(),
                expected = width,
                "Dropping row with mismatched cell count"
            );
            continue;
        }

        let values = cells
            .iter()
            .map(|cell| coerce(cell, Scale::Thousands))
            .collect::<Result<Vec<f64>>>()?;
        items.push((label.clone(), values));
    }

    let periods = header.ok_or_else(|| DataError::NoHeaderFound {
        sentinel: sentinel.to_string(),
    })?;

    debug!(
        rows = items.len(),
        periods = periods.len(),
        "Extracted statement table"
    );
    Ok(StatementTable::from_rows(periods, items)?.with_label_column(SITE_LABEL_COLUMN))
}

/// Builds a profile from the two-cell label/value rows of a summary page.
///
/// Values ending in `B` are billions, other numeric values are taken as is,
/// anything else is kept as text.
pub fn extract_summary(rows: &[Vec<String>]) -> Result<Profile> {
    let mut profile = Profile::new();
    for row in rows {
        if let [label, value] = row.as_slice() {
            profile.insert(label.clone(), summary_value(value));
        }
    }

    if profile.is_empty() {
        return Err(DataError::EmptySource {
            source_name: "Yahoo Finance".to_string(),
            what: "summary".to_string(),
        });
    }
    Ok(profile)
}

fn summary_value(raw: &str) -> ProfileValue {
    let trimmed = raw.trim();
    let scale = if trimmed.ends_with('B') {
        Some(Scale::Billions)
    } else if trimmed.contains('.') || trimmed.bytes().any(|b| b.is_ascii_digit()) {
        Some(Scale::Unit)
    } else {
        None
    };

    scale
        .and_then(|scale| coerce(trimmed, scale).ok())
        .map_or_else(|| ProfileValue::from(trimmed), ProfileValue::Number)
}

fn parse_header_cells(cells: &[String]) -> Result<Vec<NaiveDate>> {
    cells
        .iter()
        .map(|cell| parse_period(cell, PeriodFormat::Site))
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const BALANCE_SHEET_HTML: &str = r#"
        <html><body>
        <table>
          <tr><td>Period Ending</td><td>9/29/2018</td><td>9/30/2017</td></tr>
          <tr><td colspan="3">Current Assets</td></tr>
          <tr><td>Cash And Cash Equivalents</td><td>25,913,000</td><td>20,289,000</td></tr>
          <tr><td>Short Term Investments</td><td>40,388,000</td><td>53,892,000</td></tr>
          <tr><td>Other Assets</td><td>-</td><td>18,177,000</td></tr>
          <tr><td>Treasury Stock</td><td></td><td>-</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_and_extract_document() {
        let parsed = parse_document(BALANCE_SHEET_HTML).unwrap();
        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed[1], vec!["Current Assets".to_string()]);

        let table = extract_table(&parsed, PERIOD_ENDING).unwrap();
        assert_eq!(table.shape(), (4, 2));
        assert_eq!(table.row("Treasury Stock"), Some(&[0.0, 0.0][..]));
        assert_eq!(table.periods(), &[date(2018, 9, 29), date(2017, 9, 30)]);
        assert_eq!(
            table.row("Cash And Cash Equivalents"),
            Some(&[25_913_000_000.0, 20_289_000_000.0][..])
        );
        assert_eq!(table.get("Other Assets", date(2018, 9, 29)), Some(0.0));
        assert!(!table.contains_row("Current Assets"));
        assert_eq!(table.label_column(), SITE_LABEL_COLUMN);
    }

    #[test]
    fn test_row_with_missing_cell_is_dropped() {
        let input = rows(&[
            &["Period Ending", "9/29/2018", "9/30/2017", "9/24/2016", "9/26/2015"],
            &["Total Assets", "365,725,000", "375,319,000", "321,686,000", "290,345,000"],
            &["Goodwill", "1", "2", "3"],
        ]);
        let table = extract_table(&input, PERIOD_ENDING).unwrap();

        assert_eq!(table.shape(), (1, 4));
        assert!(table.contains_row("Total Assets"));
        assert!(!table.contains_row("Goodwill"));
    }

    #[test]
    fn test_blank_cell_is_zero() {
        let input = rows(&[
            &["Period Ending", "9/29/2018", "9/30/2017"],
            &["Goodwill", "", "  "],
            &["Total Assets", "365,725,000", ""],
        ]);
        let table = extract_table(&input, PERIOD_ENDING).unwrap();

        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.row("Goodwill"), Some(&[0.0, 0.0][..]));
        assert_eq!(table.get("Total Assets", date(2017, 9, 30)), Some(0.0));
    }

    #[test]
    fn test_rows_before_header_are_ignored() {
        let input = rows(&[
            &["Breakdown"],
            &["Total Assets", "1", "2"],
            &["Revenue", "9/29/2018", "9/30/2017"],
            &["Total Revenue", "265,595,000", "229,234,000"],
            &["Revenue", "9/29/2018", "9/30/2017"],
        ]);
        let table = extract_table(&input, sentinel(StatementKind::IncomeStatement)).unwrap();
        assert_eq!(table.rows(), &["Total Revenue"]);
    }

    #[test]
    fn test_missing_header() {
        let input = rows(&[&["Total Assets", "1", "2"]]);
        let err = extract_table(&input, PERIOD_ENDING).unwrap_err();
        assert!(matches!(err, DataError::NoHeaderFound { sentinel } if sentinel == PERIOD_ENDING));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(
            extract_table(&[], PERIOD_ENDING),
            Err(DataError::EmptyDocument(_))
        ));
        assert!(matches!(
            parse_document("<html><body><p>No results for 123123123</p></body></html>"),
            Err(DataError::EmptyDocument(_))
        ));
    }

    #[test]
    fn test_bad_header_date_is_format_error() {
        let input = rows(&[&["Period Ending", "TTM", "9/30/2017"]]);
        assert!(matches!(
            extract_table(&input, PERIOD_ENDING),
            Err(DataError::Format(_))
        ));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(sentinel(StatementKind::BalanceSheet), PERIOD_ENDING);
        assert_eq!(sentinel(StatementKind::CashFlow), PERIOD_ENDING);
        assert_eq!(sentinel(StatementKind::IncomeStatement), INCOME_SENTINEL);
    }

    #[test]
    fn test_extract_summary() {
        let input = rows(&[
            &["Market Cap", "1,230.47B"],
            &["Beta (5Y Monthly)", "1.23"],
            &["Volume", "28,441,253"],
            &["Earnings Date", "Jan 28, 2020"],
            &["52 Week Range", "142.00", "233.47", "extra"],
        ]);
        let profile = extract_summary(&input).unwrap();

        assert_eq!(profile.len(), 4);
        assert_eq!(profile.value("Market Cap").unwrap(), 1_230_470_000_000.0);
        assert_eq!(profile.value("Beta (5Y Monthly)").unwrap(), 1.23);
        assert_eq!(profile.value("Volume").unwrap(), 28_441_253.0);
        assert!(profile.value("Earnings Date").is_err());
        assert_eq!(profile.value("PE Ratio (TTM)").unwrap(), 0.0);
    }

    #[test]
    fn test_empty_summary() {
        let input = rows(&[&["only one cell"]]);
        assert!(matches!(
            extract_summary(&input),
            Err(DataError::EmptySource { .. })
        ));
    }
}
