//! The canonical statement table.
//!
//! Every source, whatever its layout, normalizes into a [`StatementTable`]:
//! named line items as rows, reporting periods as columns, and a dense `f64`
//! for every cell.

use std::collections::HashSet;

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use crate::error::{DataError, Result};
use crate::period::format_period;

/// Name of the row-label column when a table is built.
pub const DEFAULT_LABEL_COLUMN: &str = "Items";

/// A row-name × period matrix of statement values.
///
/// Row names and period keys are unique. Every row holds a value for every
/// period. Equality compares the row set, the period set and the values; the
/// order of rows and periods and the label-column name are ignored.
#[derive(Clone, Debug, Serialize)]
pub struct StatementTable {
    label_column: String,
    rows: Vec<String>,
    periods: Vec<NaiveDate>,
    /// Row-major, `rows.len() * periods.len()` cells.
    values: Vec<f64>,
}

impl StatementTable {
    /// Builds a table from period columns, each holding one value per row.
    pub fn from_columns(
        rows: Vec<String>,
        columns: Vec<(NaiveDate, Vec<f64>)>,
    ) -> Result<Self> {
        ensure_unique(rows.iter(), "line item")?;
        ensure_unique(columns.iter().map(|(p, _)| p), "period")?;

        let width = columns.len();
        let mut values = vec![0.0; rows.len() * width];
        let mut periods = Vec::with_capacity(width);

        for (j, (period, column)) in columns.into_iter().enumerate() {
            if column.len() != rows.len() {
                return Err(DataError::format(format!(
                    "period {period} has {} values for {} line items",
                    column.len(),
                    rows.len()
                )));
            }
            for (i, value) in column.into_iter().enumerate() {
                values[i * width + j] = value;
            }
            periods.push(period);
        }

        Ok(Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            rows,
            periods,
            values,
        })
    }

    /// Builds a table from named rows, each holding one value per period.
    pub fn from_rows(periods: Vec<NaiveDate>, rows: Vec<(String, Vec<f64>)>) -> Result<Self> {
        ensure_unique(periods.iter(), "period")?;
        ensure_unique(rows.iter().map(|(name, _)| name), "line item")?;

        let mut names = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len() * periods.len());

        for (name, row) in rows {
            if row.len() != periods.len() {
                return Err(DataError::format(format!(
                    "line item {name:?} has {} values for {} periods",
                    row.len(),
                    periods.len()
                )));
            }
            values.extend(row);
            names.push(name);
        }

        Ok(Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            rows: names,
            periods,
            values,
        })
    }

    /// Sets the name of the row-label column.
    #[must_use]
    pub fn with_label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = name.into();
        self
    }

    /// Renames the row-label column in place.
    pub fn rename_label_column(&mut self, name: impl Into<String>) {
        self.label_column = name.into();
    }

    /// Name of the row-label column.
    #[must_use]
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Line item names, in table order.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Period keys, in table order.
    #[must_use]
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// Returns `(rows, periods)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.periods.len())
    }

    /// Returns true if the table has no rows or no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if the table has a line item with this name.
    #[must_use]
    pub fn contains_row(&self, row: &str) -> bool {
        self.row_index(row).is_some()
    }

    /// The most recent period in the table.
    #[must_use]
    pub fn latest_period(&self) -> Option<NaiveDate> {
        self.periods.iter().max().copied()
    }

    /// Value of one cell.
    #[must_use]
    pub fn get(&self, row: &str, period: NaiveDate) -> Option<f64> {
        let i = self.row_index(row)?;
        let j = self.period_index(period)?;
        Some(self.values[i * self.periods.len() + j])
    }

    /// Values of one line item, in period order.
    #[must_use]
    pub fn row(&self, row: &str) -> Option<&[f64]> {
        let i = self.row_index(row)?;
        let width = self.periods.len();
        Some(&self.values[i * width..(i + 1) * width])
    }

    /// Values of one period, in row order.
    #[must_use]
    pub fn column(&self, period: NaiveDate) -> Option<Vec<f64>> {
        let j = self.period_index(period)?;
        Some(self.column_at(j).collect())
    }

    /// Iterates over `(line item, values)` pairs in table order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        let width = self.periods.len();
        self.rows
            .iter()
            .enumerate()
            .map(move |(i, row)| (row.as_str(), &self.values[i * width..(i + 1) * width]))
    }

    /// Converts the table into a DataFrame.
    ///
    /// The first column holds line item names under the label-column name;
    /// every period becomes an `f64` column named `YYYY-MM-DD`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.periods.len() + 1);
        columns.push(Column::new(
            self.label_column.as_str().into(),
            self.rows.clone(),
        ));
        for (j, period) in self.periods.iter().enumerate() {
            let values: Vec<f64> = self.column_at(j).collect();
            columns.push(Column::new(format_period(*period).into(), values));
        }
        DataFrame::new(columns).map_err(DataError::format)
    }

    fn column_at(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        let width = self.periods.len();
        (0..self.rows.len()).map(move |i| self.values[i * width + j])
    }

    fn row_index(&self, row: &str) -> Option<usize> {
        self.rows.iter().position(|r| r == row)
    }

    fn period_index(&self, period: NaiveDate) -> Option<usize> {
        self.periods.iter().position(|p| *p == period)
    }
}

impl PartialEq for StatementTable {
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        self.rows.iter().all(|row| {
            self.periods
                .iter()
                .all(|&period| self.get(row, period) == other.get(row, period))
        })
    }
}

fn ensure_unique<'a, T>(items: impl Iterator<Item = &'a T>, what: &str) -> Result<()>
where
    T: std::hash::Hash + Eq + std::fmt::Debug + 'a,
{
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(DataError::format(format!("duplicate {what} {item:?}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> StatementTable {
        StatementTable::from_rows(
            vec![date(2019, 9, 28), date(2018, 9, 29)],
            vec![
                ("Revenue".to_string(), vec![100.0, 90.0]),
                ("Net Income".to_string(), vec![20.0, 15.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let table = sample();
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.label_column(), DEFAULT_LABEL_COLUMN);
        assert_eq!(table.get("Revenue", date(2018, 9, 29)), Some(90.0));
        assert_eq!(table.row("Net Income"), Some(&[20.0, 15.0][..]));
        assert_eq!(table.column(date(2019, 9, 28)), Some(vec![100.0, 20.0]));
        assert_eq!(table.latest_period(), Some(date(2019, 9, 28)));
        assert!(table.get("Revenue", date(2017, 9, 30)).is_none());
        assert!(!table.contains_row("EBITDA"));
    }

    #[test]
    fn test_from_columns_matches_from_rows() {
        let by_columns = StatementTable::from_columns(
            vec!["Revenue".to_string(), "Net Income".to_string()],
            vec![
                (date(2019, 9, 28), vec![100.0, 20.0]),
                (date(2018, 9, 29), vec![90.0, 15.0]),
            ],
        )
        .unwrap();
        assert_eq!(by_columns, sample());
        assert_eq!(by_columns.row("Revenue"), Some(&[100.0, 90.0][..]));
    }

    #[test]
    fn test_equality_ignores_order_and_label() {
        let reordered = StatementTable::from_rows(
            vec![date(2018, 9, 29), date(2019, 9, 28)],
            vec![
                ("Net Income".to_string(), vec![15.0, 20.0]),
                ("Revenue".to_string(), vec![90.0, 100.0]),
            ],
        )
        .unwrap()
        .with_label_column("row name");
        assert_eq!(reordered, sample());

        let changed = StatementTable::from_rows(
            vec![date(2019, 9, 28), date(2018, 9, 29)],
            vec![
                ("Revenue".to_string(), vec![100.0, 91.0]),
                ("Net Income".to_string(), vec![20.0, 15.0]),
            ],
        )
        .unwrap();
        assert_ne!(changed, sample());
    }

    #[test]
    fn test_rejects_partial_rows() {
        let err = StatementTable::from_rows(
            vec![date(2019, 9, 28), date(2018, 9, 29)],
            vec![("Revenue".to_string(), vec![100.0])],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Format(_)));
    }

    #[test]
    fn test_rejects_duplicates() {
        assert!(
            StatementTable::from_rows(
                vec![date(2019, 9, 28)],
                vec![
                    ("Revenue".to_string(), vec![1.0]),
                    ("Revenue".to_string(), vec![2.0]),
                ],
            )
            .is_err()
        );
        assert!(
            StatementTable::from_columns(
                vec!["Revenue".to_string()],
                vec![(date(2019, 9, 28), vec![1.0]), (date(2019, 9, 28), vec![2.0])],
            )
            .is_err()
        );
    }

    #[test]
    fn test_iter_rows() {
        let table = sample();
        let rows: Vec<_> = table.iter_rows().collect();
        assert_eq!(rows[0], ("Revenue", &[100.0, 90.0][..]));
        assert_eq!(rows[1], ("Net Income", &[20.0, 15.0][..]));
    }

    #[test]
    fn test_to_dataframe() {
        let df = sample().with_label_column("row name").to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 3));
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["row name", "2019-09-28", "2018-09-29"]);
        let revenue = df.column("2018-09-29").unwrap().f64().unwrap().get(0);
        assert_eq!(revenue, Some(90.0));
    }
}
