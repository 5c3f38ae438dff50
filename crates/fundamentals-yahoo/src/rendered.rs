//! Tables assembled from rendered statement pages.

use chrono::NaiveDate;
use fundamentals_core::{
    DataError, PeriodFormat, Result, Scale, StatementTable, coerce, parse_period,
};
use tracing::debug;

use crate::decompose::{LeafRecord, decompose_row};
use crate::table::SITE_LABEL_COLUMN;

/// One value column of a rendered header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderColumn {
    /// A reporting period.
    Period(NaiveDate),
    /// A column that is not a period, such as `TTM`.
    Other(String),
}

/// Header of a rendered statement page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedHeader {
    /// Name of the label column (`Breakdown` on the site).
    pub label: String,
    /// Value columns in page order.
    pub columns: Vec<HeaderColumn>,
}

impl RenderedHeader {
    /// Number of value columns, period or not.
    #[must_use]
    pub fn value_columns(&self) -> usize {
        self.columns.len()
    }

    /// Periods in page order.
    pub fn periods(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.columns.iter().filter_map(|column| match column {
            HeaderColumn::Period(date) => Some(*date),
            HeaderColumn::Other(_) => None,
        })
    }
}

/// Parses the header texts of a rendered page.
///
/// The first text names the label column; each remaining text is a period or
/// a non-period column. A header without any period fails with
/// [`DataError::NoHeaderFound`].
pub fn parse_header<S: AsRef<str>>(texts: &[S]) -> Result<RenderedHeader> {
    let Some((label, rest)) = texts.split_first() else {
        return Err(no_header());
    };

    let columns: Vec<HeaderColumn> = rest
        .iter()
        .map(|text| {
            let text = text.as_ref().trim();
            parse_period(text, PeriodFormat::Site)
                .map_or_else(|_| HeaderColumn::Other(text.to_string()), HeaderColumn::Period)
        })
        .collect();

    if !columns.iter().any(|c| matches!(c, HeaderColumn::Period(_))) {
        return Err(no_header());
    }

    Ok(RenderedHeader {
        label: label.as_ref().trim().to_string(),
        columns,
    })
}

/// Builds a statement table from decomposed leaves.
///
/// Non-period columns are dropped; values are reported in thousands.
pub fn build_table(header: &RenderedHeader, leaves: &[LeafRecord]) -> Result<StatementTable> {
    let periods: Vec<NaiveDate> = header.periods().collect();

    let mut items = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        if leaf.values.len() != header.value_columns() {
            return Err(DataError::MalformedRow {
                label: leaf.label.clone(),
                reason: format!(
                    "{} values for {} header columns",
                    leaf.values.len(),
                    header.value_columns()
                ),
            });
        }

        let values = header
            .columns
            .iter()
            .zip(&leaf.values)
            .filter(|(column, _)| matches!(column, HeaderColumn::Period(_)))
            .map(|(_, raw)| coerce(raw, Scale::Thousands))
            .collect::<Result<Vec<f64>>>()?;
        items.push((leaf.label.clone(), values));
    }

    StatementTable::from_rows(periods, items)
}

/// Builds a statement table from the header texts and row texts of a
/// rendered page.
pub fn rendered_table<S: AsRef<str>>(
    header_texts: &[S],
    row_texts: &[S],
) -> Result<StatementTable> {
    if row_texts.is_empty() {
        return Err(DataError::EmptyDocument("rendered page".to_string()));
    }

    let header = parse_header(header_texts)?;
    let mut leaves = Vec::new();
    for text in row_texts {
        leaves.extend(decompose_row(text.as_ref(), header.value_columns())?);
    }

    debug!(
        rows = row_texts.len(),
        leaves = leaves.len(),
        columns = header.value_columns(),
        "Decomposed rendered rows"
    );
    Ok(build_table(&header, &leaves)?.with_label_column(SITE_LABEL_COLUMN))
}

fn no_header() -> DataError {
    DataError::NoHeaderFound {
        sentinel: "Breakdown".to_string(),
    }
}
