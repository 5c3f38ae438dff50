//! Transposes per-period JSON records into a [`StatementTable`].

use fundamentals_core::coerce::coerce_json;
use fundamentals_core::{DataError, PeriodFormat, Result, StatementTable, parse_period};
use serde_json::{Map, Value};
use tracing::debug;

/// Name of the period field in FMP statement records.
pub const DATE_FIELD: &str = "date";

/// Normalizes a sequence of period records into a statement table.
///
/// The keys of the first record, minus `date_field`, define the line items
/// in their original order. Every record contributes one period column read
/// by those same keys: a key a later record lacks (or sets to `null`) is zero,
/// and a key only a later record carries is dropped.
///
/// Values are taken in natural units; numeric strings are coerced.
pub fn normalize_records(records: &[Value], date_field: &str) -> Result<StatementTable> {
    let first = records.first().ok_or_else(|| DataError::EmptySource {
        source_name: "JSON".to_string(),
        what: "period records".to_string(),
    })?;

    let rows: Vec<String> = as_object(first, 0)?
        .keys()
        .filter(|key| key.as_str() != date_field)
        .cloned()
        .collect();

    let mut columns = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let object = as_object(record, index)?;
        let period = record_period(object, date_field, index)?;

        let values = rows
            .iter()
            .map(|name| {
                object.get(name).map_or(Ok(0.0), coerce_json).map_err(|e| {
                    DataError::format(format!("record {index} ({period}) field {name:?}: {e}"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let dropped = object
            .keys()
            .filter(|key| key.as_str() != date_field && !rows.contains(key))
            .count();
        if dropped > 0 {
            debug!(%period, dropped, "Ignoring fields absent from the first record");
        }

        columns.push((period, values));
    }

    debug!(
        rows = rows.len(),
        periods = columns.len(),
        "Normalized JSON records"
    );
    StatementTable::from_columns(rows, columns)
}

fn as_object(record: &Value, index: usize) -> Result<&Map<String, Value>> {
    record
        .as_object()
        .ok_or_else(|| DataError::format(format!("record {index} is not a JSON object")))
}

fn record_period(
    object: &Map<String, Value>,
    date_field: &str,
    index: usize,
) -> Result<chrono::NaiveDate> {
    match object.get(date_field) {
        Some(Value::String(raw)) => parse_period(raw, PeriodFormat::Api),
        Some(other) => Err(DataError::format(format!(
            "record {index} has a non-string {date_field:?} field: {other}"
        ))),
        None => Err(DataError::format(format!(
            "record {index} has no {date_field:?} field"
        ))),
    }
}
