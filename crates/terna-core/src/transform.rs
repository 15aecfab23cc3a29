//! Conversion of raw API payloads into [`Table`]s.
//!
//! A data payload carries a `result` status object and exactly one other key
//! holding an array of row objects. Rows are flattened (nested objects become
//! `.`-joined column names), indexed by `Date` or `Year` when present, and
//! each remaining column is read as numeric when every value allows it.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, TernaError};
use crate::table::{ColumnValues, Table, TableColumn, TableIndex};
use crate::timestamp::{MARKET_TIMEZONE, adjust_timestamp, parse_naive_datetime};

/// Top-level key holding the upstream status.
pub const STATUS_KEY: &str = "result";

/// Column holding naive local timestamps of quarter-hourly series.
pub const DATE_COLUMN: &str = "Date";

/// Column holding the year of annual series.
pub const YEAR_COLUMN: &str = "Year";

/// Normalizes a raw payload.
///
/// Returns `Ok(None)` when the payload has no status key, no data key, or no
/// rows. Fails when rows are not objects or when `Date` / `Year` values cannot
/// be read.
pub fn transform(payload: Value) -> Result<Option<Table>> {
    let Value::Object(map) = payload else {
        debug!("Payload is not a JSON object");
        return Ok(None);
    };

    if !map.contains_key(STATUS_KEY) {
        debug!("Payload has no {STATUS_KEY} key");
        return Ok(None);
    }

    let Some((key, data)) = map.into_iter().find(|(k, _)| k != STATUS_KEY) else {
        debug!("Payload has no data key");
        return Ok(None);
    };

    let rows = match data {
        Value::Array(rows) => rows,
        Value::Object(row) => vec![Value::Object(row)],
        Value::Null => Vec::new(),
        other => {
            return Err(TernaError::Parse(format!(
                "Expected an array under {key}, got {other}"
            )));
        }
    };

    if rows.is_empty() {
        debug!(key = %key, "Payload has no rows");
        return Ok(None);
    }

    let row_count = rows.len();
    let mut columns = flatten_rows(&key, rows)?;

    let index = if let Some(dates) = take_column(&mut columns, DATE_COLUMN) {
        let timestamps = dates
            .iter()
            .map(|value| {
                let naive = parse_naive_datetime(value.as_str().ok_or_else(|| {
                    TernaError::Parse(format!("{DATE_COLUMN} value {value} is not a string"))
                })?)?;
                adjust_timestamp(naive, MARKET_TIMEZONE)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..row_count).collect();
        order.sort_by_key(|&i| timestamps[i]);

        for (_, values) in &mut columns {
            *values = order.iter().map(|&i| values[i].take()).collect();
        }
        let timestamps: Vec<_> = order.iter().map(|&i| timestamps[i]).collect();

        if timestamps.windows(2).any(|pair| pair[0] == pair[1]) {
            warn!(key = %key, "Duplicate timestamps in normalized index");
        }

        TableIndex::Timestamp(timestamps)
    } else if let Some(years) = take_column(&mut columns, YEAR_COLUMN) {
        TableIndex::Year(years.iter().map(parse_year).collect::<Result<Vec<_>>>()?)
    } else {
        TableIndex::Position(row_count)
    };

    let columns = columns
        .into_iter()
        .map(|(name, values)| TableColumn {
            name,
            values: coerce(values),
        })
        .collect();

    Table::new(index, columns).map(Some)
}

/// Flattens row objects into named columns, in order of first appearance.
fn flatten_rows(key: &str, rows: Vec<Value>) -> Result<Vec<(String, Vec<Value>)>> {
    let row_count = rows.len();
    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (row_idx, row) in rows.into_iter().enumerate() {
        let Value::Object(object) = row else {
            return Err(TernaError::Parse(format!(
                "Row {row_idx} under {key} is not an object"
            )));
        };

        let mut flat = Vec::new();
        flatten_object(None, object, &mut flat);

        for (name, value) in flat {
            let position = *positions.entry(name.clone()).or_insert_with(|| {
                columns.push((name, Vec::with_capacity(row_count)));
                columns.len() - 1
            });

            let values = &mut columns[position].1;
            if values.len() > row_idx {
                values[row_idx] = value;
            } else {
                values.resize(row_idx, Value::Null);
                values.push(value);
            }
        }
    }

    for (_, values) in &mut columns {
        values.resize(row_count, Value::Null);
    }

    Ok(columns)
}

fn flatten_object(prefix: Option<&str>, object: Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (field, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field,
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_object(Some(name.as_str()), nested, out);
            }
            other => out.push((name, other)),
        }
    }
}

fn take_column(columns: &mut Vec<(String, Vec<Value>)>, name: &str) -> Option<Vec<Value>> {
    let position = columns.iter().position(|(n, _)| n == name)?;
    Some(columns.remove(position).1)
}

fn parse_year(value: &Value) -> Result<i32> {
    let year = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    year.and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| TernaError::Parse(format!("Invalid {YEAR_COLUMN} value: {value}")))
}

/// Reads a column as numeric if every value allows it, otherwise as text.
fn coerce(values: Vec<Value>) -> ColumnValues {
    let numeric: Option<Vec<Option<f64>>> = values.iter().map(numeric_value).collect();

    match numeric {
        Some(numbers) => ColumnValues::Numeric(numbers),
        None => ColumnValues::Text(values.into_iter().map(text_value).collect()),
    }
}

/// `Some(None)` is a null cell, `None` means the value is not numeric.
fn numeric_value(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(None)
            } else {
                s.parse::<f64>().ok().map(Some)
            }
        }
        _ => None,
    }
}

fn text_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
