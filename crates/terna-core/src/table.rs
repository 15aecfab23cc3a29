//! Normalized tabular results.
//!
//! A [`Table`] is what every data operation returns: an index (reconstructed
//! timestamps for quarter-hourly series, plain years for annual series) plus
//! named columns whose element type is decided once per column when the
//! response is normalized.

use chrono::DateTime;
use chrono_tz::Tz;
use polars::prelude::*;

use crate::error::{Result, TernaError};
use crate::timestamp::MARKET_TIMEZONE;

/// Name of the leading column holding a timestamp index in a `DataFrame`.
pub const TIMESTAMP_INDEX_NAME: &str = "timestamp";

/// Name of the leading column holding a year index in a `DataFrame`.
pub const YEAR_INDEX_NAME: &str = "year";

/// Row index of a [`Table`].
#[derive(Clone, Debug, PartialEq)]
pub enum TableIndex {
    /// Localized timestamps, sorted ascending.
    ///
    /// Uniqueness is not enforced: rows whose reconstructed timestamps
    /// collide are all kept, in upstream order.
    Timestamp(Vec<DateTime<Tz>>),
    /// Calendar years, in upstream order.
    Year(Vec<i32>),
    /// No `Date` or `Year` column; rows are identified by position.
    Position(usize),
}

impl TableIndex {
    /// Number of rows covered by this index.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Timestamp(values) => values.len(),
            Self::Year(values) => values.len(),
            Self::Position(len) => *len,
        }
    }

    /// Returns true if the index covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the timestamps if this is a timestamp index.
    #[must_use]
    pub fn timestamps(&self) -> Option<&[DateTime<Tz>]> {
        match self {
            Self::Timestamp(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the years if this is a year index.
    #[must_use]
    pub fn years(&self) -> Option<&[i32]> {
        match self {
            Self::Year(values) => Some(values),
            _ => None,
        }
    }
}

/// Values of one column; the variant is chosen per column, never per cell.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValues {
    /// Every non-null value was numeric.
    Numeric(Vec<Option<f64>>),
    /// At least one value could not be read as a number.
    Text(Vec<Option<String>>),
    /// Localized timestamps.
    ///
    /// Response normalization never produces this variant; it exists for
    /// callers assembling their own tables.
    Timestamp(Vec<Option<DateTime<Tz>>>),
}

impl ColumnValues {
    /// Number of values in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
            Self::Timestamp(values) => values.len(),
        }
    }

    /// Returns true if the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the numeric values if this is a numeric column.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Numeric(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the text values if this is a text column.
    #[must_use]
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Self::Text(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the timestamps if this is a timestamp column.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&[Option<DateTime<Tz>>]> {
        match self {
            Self::Timestamp(values) => Some(values),
            _ => None,
        }
    }

    fn to_polars(&self, name: &str) -> Column {
        match self {
            Self::Numeric(values) => Column::new(name.into(), values),
            Self::Text(values) => Column::new(name.into(), values),
            Self::Timestamp(values) => {
                let millis: Vec<Option<i64>> = values
                    .iter()
                    .map(|v| v.map(|dt| dt.timestamp_millis()))
                    .collect();
                datetime_column(name, millis)
            }
        }
    }
}

/// A named column of a [`Table`].
#[derive(Clone, Debug, PartialEq)]
pub struct TableColumn {
    /// Column name, with nested fields joined by `.`.
    pub name: String,
    /// Column values, one per row.
    pub values: ColumnValues,
}

/// A normalized, indexed result table.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    index: TableIndex,
    columns: Vec<TableColumn>,
}

impl Table {
    /// Creates a table, checking that every column matches the index length.
    pub fn new(index: TableIndex, columns: Vec<TableColumn>) -> Result<Self> {
        let rows = index.len();
        if let Some(column) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(TernaError::Table(format!(
                "Column {} has {} values, index has {rows}",
                column.name,
                column.values.len()
            )));
        }
        Ok(Self { index, columns })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The row index.
    #[must_use]
    pub const fn index(&self) -> &TableIndex {
        &self.index
    }

    /// All columns, in upstream order.
    #[must_use]
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Column names, in upstream order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values)
    }

    /// Converts the table into a polars `DataFrame`.
    ///
    /// The index becomes the leading column: `timestamp` as a
    /// `Datetime[ms, Europe/Rome]`, or `year` as `Int32`. A positional index
    /// adds no column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);

        match &self.index {
            TableIndex::Timestamp(values) => {
                let millis: Vec<Option<i64>> =
                    values.iter().map(|dt| Some(dt.timestamp_millis())).collect();
                columns.push(datetime_column(TIMESTAMP_INDEX_NAME, millis));
            }
            TableIndex::Year(values) => {
                columns.push(Column::new(YEAR_INDEX_NAME.into(), values));
            }
            TableIndex::Position(_) => {}
        }

        columns.extend(self.columns.iter().map(|c| c.values.to_polars(&c.name)));

        DataFrame::new(columns).map_err(|e| TernaError::Table(e.to_string()))
    }
}

fn datetime_column(name: &str, millis: Vec<Option<i64>>) -> Column {
    Int64Chunked::from_iter_options(name.into(), millis.into_iter())
        .into_datetime(TimeUnit::Milliseconds, Some(MARKET_TIMEZONE.name().into()))
        .into_series()
        .into()
}
