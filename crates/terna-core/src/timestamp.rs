//! Reconstruction of localized timestamps from quarter-hour series.
//!
//! The API reports quarter-hourly values with a naive local `Date`. On
//! clock-change days some rows come back with minutes that are not a multiple
//! of 15; [`adjust_timestamp`] maps those back onto the quarter-hour grid with
//! a fixed shift and resolves the daylight-saving ambiguity differently for
//! aligned and misaligned rows. The shift is reproduced exactly as observed in
//! upstream data and must not be generalized.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::error::{Result, TernaError};

/// Time zone of the Italian market, used for every `Date` column.
pub const MARKET_TIMEZONE: Tz = chrono_tz::Europe::Rome;

/// Naive datetime layouts accepted for `Date` values, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parses a naive local datetime as reported in a `Date` field.
///
/// A bare `YYYY-mm-dd` date is read as midnight.
pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TernaError::Parse(format!("Unrecognized date value: {value:?}")))
}

/// Localizes a quarter-hour naive datetime in `tz`.
///
/// With `delta = minute % 15`:
///
/// - `delta == 0`: localized as-is; an ambiguous wall-clock time resolves to
///   its first occurrence (daylight-saving offset).
/// - `delta != 0`: shifted back by `delta + 15 * (4 - delta)` minutes (a
///   negative amount moves it forward), then localized with an ambiguous time
///   resolving to the standard-time offset.
///
/// Local times that do not exist in `tz` are rejected.
pub fn adjust_timestamp(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    let delta = i64::from(naive.minute() % 15);

    if delta == 0 {
        return match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            LocalResult::None => Err(nonexistent(naive, tz)),
        };
    }

    let shifted = naive - TimeDelta::minutes(delta + 15 * (4 - delta));
    match tz.from_local_datetime(&shifted) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(_, latest) => Ok(latest),
        LocalResult::None => Err(nonexistent(shifted, tz)),
    }
}

fn nonexistent(naive: NaiveDateTime, tz: Tz) -> TernaError {
    TernaError::Parse(format!("Local time {naive} does not exist in {tz}"))
}
