//! Time utilities: parsing timestamps, storage format, duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;

/// Storage format for entry start/finish timestamps.
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for bookkeeping timestamps (created_at / updated_at).
pub const DB_FORMAT_MICROS: &str = "%Y-%m-%d %H:%M:%S%.6f";

const INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse `YYYY-MM-DD HH:MM[:SS]` (a `T` separator is accepted as well).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn parse_timestamp_or_err(s: &str) -> AppResult<NaiveDateTime> {
    parse_timestamp(s).ok_or_else(|| AppError::InvalidTimestamp(s.to_string()))
}

pub fn to_db(ts: NaiveDateTime) -> String {
    ts.format(DB_FORMAT).to_string()
}

pub fn to_db_micros(ts: NaiveDateTime) -> String {
    ts.format(DB_FORMAT_MICROS).to_string()
}

pub fn format_display(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// `Xd Yh Zm` when the span reaches a full day, `Yh Zm` otherwise.
pub fn format_duration(total_minutes: i64) -> String {
    let sign = if total_minutes < 0 { "-" } else { "" };
    let m = total_minutes.abs();
    let days = m / (24 * 60);
    let hours = (m % (24 * 60)) / 60;
    let minutes = m % 60;

    if days > 0 {
        format!("{sign}{days}d {hours}h {minutes}m")
    } else {
        format!("{sign}{hours}h {minutes}m")
    }
}
