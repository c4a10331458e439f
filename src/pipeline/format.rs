//! Date formatting for the transaction table.

use crate::config::{DateFormat, TimeZoneMode};
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Text shown for a timestamp that cannot be turned into a date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Format epoch milliseconds in UTC.
///
/// ```rust
/// use bond_converter::{format_date, DateFormat};
///
/// // 2023-01-05T00:00:00Z
/// assert_eq!(format_date(1_672_876_800_000.0, DateFormat::MonthFirst), "01/05/2023");
/// assert_eq!(format_date(1_672_876_800_000.0, DateFormat::DayFirst), "05/01/2023");
/// ```
pub fn format_date(epoch_ms: f64, format: DateFormat) -> String {
    format_timestamp(epoch_ms, format, TimeZoneMode::Utc)
}

/// Format epoch milliseconds as `MM/DD/YYYY` or `DD/MM/YYYY`.
///
/// Month and day are zero-padded; the year is the plain calendar year.
/// Fractional milliseconds are truncated. Non-finite or out-of-range
/// timestamps give [`INVALID_DATE`].
pub fn format_timestamp(epoch_ms: f64, format: DateFormat, zone: TimeZoneMode) -> String {
    if !epoch_ms.is_finite() || epoch_ms.abs() > i64::MAX as f64 {
        return INVALID_DATE.to_string();
    }
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(epoch_ms.trunc() as i64) else {
        return INVALID_DATE.to_string();
    };
    match zone {
        TimeZoneMode::Utc => render(&utc, format),
        TimeZoneMode::Local => render(&Local.from_utc_datetime(&utc.naive_utc()), format),
    }
}

fn render<Tz: TimeZone>(dt: &DateTime<Tz>, format: DateFormat) -> String {
    let (day, month, year) = (dt.day(), dt.month(), dt.year());
    match format {
        DateFormat::MonthFirst => format!("{month:02}/{day:02}/{year}"),
        DateFormat::DayFirst => format!("{day:02}/{month:02}/{year}"),
    }
}
