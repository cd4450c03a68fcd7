//! Human-readable size and time formatting.
//!
//! Sizes are shown with 1024-based units and one decimal place, timestamps
//! as local `YYYY-MM-DD HH:MM:SS`. The parse functions invert the display
//! forms so that presentation-level sorting can order formatted values.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime};

use crate::types::{NOT_APPLICABLE_SENTINEL, UNKNOWN_SENTINEL};

/// Timestamp layout used in every view and export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Formats a byte count for display.
///
/// # Examples
///
/// ```
/// use ds_core::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
/// assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)] // Display only
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

/// Parses a formatted size back into an approximate byte count.
///
/// Sentinels (`-`, `unknown`) and unparsable input yield `0`, so they sort
/// before every real size.
///
/// # Examples
///
/// ```
/// use ds_core::parse_size;
///
/// assert_eq!(parse_size("1.5 KB"), 1536);
/// assert_eq!(parse_size("512 B"), 512);
/// assert_eq!(parse_size("-"), 0);
/// assert_eq!(parse_size("unknown"), 0);
/// ```
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)] // Sort keys only
pub fn parse_size(display: &str) -> u64 {
    let display = display.trim();
    if display == NOT_APPLICABLE_SENTINEL || display == UNKNOWN_SENTINEL {
        return 0;
    }

    let (number, multiplier) = if let Some(n) = display.strip_suffix(" GB") {
        (n, GIB)
    } else if let Some(n) = display.strip_suffix(" MB") {
        (n, MIB)
    } else if let Some(n) = display.strip_suffix(" KB") {
        (n, KIB)
    } else if let Some(n) = display.strip_suffix(" B") {
        (n, 1)
    } else {
        return 0;
    };

    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map_or(0, |v| (v * multiplier as f64).round() as u64)
}

/// Formats a modification time for display.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use ds_core::format_timestamp;
///
/// let when = Local.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
/// assert_eq!(format_timestamp(&when), "2023-12-31 23:59:58");
/// ```
#[must_use]
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a displayed timestamp. Returns `None` for `unknown` or malformed input.
#[must_use]
pub fn parse_timestamp(display: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(display.trim(), TIMESTAMP_FORMAT).ok()
}

/// Formats an elapsed scan time, e.g. `"1.25s"`.
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
