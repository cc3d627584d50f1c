//! Best-effort parsing helpers shared by adapters.
//!
//! Every helper here returns `None` when the input cannot be interpreted.
//! None of them ever substitutes zero for a missing or malformed value.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Parse an optional integer delivered either as a JSON number or a string.
pub fn optional_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Read a string field that some providers send as a number.
pub fn optional_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an optional non-negative count (seeders, leechers).
pub fn optional_count(value: &Value) -> Option<u32> {
    optional_i64(value).and_then(|n| u32::try_from(n).ok())
}

/// Parse a positive unix timestamp in seconds.
pub fn unix_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    optional_i64(value)
        .filter(|ts| *ts > 0)
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}

/// Parse a timestamp in one of the formats providers are known to send.
///
/// Values without an offset are read as UTC.
pub fn datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|ndt| ndt.and_utc())
        })
}

/// Format a byte count with binary units, e.g. `"1.5 KB"`.
///
/// Returns an empty string for non-positive sizes.
pub fn size_label(bytes: i64) -> String {
    if bytes <= 0 {
        return String::new();
    }

    let mut value = bytes as f64;
    let mut idx = 0;
    while value >= 1024.0 && idx < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    if value < 10.0 && idx > 0 {
        format!("{:.1} {}", value, SIZE_UNITS[idx])
    } else {
        format!("{:.0} {}", value, SIZE_UNITS[idx])
    }
}

/// Parse a human readable size such as `"2.0 GiB"` or `"512 KB"` into bytes.
///
/// Both `KiB` and `KB` spellings use binary multipliers, which is how the
/// trackers that emit these labels compute them.
pub fn human_size(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);

    let number: f64 = number.parse().ok()?;
    let exponent = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" | "BYTES" => 0,
        "K" | "KB" | "KIB" => 1,
        "M" | "MB" | "MIB" => 2,
        "G" | "GB" | "GIB" => 3,
        "T" | "TB" | "TIB" => 4,
        "P" | "PB" | "PIB" => 5,
        _ => return None,
    };

    let bytes = number * 1024f64.powi(exponent);
    if bytes.is_finite() && bytes > 0.0 {
        Some(bytes as i64)
    } else {
        None
    }
}

/// Extract the upper-cased info hash from a magnet URI.
pub fn info_hash_from_magnet(magnet: &str) -> Option<String> {
    crate::magnet::parse(magnet).ok()?.info_hash
}
