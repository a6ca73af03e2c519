use std::env;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// The gateway reports naive local timestamps in Western Indonesia Time (UTC+7).
pub const GATEWAY_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Interpret a configuration flag. Unrecognised values fall back to `default`.
pub fn parse_boolean_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Read a boolean flag from the environment variable `name`.
pub fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok().as_deref(), default)
}

/// Parses a timestamp as sent by the payment gateway. RFC 3339 values are used as-is; naive `YYYY-MM-DD HH:MM:SS`
/// values are taken to be in gateway local time.
pub fn parse_gateway_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok()?;
    let offset = FixedOffset::east_opt(GATEWAY_UTC_OFFSET_SECS)?;
    offset.from_local_datetime(&naive).single().map(|ts| ts.with_timezone(&Utc))
}
