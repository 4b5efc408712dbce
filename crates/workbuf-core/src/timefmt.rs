//! Timestamp helpers for labelling buffered work (batch ids, file suffixes).

use chrono::{DateTime, Local, TimeZone};

/// `20060102150405`-style compact timestamp.
pub const FORMAT_YYYYMMDDHHMMSS: &str = "%Y%m%d%H%M%S";
/// `20060102`-style compact date.
pub const FORMAT_YYYYMMDD: &str = "%Y%m%d";

pub fn current_date_time(format: &str) -> String {
    format_date_time(&Local::now(), format)
}

pub fn format_date_time<Tz>(at: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format(format).to_string()
}
