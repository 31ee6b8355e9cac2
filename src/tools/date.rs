use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses the ISO 8601 like timestamps written by the tower loggers. Timestamps carry no
/// offset and are taken as UTC; an explicit offset is honoured when present.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Seconds elapsed from `epoch` to `datetime`, keeping the sub-second part
pub fn seconds_since(datetime: &DateTime<Utc>, epoch: &DateTime<Utc>) -> f64 {
    let delta: TimeDelta = *datetime - *epoch;
    delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9
}

/// CF `units` string for a time coordinate counted in seconds from `epoch`
pub fn cf_time_units(epoch: &DateTime<Utc>) -> String {
    format!("seconds since {}", epoch.format("%Y-%m-%d %H:%M:%S"))
}

/// ISO 8601 at second precision, as used for the time coverage attributes
pub fn iso_seconds(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
}
