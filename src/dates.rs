use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::table::CellValue;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Decodes a sheet cell into a local calendar timestamp.
///
/// Handles the `Date(Y,M,D[,h[,m[,s]]])` form (month zero-based) and a set of
/// plain calendar strings. Anything else, including null and numbers, is `None`.
pub fn decode_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Text(raw) => decode_date_str(raw),
        _ => None,
    }
}

pub fn decode_date_str(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(inner) = trimmed
        .strip_prefix("Date(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return decode_serial_parts(inner);
    }
    parse_calendar_str(trimmed)
}

fn decode_serial_parts(inner: &str) -> Option<NaiveDateTime> {
    let parts = inner
        .split(',')
        .map(|part| part.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if !(3..=7).contains(&parts.len()) {
        return None;
    }
    let part = |idx: usize| parts.get(idx).copied().unwrap_or(0);

    let year = i32::try_from(part(0)).ok()?;
    let month = u32::try_from(part(1).checked_add(1)?).ok()?;
    let day = u32::try_from(part(2)).ok()?;
    let hour = u32::try_from(part(3)).ok()?;
    let minute = u32::try_from(part(4)).ok()?;
    let second = u32::try_from(part(5)).ok()?;
    let milli = u32::try_from(part(6)).ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_milli_opt(hour, minute, second, milli)
}

fn parse_calendar_str(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}
