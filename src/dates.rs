use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Reads a calendar date out of a stored date field, dropping any time of day.
///
/// Accepts ISO dates, German "31.12.2024" dates and ISO timestamps. Timestamps carrying an offset
/// are moved to the local timezone before the time is dropped. Returns None for empty or
/// unreadable fields.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    {
        return Some(date);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.with_timezone(&Local).date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|date_time| date_time.date())
}

pub fn parse_optional_calendar_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(parse_calendar_date)
}

#[cfg(test)]
mod tests {
    use super::{parse_calendar_date, parse_optional_calendar_date};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn iso_date() {
        assert_eq!(parse_calendar_date("2024-03-15"), Some(date(2024, 3, 15)))
    }

    #[test]
    fn german_date() {
        assert_eq!(parse_calendar_date("15.03.2024"), Some(date(2024, 3, 15)))
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse_calendar_date("  2024-03-15 "), Some(date(2024, 3, 15)))
    }

    #[test]
    fn naive_timestamp_drops_time() {
        assert_eq!(parse_calendar_date("2024-03-15T23:59:59"), Some(date(2024, 3, 15)));
        assert_eq!(parse_calendar_date("2024-03-15T08:30:00.250"), Some(date(2024, 3, 15)));
        assert_eq!(parse_calendar_date("2024-03-15 08:30:00"), Some(date(2024, 3, 15)));
        assert_eq!(parse_calendar_date("2024-03-15T08:30"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn timestamp_with_offset() {
        // Noon UTC is the same calendar day in every timezone between -11:00 and +11:00
        assert_eq!(parse_calendar_date("2024-03-15T12:00:00Z"), Some(date(2024, 3, 15)))
    }

    #[test]
    fn empty_or_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("   "), None);
        assert_eq!(parse_calendar_date("next week"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }

    #[test]
    fn optional() {
        assert_eq!(parse_optional_calendar_date(None), None);
        assert_eq!(parse_optional_calendar_date(Some("2024-03-15")), Some(date(2024, 3, 15)));
    }
}
