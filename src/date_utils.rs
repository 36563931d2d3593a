use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Current time as stored in every timestamp column.
pub fn now_iso() -> String {
    to_iso(Utc::now())
}

pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Lower bound of a date-range filter.
pub fn range_start(s: &str) -> Option<String> {
    parse_timestamp(s).map(to_iso)
}

/// Upper bound of a date-range filter. A bare date covers the whole day.
pub fn range_end(s: &str) -> Option<String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
        return Some(to_iso(date.and_time(end).and_utc()));
    }
    range_start(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_date_is_midnight_utc() {
        assert_eq!(
            range_start("2024-03-05").as_deref(),
            Some("2024-03-05T00:00:00.000Z")
        );
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        assert_eq!(
            range_start("2024-03-05T10:30:00+02:00").as_deref(),
            Some("2024-03-05T08:30:00.000Z")
        );
    }

    #[test]
    fn test_range_end_covers_whole_day() {
        assert_eq!(
            range_end("2024-03-05").as_deref(),
            Some("2024-03-05T23:59:59.999Z")
        );
        assert_eq!(
            range_end("2024-03-05T12:00:00Z").as_deref(),
            Some("2024-03-05T12:00:00.000Z")
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
    }

    #[test]
    fn test_now_iso_round_trips() {
        let now = now_iso();
        assert!(now.ends_with('Z'));
        assert!(parse_timestamp(&now).is_some());
    }
}
