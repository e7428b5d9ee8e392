//! ISO-8601 parsing and formatting for timestamps and calendar dates.
//!
//! Timestamps are naive (`PrimitiveDateTime`); payloads carrying an
//! RFC 3339 offset are accepted and normalized to UTC. Formatting emits
//! microsecond precision when the value has a fractional second,
//! matching what the existing payload producers emit.

use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const DATETIME_FRACTION_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

const DATETIME_MICROS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");

pub(crate) fn parse_timestamp(text: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(text, DATETIME_FRACTION_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, DATETIME_FORMAT))
        .ok()
        .or_else(|| {
            let parsed = OffsetDateTime::parse(text, &Rfc3339).ok()?;
            let utc = parsed.to_offset(UtcOffset::UTC);
            Some(PrimitiveDateTime::new(utc.date(), utc.time()))
        })
}

pub(crate) fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text, DATE_FORMAT).ok()
}

pub(crate) fn format_timestamp(value: PrimitiveDateTime) -> Result<String, time::error::Format> {
    if value.time().nanosecond() == 0 {
        value.format(DATETIME_FORMAT)
    } else {
        value.format(DATETIME_MICROS_FORMAT)
    }
}

pub(crate) fn format_date(value: Date) -> Result<String, time::error::Format> {
    value.format(DATE_FORMAT)
}

/// Opportunistic timestamp sniffing for untyped text. Bare dates parse
/// to midnight, matching how loosely-typed peers interpret them.
pub(crate) fn sniff_timestamp(text: &str) -> Option<PrimitiveDateTime> {
    parse_timestamp(text).or_else(|| parse_date(text).map(Date::midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_and_formats_whole_seconds() {
        let ts = parse_timestamp("2024-03-01T12:30:00").unwrap();
        assert_eq!(ts, datetime!(2024-03-01 12:30:00));
        assert_eq!(format_timestamp(ts).unwrap(), "2024-03-01T12:30:00");
    }

    #[test]
    fn parses_and_formats_fractional_seconds() {
        let ts = parse_timestamp("2024-03-01T12:30:00.250000").unwrap();
        assert_eq!(ts, datetime!(2024-03-01 12:30:00.25));
        assert_eq!(format_timestamp(ts).unwrap(), "2024-03-01T12:30:00.250000");
    }

    #[test]
    fn normalizes_rfc3339_offsets_to_utc() {
        let ts = parse_timestamp("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(ts, datetime!(2024-03-01 10:30:00));
    }

    #[test]
    fn date_round_trip() {
        let d = parse_date("2024-02-29").unwrap();
        assert_eq!(d, date!(2024-02-29));
        assert_eq!(format_date(d).unwrap(), "2024-02-29");
    }

    #[test]
    fn sniffs_bare_dates_to_midnight() {
        assert_eq!(
            sniff_timestamp("2024-03-01"),
            Some(datetime!(2024-03-01 00:00:00))
        );
        assert_eq!(sniff_timestamp("not a date"), None);
    }
}
