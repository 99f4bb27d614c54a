//! Record normalization.
//!
//! Turns raw export rows into [`EmailRecord`]s:
//! - subject and body are trimmed and lower-cased
//! - the sender header is split into display name and address
//! - the date is parsed; rows without a usable date are dropped

use chrono::{Datelike, DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::DateOrder;
use crate::domain::{Address, EmailRecord, RawRow};

/// Parses an exported date string. Returns `None` when it cannot.
pub trait TimestampParser {
    fn parse(&self, raw: &str) -> Option<NaiveDateTime>;
}

/// Formats tried regardless of the configured order.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
    "%m.%d.%Y %H:%M:%S",
    "%m.%d.%Y %H:%M",
];

const MONTH_FIRST_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

/// Locale-independent parser over a fixed list of chrono formats.
///
/// RFC 3339, RFC 2822 and ISO `yyyy-mm-dd` are always accepted. Purely
/// numeric dates are read with the configured [`DateOrder`]; a two-digit year
/// is read as `20yy`/`19yy` the way chrono's `%y` does. Zoned inputs keep
/// their wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoTimestampParser {
    order: DateOrder,
}

impl ChronoTimestampParser {
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    fn ordered_formats(&self) -> (&'static [&'static str], &'static [&'static str]) {
        match self.order {
            DateOrder::DayFirst => (DAY_FIRST_DATETIME_FORMATS, DAY_FIRST_DATE_FORMATS),
            DateOrder::MonthFirst => (MONTH_FIRST_DATETIME_FORMATS, MONTH_FIRST_DATE_FORMATS),
        }
    }
}

impl TimestampParser for ChronoTimestampParser {
    fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.naive_local());
        }

        let (ordered_datetime, ordered_date) = self.ordered_formats();

        ISO_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| parse_datetime(raw, fmt, false))
            .or_else(|| {
                ordered_datetime
                    .iter()
                    .find_map(|fmt| parse_datetime(raw, fmt, true))
            })
            .or_else(|| {
                ISO_DATE_FORMATS
                    .iter()
                    .find_map(|fmt| parse_date(raw, fmt, false))
            })
            .or_else(|| {
                ordered_date
                    .iter()
                    .find_map(|fmt| parse_date(raw, fmt, true))
            })
    }
}

/// Parses with `%Y`. A year below 100 is either re-read with `%y` or
/// rejected, so `24/03/15` never becomes the year 24.
fn parse_datetime(raw: &str, fmt: &str, short_year: bool) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw, fmt) {
        Ok(dt) if dt.year() >= 100 => Some(dt),
        Ok(_) if short_year => NaiveDateTime::parse_from_str(raw, &fmt.replace("%Y", "%y")).ok(),
        _ => None,
    }
}

fn parse_date(raw: &str, fmt: &str, short_year: bool) -> Option<NaiveDateTime> {
    let date = match NaiveDate::parse_from_str(raw, fmt) {
        Ok(d) if d.year() >= 100 => d,
        Ok(_) if short_year => NaiveDate::parse_from_str(raw, &fmt.replace("%Y", "%y")).ok()?,
        _ => return None,
    };
    Some(date.and_time(NaiveTime::MIN))
}

/// Result of normalizing a batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Surviving records, in input order.
    pub records: Vec<EmailRecord>,
    /// Rows dropped for an unparseable date.
    pub dropped: usize,
}

/// Record normalizer.
pub struct Normalizer<P: TimestampParser = ChronoTimestampParser> {
    parser: P,
}

impl Normalizer<ChronoTimestampParser> {
    /// Creates a normalizer with the bundled chrono parser.
    pub fn with_date_order(order: DateOrder) -> Self {
        Self::new(ChronoTimestampParser::new(order))
    }
}

impl<P: TimestampParser> Normalizer<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Normalizes one row; `None` when its date does not parse.
    pub fn normalize_row(&self, row: &RawRow) -> Option<EmailRecord> {
        let timestamp = self.parser.parse(&row.date)?;
        let address = Address::parse(&row.from_header);

        Some(EmailRecord {
            display_name: address.display_name().to_string(),
            has_display_name: address.name.is_some(),
            email_address: address.email,
            subject: row.subject.trim().to_lowercase(),
            body: row.body.trim().to_lowercase(),
            timestamp,
        })
    }

    /// Normalizes a batch, preserving order and counting drops.
    pub fn normalize<'a>(&self, rows: impl IntoIterator<Item = &'a RawRow>) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();

        for (index, row) in rows.into_iter().enumerate() {
            match self.normalize_row(row) {
                Some(record) => outcome.records.push(record),
                None => {
                    tracing::debug!(row = index, date = %row.date, "Dropping row with unparseable date");
                    outcome.dropped += 1;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn day_first_numeric_dates() {
        let parser = ChronoTimestampParser::new(DateOrder::DayFirst);
        assert_eq!(parser.parse("03/04/2024 10:30"), Some(ymd_hm(2024, 4, 3, 10, 30)));
        assert_eq!(parser.parse("15/03/2024"), Some(ymd_hm(2024, 3, 15, 0, 0)));
        assert_eq!(parser.parse("15-03-2024 9:05"), Some(ymd_hm(2024, 3, 15, 9, 5)));
    }

    #[test]
    fn month_first_numeric_dates() {
        let parser = ChronoTimestampParser::new(DateOrder::MonthFirst);
        assert_eq!(parser.parse("03/04/2024 10:30"), Some(ymd_hm(2024, 3, 4, 10, 30)));
        assert_eq!(parser.parse("15/03/2024"), None);
    }

    #[test]
    fn two_digit_years() {
        let parser = ChronoTimestampParser::default();
        let parsed = parser.parse("15/03/24").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 3);
    }

    #[test]
    fn twelve_hour_clock() {
        let parser = ChronoTimestampParser::default();
        let parsed = parser.parse("15/03/2024 3:15 PM").unwrap();
        assert_eq!(parsed.hour(), 15);
    }

    #[test]
    fn iso_and_rfc_formats() {
        let parser = ChronoTimestampParser::default();
        assert_eq!(parser.parse("2024-03-15 08:00:00"), Some(ymd_hm(2024, 3, 15, 8, 0)));
        assert_eq!(parser.parse("2024-03-15T08:00:00+02:00"), Some(ymd_hm(2024, 3, 15, 8, 0)));
        assert_eq!(
            parser.parse("Fri, 15 Mar 2024 08:00:00 +0000"),
            Some(ymd_hm(2024, 3, 15, 8, 0))
        );
    }

    #[test]
    fn fractional_seconds() {
        let parser = ChronoTimestampParser::default();
        assert_eq!(parser.parse("2024-03-15 08:00:00.000"), Some(ymd_hm(2024, 3, 15, 8, 0)));

        let precise = parser.parse("2024-03-15T08:00:00.250").unwrap();
        assert_eq!(precise.date(), ymd_hm(2024, 3, 15, 8, 0).date());
        assert_eq!(precise.nanosecond(), 250_000_000);
    }

    #[test]
    fn garbage_dates_fail() {
        let parser = ChronoTimestampParser::default();
        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("ayer"), None);
        assert_eq!(parser.parse("32/01/2024"), None);
    }

    #[test]
    fn normalize_row_fields() {
        let normalizer = Normalizer::with_date_order(DateOrder::DayFirst);
        let row = RawRow::new(
            "  Ana Pérez <ANA@Example.com> ",
            "  URGENTE: Informe ",
            " Favor REVISAR \n",
            "01/02/2024 10:00",
        );
        let record = normalizer.normalize_row(&row).unwrap();

        assert_eq!(record.display_name, "Ana Pérez");
        assert!(record.has_display_name);
        assert_eq!(record.email_address, "ana@example.com");
        assert_eq!(record.subject, "urgente: informe");
        assert_eq!(record.body, "favor revisar");
        assert_eq!(record.timestamp, ymd_hm(2024, 2, 1, 10, 0));
    }

    #[test]
    fn bare_address_falls_back_to_local_part() {
        let normalizer = Normalizer::with_date_order(DateOrder::DayFirst);
        let record = normalizer
            .normalize_row(&RawRow::new("j@x.com", "", "", "2024-01-01"))
            .unwrap();
        assert_eq!(record.display_name, "j");
        assert!(!record.has_display_name);
    }

    #[test]
    fn local_part_name_keeps_case() {
        let normalizer = Normalizer::with_date_order(DateOrder::DayFirst);
        let record = normalizer
            .normalize_row(&RawRow::new("John.Doe@X.com", "", "", "2024-01-01"))
            .unwrap();
        assert_eq!(record.display_name, "John.Doe");
        assert_eq!(record.email_address, "john.doe@x.com");
    }

    #[test]
    fn normalize_drops_bad_dates_and_keeps_order() {
        let normalizer = Normalizer::with_date_order(DateOrder::DayFirst);
        let rows = vec![
            RawRow::new("a@x.com", "uno", "", "01/01/2024"),
            RawRow::new("b@x.com", "dos", "", "not a date"),
            RawRow::new("c@x.com", "tres", "", "02/01/2024"),
        ];
        let outcome = normalizer.normalize(&rows);

        assert_eq!(outcome.dropped, 1);
        let subjects: Vec<_> = outcome.records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["uno", "tres"]);
    }

    struct AlwaysNone;

    impl TimestampParser for AlwaysNone {
        fn parse(&self, _raw: &str) -> Option<NaiveDateTime> {
            None
        }
    }

    #[test]
    fn custom_parser_is_used() {
        let normalizer = Normalizer::new(AlwaysNone);
        let outcome = normalizer.normalize(&[RawRow::new("a@x.com", "", "", "2024-01-01")]);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped, 1);
    }
}
