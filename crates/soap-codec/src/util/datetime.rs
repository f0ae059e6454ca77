//! Timestamp type and the textual layouts used on the wire.
//!
//! The canonical layout is `YYYY-MM-DDTHH:MM:SS.nnnnnnnnn±HH:MM`: nine
//! fractional digits and an explicit numeric UTC offset. The encoder writes
//! only this layout and the strict accessor reads only this layout.
//!
//! Lenient reading additionally accepts three offset-less SQL-style layouts,
//! interpreted in a caller-supplied offset:
//! - `YYYY-MM-DD HH:MM:SS`
//! - `YYYY-MM-DD HH:MM`
//! - `YYYY-MM-DD`

use std::fmt;

use thiserror::Error;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Length of `YYYY-MM-DDTHH:MM:SS.nnnnnnnnn+HH:MM`.
const SOAP_LAYOUT_LEN: usize = 35;

/// Years the four-digit layout can carry.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Largest offset the `±HH:MM` layout accepts (24:00).
const MAX_OFFSET_MIN: u16 = 24 * 60;

/// Local seconds of 0000-01-01T00:00:00 and 9999-12-31T23:59:59.
const MIN_LOCAL_SECS: i64 = -62_167_219_200;
const MAX_LOCAL_SECS: i64 = 253_402_300_799;

/// Error type for timestamp parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    fn new(what: &str, input: &str) -> Self {
        Self {
            message: format!("invalid {} in timestamp: {}", what, input),
        }
    }

    fn out_of_range(secs: i64, offset_min: i16) -> Self {
        Self {
            message: format!(
                "timestamp out of range: {} seconds at offset {} minutes",
                secs, offset_min
            ),
        }
    }
}

/// A point in time with the UTC offset it was written in.
///
/// Two timestamps are equal only if both the instant and the offset match.
/// The default is the Unix epoch in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    /// Seconds since 1970-01-01T00:00:00Z.
    secs: i64,
    /// Sub-second nanoseconds, always below 1e9.
    nanos: u32,
    /// UTC offset in minutes (e.g., +330 for +05:30).
    offset_min: i16,
}

impl Timestamp {
    /// Creates a timestamp. Nanoseconds beyond one second carry into `secs`.
    ///
    /// Fails unless the local date falls in years 0000 to 9999 and the offset
    /// is within ±24:00, the range the wire layout can carry.
    pub fn new(secs: i64, nanos: u32, offset_min: i16) -> Result<Self, DateTimeParseError> {
        let secs = secs
            .checked_add((nanos / NANOS_PER_SECOND) as i64)
            .ok_or_else(|| DateTimeParseError::out_of_range(secs, offset_min))?;
        Self::checked(secs, nanos % NANOS_PER_SECOND, offset_min)
    }

    /// Creates a UTC timestamp.
    pub fn from_unix(secs: i64, nanos: u32) -> Result<Self, DateTimeParseError> {
        Self::new(secs, nanos, 0)
    }

    /// Creates a timestamp from calendar fields given in local time at `offset_min`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanos: u32,
        offset_min: i16,
    ) -> Result<Self, DateTimeParseError> {
        let rendered = format!("{:04}-{:02}-{:02}", year, month, day);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateTimeParseError::new("year", &rendered));
        }
        if !(1..=12).contains(&month) {
            return Err(DateTimeParseError::new("month", &rendered));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(DateTimeParseError::new("day", &rendered));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(DateTimeParseError::new("time of day", &rendered));
        }
        if nanos >= NANOS_PER_SECOND {
            return Err(DateTimeParseError::new("fraction", &rendered));
        }
        let local = date_to_days(year, month, day) * SECONDS_PER_DAY
            + hour as i64 * SECONDS_PER_HOUR
            + minute as i64 * SECONDS_PER_MINUTE
            + second as i64;
        Self::checked(local - offset_min as i64 * SECONDS_PER_MINUTE, nanos, offset_min)
    }

    /// Validates the offset and the local date range. `nanos` is below 1e9.
    fn checked(secs: i64, nanos: u32, offset_min: i16) -> Result<Self, DateTimeParseError> {
        if offset_min.unsigned_abs() > MAX_OFFSET_MIN {
            return Err(DateTimeParseError::out_of_range(secs, offset_min));
        }
        let local = secs.checked_add(offset_min as i64 * SECONDS_PER_MINUTE);
        match local {
            Some(local) if (MIN_LOCAL_SECS..=MAX_LOCAL_SECS).contains(&local) => Ok(Self {
                secs,
                nanos,
                offset_min,
            }),
            _ => Err(DateTimeParseError::out_of_range(secs, offset_min)),
        }
    }

    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.secs
    }

    /// Sub-second nanoseconds.
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// UTC offset in minutes.
    pub fn offset_min(&self) -> i16 {
        self.offset_min
    }

    /// Same instant, rendered in another offset.
    pub fn with_offset(self, offset_min: i16) -> Result<Self, DateTimeParseError> {
        Self::checked(self.secs, self.nanos, offset_min)
    }

    /// Returns true if both timestamps denote the same instant, whatever their offsets.
    pub fn same_instant(&self, other: &Timestamp) -> bool {
        self.secs == other.secs && self.nanos == other.nanos
    }

    /// Splits into local (year, month, day) and seconds since local midnight.
    /// Construction keeps the local time inside years 0000 to 9999.
    fn local_parts(&self) -> ((i32, u32, u32), i64) {
        let local = self.secs + self.offset_min as i64 * SECONDS_PER_MINUTE;
        let days = local.div_euclid(SECONDS_PER_DAY);
        let secs_of_day = local.rem_euclid(SECONDS_PER_DAY);
        (days_to_date(days), secs_of_day)
    }

    /// Formats in the canonical wire layout.
    pub fn format_soap(&self) -> String {
        let ((year, month, day), sod) = self.local_parts();
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:09}{}",
            year,
            month,
            day,
            sod / SECONDS_PER_HOUR,
            (sod % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            sod % SECONDS_PER_MINUTE,
            self.nanos,
            format_offset(self.offset_min)
        )
    }

    /// Parses the canonical wire layout and nothing else.
    pub fn parse_soap(s: &str) -> Result<Self, DateTimeParseError> {
        if s.len() != SOAP_LAYOUT_LEN || !s.is_ascii() {
            return Err(DateTimeParseError::new("layout", s));
        }
        let (year, month, day) = parse_date_part(&s[..10], s)?;
        expect_byte(s, 10, b'T')?;
        let (hour, minute) = parse_hour_minute(&s[11..16], s)?;
        expect_byte(s, 16, b':')?;
        let second = parse_number(&s[17..19], "second", s)?;
        expect_byte(s, 19, b'.')?;
        let nanos = parse_number(&s[20..29], "fraction", s)?;
        let offset_min = parse_offset(&s[29..], s)?;
        Self::from_parts(year, month, day, hour, minute, second, nanos, offset_min)
    }

    /// Parses `YYYY-MM-DD HH:MM:SS` in the given offset.
    pub fn parse_sql_datetime(s: &str, offset_min: i16) -> Result<Self, DateTimeParseError> {
        if s.len() != 19 || !s.is_ascii() {
            return Err(DateTimeParseError::new("layout", s));
        }
        let (year, month, day) = parse_date_part(&s[..10], s)?;
        expect_byte(s, 10, b' ')?;
        let (hour, minute) = parse_hour_minute(&s[11..16], s)?;
        expect_byte(s, 16, b':')?;
        let second = parse_number(&s[17..19], "second", s)?;
        Self::from_parts(year, month, day, hour, minute, second, 0, offset_min)
    }

    /// Parses `YYYY-MM-DD HH:MM` in the given offset.
    pub fn parse_sql_minute(s: &str, offset_min: i16) -> Result<Self, DateTimeParseError> {
        if s.len() != 16 || !s.is_ascii() {
            return Err(DateTimeParseError::new("layout", s));
        }
        let (year, month, day) = parse_date_part(&s[..10], s)?;
        expect_byte(s, 10, b' ')?;
        let (hour, minute) = parse_hour_minute(&s[11..16], s)?;
        Self::from_parts(year, month, day, hour, minute, 0, 0, offset_min)
    }

    /// Parses `YYYY-MM-DD` as local midnight in the given offset.
    pub fn parse_date(s: &str, offset_min: i16) -> Result<Self, DateTimeParseError> {
        if s.len() != 10 || !s.is_ascii() {
            return Err(DateTimeParseError::new("layout", s));
        }
        let (year, month, day) = parse_date_part(s, s)?;
        Self::from_parts(year, month, day, 0, 0, 0, 0, offset_min)
    }

    /// Tries the canonical layout, then the SQL layouts in decreasing precision.
    pub fn parse_lenient(s: &str, offset_min: i16) -> Result<Self, DateTimeParseError> {
        Self::parse_soap(s)
            .or_else(|_| Self::parse_sql_datetime(s, offset_min))
            .or_else(|_| Self::parse_sql_minute(s, offset_min))
            .or_else(|_| Self::parse_date(s, offset_min))
            .map_err(|_| DateTimeParseError {
                message: format!("unrecognized timestamp layout: {}", s),
            })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_soap())
    }
}

fn expect_byte(s: &str, pos: usize, want: u8) -> Result<(), DateTimeParseError> {
    if s.as_bytes()[pos] == want {
        Ok(())
    } else {
        Err(DateTimeParseError::new("separator", s))
    }
}

/// Parses a fixed-width run of ASCII digits. Signs are rejected.
fn parse_number(digits: &str, what: &str, input: &str) -> Result<u32, DateTimeParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeParseError::new(what, input));
    }
    digits.parse().map_err(|_| DateTimeParseError::new(what, input))
}

fn parse_date_part(date: &str, input: &str) -> Result<(i32, u32, u32), DateTimeParseError> {
    let bytes = date.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(DateTimeParseError::new("date", input));
    }
    let year = parse_number(&date[..4], "year", input)? as i32;
    let month = parse_number(&date[5..7], "month", input)?;
    let day = parse_number(&date[8..10], "day", input)?;
    Ok((year, month, day))
}

fn parse_hour_minute(hm: &str, input: &str) -> Result<(u32, u32), DateTimeParseError> {
    if hm.as_bytes()[2] != b':' {
        return Err(DateTimeParseError::new("time", input));
    }
    let hour = parse_number(&hm[..2], "hour", input)?;
    let minute = parse_number(&hm[3..5], "minute", input)?;
    Ok((hour, minute))
}

/// Parses `±HH:MM` into minutes. `Z` is not part of the wire layout.
fn parse_offset(offset: &str, input: &str) -> Result<i16, DateTimeParseError> {
    if offset.len() != 6 || offset.as_bytes()[3] != b':' {
        return Err(DateTimeParseError::new("offset", input));
    }
    let sign = match offset.as_bytes()[0] {
        b'+' => 1i16,
        b'-' => -1i16,
        _ => return Err(DateTimeParseError::new("offset", input)),
    };
    let hours = parse_number(&offset[1..3], "offset", input)? as i16;
    let minutes = parse_number(&offset[4..6], "offset", input)? as i16;
    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(DateTimeParseError::new("offset", input));
    }
    Ok(sign * (hours * 60 + minutes))
}

/// Formats an offset as `±HH:MM`; UTC renders as `+00:00`.
fn format_offset(offset_min: i16) -> String {
    let sign = if offset_min < 0 { '-' } else { '+' };
    let abs = offset_min.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date (Howard Hinnant's algorithm).
fn date_to_days(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let m = if month <= 2 { month as i64 + 9 } else { month as i64 - 3 };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`date_to_days`].
fn days_to_date(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year as i32, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch() {
        assert_eq!(
            Timestamp::default().format_soap(),
            "1970-01-01T00:00:00.000000000+00:00"
        );
    }

    #[test]
    fn test_format_with_offset() {
        // 2024-03-15T09:00:00Z shown at +05:30
        let ts = Timestamp::new(1_710_493_200, 123_456_789, 330).unwrap();
        assert_eq!(ts.format_soap(), "2024-03-15T14:30:00.123456789+05:30");

        let ts = Timestamp::new(1_710_493_200, 0, -300).unwrap();
        assert_eq!(ts.format_soap(), "2024-03-15T04:00:00.000000000-05:00");
    }

    #[test]
    fn test_soap_roundtrip() {
        let samples = [
            "1970-01-01T00:00:00.000000000+00:00",
            "2024-03-15T14:30:00.123456789+05:30",
            "2000-02-29T23:59:59.999999999-08:00",
            "1969-12-31T23:59:59.500000000+00:00",
            "2024-12-31T00:00:00.000000001+24:00",
        ];
        for s in samples {
            let ts = Timestamp::parse_soap(s).unwrap();
            assert_eq!(ts.format_soap(), s, "roundtrip failed for {}", s);
        }
    }

    #[test]
    fn test_negative_epoch() {
        let ts = Timestamp::parse_soap("1969-12-31T23:59:59.000000000+00:00").unwrap();
        assert_eq!(ts.unix_seconds(), -1);
        assert_eq!(ts.nanos(), 0);
    }

    #[test]
    fn test_offset_changes_instant() {
        let local = Timestamp::parse_soap("2024-03-15T14:30:00.000000000+05:30").unwrap();
        let utc = Timestamp::parse_soap("2024-03-15T09:00:00.000000000+00:00").unwrap();
        assert!(local.same_instant(&utc));
        assert_ne!(local, utc);
        assert_eq!(local.with_offset(0).unwrap(), utc);
        assert!(local.with_offset(24 * 60 + 1).is_err());
    }

    #[test]
    fn test_soap_rejects_other_layouts() {
        assert!(Timestamp::parse_soap("2024-03-15T14:30:00Z").is_err());
        assert!(Timestamp::parse_soap("2024-03-15T14:30:00.123+05:30").is_err());
        assert!(Timestamp::parse_soap("2024-03-15 14:30:00.000000000+05:30").is_err());
        assert!(Timestamp::parse_soap("2024-03-15T14:30:00.000000000Z00:00").is_err());
        assert!(Timestamp::parse_soap("2024-13-15T14:30:00.000000000+00:00").is_err());
        assert!(Timestamp::parse_soap("2023-02-29T14:30:00.000000000+00:00").is_err());
        assert!(Timestamp::parse_soap("2024-03-15T24:30:00.000000000+00:00").is_err());
        assert!(Timestamp::parse_soap("2024-03-15T14:30:00.000000000+24:01").is_err());
    }

    #[test]
    fn test_sql_layouts() {
        let ts = Timestamp::parse_sql_datetime("2024-03-15 14:30:07", 0).unwrap();
        assert_eq!(ts.format_soap(), "2024-03-15T14:30:07.000000000+00:00");

        let ts = Timestamp::parse_sql_minute("2024-03-15 14:30", 60).unwrap();
        assert_eq!(ts.format_soap(), "2024-03-15T14:30:00.000000000+01:00");

        let ts = Timestamp::parse_date("2024-03-15", 0).unwrap();
        assert_eq!(ts.unix_seconds(), 19_797 * 86_400);

        assert!(Timestamp::parse_sql_minute("2024-03-15 14:30:07", 0).is_err());
        assert!(Timestamp::parse_date("2024-03-15 00:00", 0).is_err());
    }

    #[test]
    fn test_lenient_order() {
        let full = Timestamp::parse_lenient("2024-03-15T14:30:00.000000000+05:30", 0).unwrap();
        assert_eq!(full.offset_min(), 330);

        let sec = Timestamp::parse_lenient("2024-03-15 14:30:00", 120).unwrap();
        assert_eq!(sec.offset_min(), 120);
        assert_eq!(sec.format_soap(), "2024-03-15T14:30:00.000000000+02:00");

        let min = Timestamp::parse_lenient("2024-03-15 14:30", 0).unwrap();
        assert_eq!(min.format_soap(), "2024-03-15T14:30:00.000000000+00:00");
        assert!(!min.same_instant(&sec));

        let day = Timestamp::parse_lenient("2024-03-15", 0).unwrap();
        assert_eq!(day.format_soap(), "2024-03-15T00:00:00.000000000+00:00");

        assert!(Timestamp::parse_lenient("15/03/2024", 0).is_err());
        assert!(Timestamp::parse_lenient("", 0).is_err());
    }

    #[test]
    fn test_calendar_roundtrip() {
        for days in [-719_468i64, -1, 0, 59, 60, 11_016, 19_797, 2_932_896] {
            let (y, m, d) = days_to_date(days);
            assert_eq!(date_to_days(y, m, d), days);
        }
        assert_eq!(days_to_date(19_797), (2024, 3, 15));
    }

    #[test]
    fn test_new_carries_nanos() {
        let ts = Timestamp::new(10, 2_500_000_000, 0).unwrap();
        assert_eq!(ts.unix_seconds(), 12);
        assert_eq!(ts.nanos(), 500_000_000);
    }

    #[test]
    fn test_range_edges() {
        let first = Timestamp::from_parts(0, 1, 1, 0, 0, 0, 0, 0).unwrap();
        assert_eq!(first.unix_seconds(), MIN_LOCAL_SECS);
        assert_eq!(first.format_soap(), "0000-01-01T00:00:00.000000000+00:00");
        assert_eq!(Timestamp::parse_soap(&first.format_soap()).unwrap(), first);

        let last = Timestamp::new(MAX_LOCAL_SECS, 999_999_999, 0).unwrap();
        assert_eq!(last.format_soap(), "9999-12-31T23:59:59.999999999+00:00");
        assert_eq!(Timestamp::parse_soap(&last.format_soap()).unwrap(), last);

        let east = Timestamp::new(MAX_LOCAL_SECS - 24 * 3600, 0, 24 * 60).unwrap();
        assert_eq!(east.format_soap(), "9999-12-31T23:59:59.000000000+24:00");
        assert_eq!(Timestamp::parse_soap(&east.format_soap()).unwrap(), east);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Timestamp::new(MAX_LOCAL_SECS + 1, 0, 0).is_err());
        assert!(Timestamp::new(MIN_LOCAL_SECS - 1, 0, 0).is_err());
        assert!(Timestamp::new(MAX_LOCAL_SECS, 1_000_000_000, 0).is_err());
        assert!(Timestamp::new(0, 0, 6000).is_err());
        assert!(Timestamp::new(0, 0, i16::MIN).is_err());
        assert!(Timestamp::new(i64::MAX, 0, 60).is_err());
        assert!(Timestamp::new(i64::MAX, u32::MAX, 0).is_err());
        assert!(Timestamp::new(MAX_LOCAL_SECS, 0, 1).is_err());
        assert!(Timestamp::from_parts(10000, 1, 1, 0, 0, 0, 0, 0).is_err());
        assert!(Timestamp::from_parts(-1, 12, 31, 0, 0, 0, 0, 0).is_err());
        assert!(Timestamp::from_parts(2024, 1, 1, 0, 0, 0, 0, 24 * 60 + 1).is_err());
    }
}
