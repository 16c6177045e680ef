//! Timestamp and time-of-day values with optional fixed UTC offsets.
//!
//! chrono models a naive date-time and an offset-aware date-time as different
//! types, and has no offset-aware time of day at all. The JSON wire format
//! allows the offset to be present or absent on both, so these wrappers carry
//! the naive value plus an `Option<FixedOffset>` and own the strict ISO-8601
//! text form used for implicit encoding.

use std::fmt;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};

/// A date and time of day, optionally pinned to a fixed UTC offset.
///
/// # Examples
///
/// ```
/// # use automap::Timestamp;
/// let ts = Timestamp::parse("2000-09-01T21:55:02+00:00").unwrap();
/// assert_eq!(ts.to_string(), "2000-09-01T21:55:02+00:00");
///
/// let naive = Timestamp::parse("2000-09-01T21:55:02.5").unwrap();
/// assert!(naive.offset().is_none());
/// assert_eq!(naive.to_string(), "2000-09-01T21:55:02.500000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Creates a timestamp from its local date-time and optional offset.
    pub fn new(naive: NaiveDateTime, offset: Option<FixedOffset>) -> Self {
        Self { naive, offset }
    }

    /// Creates a timestamp without an offset.
    pub fn naive(naive: NaiveDateTime) -> Self {
        Self::new(naive, None)
    }

    /// Current time in UTC.
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Returns the local date-time, as written on the wire.
    pub fn local(&self) -> NaiveDateTime {
        self.naive
    }

    /// Returns the UTC offset, if any.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Converts to an offset-aware chrono value. `None` for naive timestamps.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset?;
        offset.from_local_datetime(&self.naive).single()
    }

    /// Parses the strict `YYYY-MM-DDTHH:MM:SS[.f][±HH:MM]` form.
    ///
    /// Returns `None` when the text has any other shape or names an
    /// impossible date or time.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() < 19 || !matches_shape(&bytes[..19], b"####-##-##T##:##:##") {
            return None;
        }
        let date = parse_date(&bytes[..10])?;
        let (time, offset) = parse_time_with_offset(&bytes[11..])?;
        Some(Self::new(date.and_time(time), offset))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T", self.naive.date().format("%Y-%m-%d"))?;
        write_time(f, self.naive.time())?;
        write_offset(f, self.offset)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        let fixed = value.fixed_offset();
        Self::new(fixed.naive_local(), Some(*fixed.offset()))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::naive(value)
    }
}

/// A time of day, optionally pinned to a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    naive: NaiveTime,
    offset: Option<FixedOffset>,
}

impl TimeOfDay {
    /// Creates a time of day from its local time and optional offset.
    pub fn new(naive: NaiveTime, offset: Option<FixedOffset>) -> Self {
        Self { naive, offset }
    }

    /// Returns the local time, as written on the wire.
    pub fn local(&self) -> NaiveTime {
        self.naive
    }

    /// Returns the UTC offset, if any.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Parses the strict `HH:MM:SS[.f][±HH:MM]` form.
    pub fn parse(s: &str) -> Option<Self> {
        let (naive, offset) = parse_time_with_offset(s.as_bytes())?;
        Some(Self::new(naive, offset))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_time(f, self.naive)?;
        write_offset(f, self.offset)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        Self::new(value, None)
    }
}

/// Formats a date as `YYYY-MM-DD`.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a strict `YYYY-MM-DD` date.
pub(crate) fn parse_date_str(s: &str) -> Option<NaiveDate> {
    parse_date(s.as_bytes())
}

fn parse_date(bytes: &[u8]) -> Option<NaiveDate> {
    if !matches_shape(bytes, b"####-##-##") {
        return None;
    }
    NaiveDate::from_ymd_opt(
        digits(&bytes[0..4]) as i32,
        digits(&bytes[5..7]),
        digits(&bytes[8..10]),
    )
}

/// Parses `HH:MM:SS`, an optional fraction and an optional offset, consuming
/// the whole input.
fn parse_time_with_offset(bytes: &[u8]) -> Option<(NaiveTime, Option<FixedOffset>)> {
    if bytes.len() < 8 || !matches_shape(&bytes[..8], b"##:##:##") {
        return None;
    }
    let mut rest = &bytes[8..];

    let mut nanos = 0;
    if let Some(fraction) = rest.strip_prefix(b".") {
        let len = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 || len > 9 {
            return None;
        }
        nanos = digits(&fraction[..len]) * 10u32.pow(9 - len as u32);
        rest = &fraction[len..];
    }

    let offset = match rest {
        [] => None,
        [sign @ (b'+' | b'-'), tail @ ..] if matches_shape(tail, b"##:##") => {
            let (hours, minutes) = (digits(&tail[0..2]), digits(&tail[3..5]));
            if hours > 23 || minutes > 59 {
                return None;
            }
            let seconds = (hours * 3600 + minutes * 60) as i32;
            let seconds = if *sign == b'-' { -seconds } else { seconds };
            Some(FixedOffset::east_opt(seconds)?)
        }
        _ => return None,
    };

    let time = NaiveTime::from_hms_nano_opt(
        digits(&bytes[0..2]),
        digits(&bytes[3..5]),
        digits(&bytes[6..8]),
        nanos,
    )?;
    Some((time, offset))
}

fn write_time(f: &mut fmt::Formatter<'_>, time: NaiveTime) -> fmt::Result {
    write!(f, "{}", time.format("%H:%M:%S"))?;
    let nanos = time.nanosecond() % 1_000_000_000;
    if nanos == 0 {
        Ok(())
    } else if nanos % 1_000 == 0 {
        write!(f, ".{:06}", nanos / 1_000)
    } else {
        write!(f, ".{nanos:09}")
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<FixedOffset>) -> fmt::Result {
    let Some(offset) = offset else {
        return Ok(());
    };
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Checks `bytes` against a shape where `#` is an ASCII digit, `x` is an
/// ASCII hex digit and anything else must match literally.
pub(crate) fn matches_shape(bytes: &[u8], shape: &[u8]) -> bool {
    bytes.len() == shape.len()
        && bytes.iter().zip(shape).all(|(b, s)| match s {
            b'#' => b.is_ascii_digit(),
            b'x' => b.is_ascii_hexdigit(),
            literal => b == literal,
        })
}

/// Decimal value of a run of ASCII digits already validated by `matches_shape`.
fn digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
