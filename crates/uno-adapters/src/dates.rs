//! Conversion between chrono date-times and `com.sun.star.util.Date` /
//! `com.sun.star.util.DateTime`.
//!
//! [`DateConverter`] wraps a [`NaiveDateTime`]. Arithmetic is forwarded to
//! the inner value; results that are date-times come back wrapped, while
//! differences stay plain [`Duration`]s.

use std::fmt;
use std::ops::Sub;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use uno_delegate::delegate_binary_ops;

use crate::error::{AdapterError, Result};

/// `com.sun.star.util.Date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnoDate {
    pub day: u16,
    pub month: u16,
    pub year: i16,
}

impl UnoDate {
    pub fn new(day: u16, month: u16, year: i16) -> Self {
        Self { day, month, year }
    }
}

/// `com.sun.star.util.DateTime`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnoDateTime {
    pub nano_seconds: u32,
    pub seconds: u16,
    pub minutes: u16,
    pub hours: u16,
    pub day: u16,
    pub month: u16,
    pub year: i16,
    pub is_utc: bool,
}

/// A date-time convertible to and from the UNO date structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateConverter(NaiveDateTime);

impl DateConverter {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    ) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_micro_opt(hour, minute, second, microsecond))
            .map(Self)
            .ok_or_else(|| {
                AdapterError::InvalidDate(format!(
                    "{year:04}-{month:02}-{day:02} \
                     {hour:02}:{minute:02}:{second:02}.{microsecond:06}"
                ))
            })
    }

    /// Midnight of the given day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, 0, 0, 0, 0)
    }

    /// The current local date-time.
    pub fn today() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn from_date_time(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// From a `Date`; the time of day is midnight.
    pub fn from_uno_date(date: &UnoDate) -> Result<Self> {
        Self::from_ymd(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )
    }

    /// From a `DateTime`; nanoseconds are truncated to microseconds.
    pub fn from_uno_date_time(dt: &UnoDateTime) -> Result<Self> {
        Self::new(
            i32::from(dt.year),
            u32::from(dt.month),
            u32::from(dt.day),
            u32::from(dt.hours),
            u32::from(dt.minutes),
            u32::from(dt.seconds),
            dt.nano_seconds / 1000,
        )
    }

    pub fn to_uno_date(&self) -> Result<UnoDate> {
        Ok(UnoDate {
            day: self.0.day() as u16,
            month: self.0.month() as u16,
            year: self.uno_year()?,
        })
    }

    /// The `DateTime` equivalent, always with `is_utc == false`.
    pub fn to_uno_date_time(&self) -> Result<UnoDateTime> {
        Ok(UnoDateTime {
            nano_seconds: self.microsecond() * 1000,
            seconds: self.0.second() as u16,
            minutes: self.0.minute() as u16,
            hours: self.0.hour() as u16,
            day: self.0.day() as u16,
            month: self.0.month() as u16,
            year: self.uno_year()?,
            is_utc: false,
        })
    }

    /// `self + delta`, or [`AdapterError::InvalidDate`] when the result is
    /// out of range.
    pub fn checked_add(&self, delta: Duration) -> Result<Self> {
        self.0
            .checked_add_signed(delta)
            .map(Self)
            .ok_or_else(|| self.overflow('+', delta))
    }

    /// `self - delta`, or [`AdapterError::InvalidDate`] when the result is
    /// out of range.
    pub fn checked_sub(&self, delta: Duration) -> Result<Self> {
        self.0
            .checked_sub_signed(delta)
            .map(Self)
            .ok_or_else(|| self.overflow('-', delta))
    }

    fn overflow(&self, op: char, delta: Duration) -> AdapterError {
        AdapterError::InvalidDate(format!("{} {op} {delta} is out of range", self.0))
    }

    fn uno_year(&self) -> Result<i16> {
        i16::try_from(self.0.year()).map_err(|_| {
            AdapterError::InvalidDate(format!("year {} does not fit a UNO date", self.0.year()))
        })
    }

    pub fn microsecond(&self) -> u32 {
        // Leap seconds are represented as nanosecond >= 1_000_000_000.
        (self.0.nanosecond() % 1_000_000_000) / 1000
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

// `+ Duration` and `- Duration` panic when the result is out of range, like
// the chrono operators they forward to; use `checked_add`/`checked_sub`
// when that can happen.
delegate_binary_ops! {
    DateConverter => 0 {
        Add::add(Duration) -> DateConverter => DateConverter;
        Sub::sub(Duration) -> DateConverter => DateConverter;
        Sub::sub(NaiveDateTime) -> Duration;
    }
}

impl Sub for DateConverter {
    type Output = Duration;

    fn sub(self, rhs: DateConverter) -> Duration {
        self.0 - rhs.0
    }
}

impl Sub<DateConverter> for NaiveDateTime {
    type Output = Duration;

    fn sub(self, rhs: DateConverter) -> Duration {
        self - rhs.0
    }
}

impl From<NaiveDateTime> for DateConverter {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl From<DateConverter> for NaiveDateTime {
    fn from(dc: DateConverter) -> Self {
        dc.0
    }
}

impl TryFrom<UnoDate> for DateConverter {
    type Error = AdapterError;

    fn try_from(date: UnoDate) -> Result<Self> {
        Self::from_uno_date(&date)
    }
}

impl TryFrom<UnoDateTime> for DateConverter {
    type Error = AdapterError;

    fn try_from(dt: UnoDateTime) -> Result<Self> {
        Self::from_uno_date_time(&dt)
    }
}

impl fmt::Display for DateConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_add_duration_stays_wrapped() {
        let dc = DateConverter::from_ymd(2013, 10, 16).unwrap() + Duration::days(-1);
        assert_eq!(dc, DateConverter::from_ymd(2013, 10, 15).unwrap());
        let dc = dc - Duration::hours(1);
        assert_eq!(dc.as_naive(), naive(2013, 10, 14, 23, 0));
    }

    #[test]
    fn test_differences_are_durations() {
        let dc = DateConverter::from_ymd(2013, 10, 16).unwrap();
        assert_eq!(dc - naive(2013, 10, 15, 0, 0), Duration::days(1));

        let later = naive(2013, 10, 16, 15, 55);
        let earlier = DateConverter::new(2013, 10, 16, 15, 50, 0, 0).unwrap();
        assert_eq!(later - earlier, Duration::seconds(300));
        assert_eq!(DateConverter::from(later) - earlier, Duration::seconds(300));
    }

    #[test]
    fn test_to_uno_date() {
        let dc = DateConverter::from_ymd(2013, 10, 16).unwrap();
        assert_eq!(dc.to_uno_date().unwrap(), UnoDate::new(16, 10, 2013));
    }

    #[test]
    fn test_to_uno_date_time() {
        let dc = DateConverter::new(2013, 10, 16, 8, 30, 15, 250).unwrap();
        assert_eq!(
            dc.to_uno_date_time().unwrap(),
            UnoDateTime {
                nano_seconds: 250_000,
                seconds: 15,
                minutes: 30,
                hours: 8,
                day: 16,
                month: 10,
                year: 2013,
                is_utc: false,
            }
        );
    }

    #[test]
    fn test_from_uno_structs() {
        let from_date = DateConverter::from_uno_date(&UnoDate::new(16, 10, 2013)).unwrap();
        assert_eq!(from_date.as_naive(), naive(2013, 10, 16, 0, 0));

        let dt = UnoDateTime {
            nano_seconds: 0,
            seconds: 0,
            minutes: 1,
            hours: 1,
            day: 16,
            month: 10,
            year: 2013,
            is_utc: false,
        };
        let from_dt = DateConverter::try_from(dt).unwrap();
        assert_eq!(from_dt.as_naive(), naive(2013, 10, 16, 1, 1));
    }

    #[test]
    fn test_nanoseconds_truncate_to_microseconds() {
        let dt = UnoDateTime {
            nano_seconds: 1_999,
            day: 1,
            month: 1,
            year: 2000,
            ..Default::default()
        };
        let dc = DateConverter::from_uno_date_time(&dt).unwrap();
        assert_eq!(dc.microsecond(), 1);
        assert_eq!(dc.to_uno_date_time().unwrap().nano_seconds, 1_000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let dc = DateConverter::from_ymd(2013, 10, 16).unwrap();
        assert_eq!(
            dc.checked_add(Duration::days(1)).unwrap(),
            DateConverter::from_ymd(2013, 10, 17).unwrap()
        );
        assert_eq!(dc.checked_sub(Duration::days(1)).unwrap(), dc - Duration::days(1));

        let far = DateConverter::from_ymd(262_000, 12, 31).unwrap();
        assert!(matches!(
            far.checked_add(Duration::days(1_000_000)),
            Err(AdapterError::InvalidDate(_))
        ));
        assert!(matches!(
            far.checked_sub(Duration::days(-1_000_000)),
            Err(AdapterError::InvalidDate(_))
        ));
    }

    #[test]
    #[should_panic]
    fn test_add_operator_panics_out_of_range() {
        let far = DateConverter::from_ymd(262_000, 12, 31).unwrap();
        let _ = far + Duration::days(1_000_000);
    }

    #[test]
    fn test_invalid_components() {
        assert!(matches!(
            DateConverter::from_uno_date(&UnoDate::default()),
            Err(AdapterError::InvalidDate(_))
        ));
        let far = DateConverter::from_ymd(40_000, 1, 1).unwrap();
        assert!(matches!(far.to_uno_date(), Err(AdapterError::InvalidDate(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let dt = DateConverter::new(2013, 10, 16, 8, 30, 15, 250)
            .unwrap()
            .to_uno_date_time()
            .unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        assert!(json.contains("\"nano_seconds\":250000"));
        assert_eq!(serde_json::from_str::<UnoDateTime>(&json).unwrap(), dt);

        let date = UnoDate::new(16, 10, 2013);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#"{"day":16,"month":10,"year":2013}"#);
        assert_eq!(serde_json::from_str::<UnoDate>(&json).unwrap(), date);
    }
}
