use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Duration, Month};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;
}

impl WeekdayExt for time::Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// A calendar date with no time-of-day or offset, written as `YYYY-MM-DD`.
///
/// The string form is built from the date's own year, month and day fields,
/// so a `DateKey` never drifts across midnight the way an instant converted
/// through UTC can.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateKey(Date);

impl DateKey {
    pub fn new(date: Date) -> DateKey {
        DateKey(date)
    }

    /// Construct from a year, a 1-based month number, and a day of the month
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<DateKey, ParseDateError> {
        Month::try_from(month)
            .and_then(|m| Date::from_calendar_date(year, m, day))
            .map(DateKey)
            .map_err(|_| ParseDateError::new(ymd_string(year, month, day)))
    }

    pub fn date(self) -> Date {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> Month {
        self.0.month()
    }

    pub fn day(self) -> u8 {
        self.0.day()
    }

    /// Day of the week counting from Sunday = 0
    pub fn weekday_index0(self) -> u8 {
        self.0.weekday().index0()
    }

    /// Returns the date `n` days later (earlier for negative `n`), or `None`
    /// if that falls outside the supported calendar.
    pub fn add_days(self, n: i64) -> Option<DateKey> {
        self.0.checked_add(Duration::days(n)).map(DateKey)
    }

    /// The Sunday on or before this date
    pub fn week_start(self) -> Option<DateKey> {
        self.add_days(-i64::from(self.weekday_index0()))
    }

    /// The Saturday on or after this date
    pub fn week_end(self) -> Option<DateKey> {
        self.add_days(6 - i64::from(self.weekday_index0()))
    }

    /// Iterate over this date and every following day, stopping at the end of
    /// the supported calendar
    pub fn iter_from(self) -> impl Iterator<Item = DateKey> {
        successors(Some(self.0), |&d| d.next_day()).map(DateKey)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = (self.0.year(), u8::from(self.0.month()), self.0.day());
        write!(f, "{year:04}-{month:02}-{day:02}")
    }
}

impl FromStr for DateKey {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<DateKey, ParseDateError> {
        Date::parse(s.trim(), &YMD_FMT)
            .map(DateKey)
            .map_err(|_| ParseDateError::new(s))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<DateKey, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateKey>().map_err(de::Error::custom)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid calendar date {input:?}; expected YYYY-MM-DD")]
pub struct ParseDateError {
    input: String,
}

impl ParseDateError {
    fn new<S: Into<String>>(input: S) -> Self {
        ParseDateError {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

/// English three-letter month abbreviation
pub fn short_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn ymd_string(year: i32, month: u8, day: u8) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}
