//! Calendar helpers
//!
//! All functions are deterministic in their inputs. Only [`today`],
//! [`tomorrow`] and the `None` defaults read the system clock.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

/// Default template for calendar dates.
pub const DATE_TEMPLATE: &str = "YYYY-MM-DD";

const WEEK_DAYS: [&str; 7] = ["周日", "周一", "周二", "周三", "周四", "周五", "周六"];

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date: {0:?}")]
    Invalid(String),

    #[error("date out of range")]
    OutOfRange,
}

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Year, month (1-12) and day components of a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    pub fn to_date(self) -> Result<NaiveDate, DateError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            DateError::Invalid(format!("{}-{}-{}", self.year, self.month, self.day))
        })
    }
}

impl From<NaiveDate> for DateParts {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Parse a `YYYY-MM-DD` date. A trailing time component is ignored.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_time(value).map(|dt| dt.date())
}

/// Parse a date or date-time string. Date-only input means midnight.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, DateError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::default()));
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| DateError::Invalid(value.to_string()))
}

/// Render a date-time under a token template.
///
/// Recognized tokens: `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss`. Each token is
/// substituted once, at its first occurrence.
pub fn format_date(value: &NaiveDateTime, template: &str) -> String {
    template
        .replacen("YYYY", &value.year().to_string(), 1)
        .replacen("MM", &format!("{:02}", value.month()), 1)
        .replacen("DD", &format!("{:02}", value.day()), 1)
        .replacen("HH", &format!("{:02}", value.hour()), 1)
        .replacen("mm", &format!("{:02}", value.minute()), 1)
        .replacen("ss", &format!("{:02}", value.second()), 1)
}

/// `YYYY-MM-DD` rendering of a calendar date.
pub fn format_day(date: NaiveDate) -> String {
    format_date(&date.and_time(NaiveTime::default()), DATE_TEMPLATE)
}

pub fn format_date_parts(parts: DateParts) -> String {
    format!("{:04}-{:02}-{:02}", parts.year, parts.month, parts.day)
}

pub fn parse_date_string_components(value: &str) -> Result<DateParts, DateError> {
    parse_date(value).map(DateParts::from)
}

pub fn today() -> String {
    format_day(SystemClock.today())
}

pub fn tomorrow() -> String {
    // SystemClock dates are far from chrono's limits.
    format_day(add_days(SystemClock.today(), 1).unwrap_or_else(|_| SystemClock.today()))
}

/// Shift a date by a signed number of days.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, DateError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(DateError::OutOfRange)
}

/// `YYYY-MM-DD` of the day `days` after `base` (today when `None`).
pub fn date_after_days(days: i64, base: Option<NaiveDate>) -> Result<String, DateError> {
    let base = base.unwrap_or_else(|| SystemClock.today());
    add_days(base, days).map(format_day)
}

/// Number of days from `start` to `end`, rounded up.
///
/// Date-only inputs give the exact calendar-day difference; a partial day
/// between date-times counts as a full one. Negative when `end` is earlier.
pub fn days_between(start: &str, end: &str) -> Result<i64, DateError> {
    let start = parse_date_time(start)?;
    let end = parse_date_time(end)?;
    let millis = (end - start).num_milliseconds();
    Ok(-(-millis).div_euclid(MILLIS_PER_DAY))
}

/// Short weekday label (`周日`..`周六`).
pub fn week_day(value: &str) -> Result<&'static str, DateError> {
    parse_date(value).map(week_day_of)
}

pub fn week_day_of(date: NaiveDate) -> &'static str {
    WEEK_DAYS[date.weekday().num_days_from_sunday() as usize]
}

/// Days in `month` (1-12) of `year`; `0` for a month outside that range.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map_or(31, |next| (next - first).num_days() as u32)
}

/// `count` consecutive years starting at `start_year` (this year when `None`).
///
/// Stops early rather than overflow past `i32::MAX`.
pub fn generate_years(start_year: Option<i32>, count: usize) -> Vec<i32> {
    let first = start_year.unwrap_or_else(|| SystemClock.today().year());
    (0..count)
        .map_while(|offset| first.checked_add(i32::try_from(offset).ok()?))
        .collect()
}

pub fn generate_months() -> Vec<u32> {
    (1..=12).collect()
}

pub fn generate_days(year: i32, month: u32) -> Vec<u32> {
    (1..=days_in_month(year, month)).collect()
}
