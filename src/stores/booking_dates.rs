use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::platform::Notifier;
use crate::utils::date::{add_days, format_day, parse_date, week_day_of, Clock};

/// Why a date selection was refused. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateSelectionError {
    #[error("不能选择过去的日期")]
    PastDate,

    #[error("离店日期必须晚于入住日期")]
    CheckOutNotAfterCheckIn,

    #[error("日期格式错误: {0}")]
    InvalidDate(String),
}

/// Check-in / check-out selection.
///
/// Invariant: check-out is strictly after check-in. Every mutation either
/// applies fully or leaves both dates untouched.
pub struct BookingDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for BookingDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingDates")
            .field("check_in", &self.check_in)
            .field("check_out", &self.check_out)
            .finish_non_exhaustive()
    }
}

impl BookingDates {
    /// Starts at today / tomorrow according to `clock`.
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        let (check_in, check_out) = default_range(clock.as_ref());
        Self {
            check_in,
            check_out,
            clock,
            notifier,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn check_in_date(&self) -> String {
        format_day(self.check_in)
    }

    pub fn check_out_date(&self) -> String {
        format_day(self.check_out)
    }

    pub fn check_in_week(&self) -> &'static str {
        week_day_of(self.check_in)
    }

    pub fn check_out_week(&self) -> &'static str {
        week_day_of(self.check_out)
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    fn reject(&self, error: DateSelectionError) -> Result<(), DateSelectionError> {
        self.notifier.notify(&error.to_string());
        Err(error)
    }

    /// Select a check-in date (`YYYY-MM-DD`).
    ///
    /// Dates before today are refused. When the current check-out would no
    /// longer be after the new check-in it moves to the following day.
    pub fn set_check_in_date(&mut self, date: &str) -> Result<(), DateSelectionError> {
        let date = match parse_date(date) {
            Ok(date) => date,
            Err(e) => return self.reject(DateSelectionError::InvalidDate(e.to_string())),
        };
        if date < self.clock.today() {
            return self.reject(DateSelectionError::PastDate);
        }

        let check_out = if date >= self.check_out {
            match add_days(date, 1) {
                Ok(next) => next,
                Err(e) => return self.reject(DateSelectionError::InvalidDate(e.to_string())),
            }
        } else {
            self.check_out
        };

        self.check_in = date;
        self.check_out = check_out;
        Ok(())
    }

    /// Select a check-out date; it must be strictly after check-in.
    pub fn set_check_out_date(&mut self, date: &str) -> Result<(), DateSelectionError> {
        let date = match parse_date(date) {
            Ok(date) => date,
            Err(e) => return self.reject(DateSelectionError::InvalidDate(e.to_string())),
        };
        if date <= self.check_in {
            return self.reject(DateSelectionError::CheckOutNotAfterCheckIn);
        }
        self.check_out = date;
        Ok(())
    }

    /// Back to today / tomorrow.
    pub fn reset_dates(&mut self) {
        let (check_in, check_out) = default_range(self.clock.as_ref());
        self.check_in = check_in;
        self.check_out = check_out;
    }
}

fn default_range(clock: &dyn Clock) -> (NaiveDate, NaiveDate) {
    let today = clock.today();
    let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);
    (today, tomorrow)
}
