//! Calendar math.
//!
//! Turns a timestamp into the year, its length and the 1-based ordinal of
//! "today". The ordinal is measured the way the wallpaper has always
//! measured it: elapsed wall-clock milliseconds since local midnight on
//! January 1st, divided by a fixed 24-hour day.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

use crate::error::{RenderError, Result};

/// Milliseconds in a fixed 24-hour day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 366 for leap years, 365 otherwise.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

// ============================================================================
// CalendarInfo
// ============================================================================

/// Year, its day count, and today's 1-based ordinal within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarInfo {
    year: i32,
    total_days: u32,
    current_day: u32,
}

impl CalendarInfo {
    /// Build from a year and a day-of-year, rejecting ordinals outside
    /// `1..=days_in_year(year)`.
    pub fn new(year: i32, current_day: u32) -> Result<Self> {
        let total_days = days_in_year(year);
        if current_day == 0 || current_day > total_days {
            return Err(RenderError::InvalidConfiguration(format!(
                "day {current_day} is outside 1..={total_days} for {year}"
            )));
        }
        Ok(Self {
            year,
            total_days,
            current_day,
        })
    }

    /// Calendar-exact info for a date, independent of clock arithmetic.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            total_days: days_in_year(date.year()),
            current_day: date.ordinal(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 365 or 366.
    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    /// Today's ordinal, in `1..=total_days`.
    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn is_leap(&self) -> bool {
        self.total_days == 366
    }
}

/// Calendar info for `now` in its own time zone.
///
/// The ordinal is `elapsed_ms / MILLIS_PER_DAY + 1` where `elapsed_ms` is
/// measured from local midnight of January 1st. Around daylight-saving
/// shifts this can disagree with the calendar ordinal; the result is
/// clamped into `1..=total_days` so exactly one day is always "today".
pub fn compute_calendar_info<Tz: TimeZone>(now: &DateTime<Tz>) -> CalendarInfo {
    let year = now.year();
    let total_days = days_in_year(year);

    let current_day = match start_of_year(&now.timezone(), year) {
        Some(start) => {
            let elapsed = now.timestamp_millis() - start.timestamp_millis();
            (elapsed / MILLIS_PER_DAY + 1).clamp(1, total_days as i64) as u32
        }
        // Local midnight does not exist on January 1st in this zone.
        None => now.ordinal(),
    };

    CalendarInfo {
        year,
        total_days,
        current_day,
    }
}

/// Calendar info for the current instant in the process-local time zone.
pub fn compute_calendar_info_local() -> CalendarInfo {
    compute_calendar_info(&Local::now())
}

fn start_of_year<Tz: TimeZone>(tz: &Tz, year: i32) -> Option<DateTime<Tz>> {
    tz.with_ymd_and_hms(year, 1, 1, 0, 0, 0).earliest()
}

// ============================================================================
// Tests
// ============================================================================
