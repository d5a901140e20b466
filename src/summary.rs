//! Year summary numbers and their display strings.

use crate::calendar::CalendarInfo;

/// Caption under the remaining-days number.
pub const REMAINING_LABEL: &str = "Days remaining";

/// Progress through the year as shown beside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearSummary {
    pub total_days: u32,
    /// Days after today.
    pub days_remaining: u32,
    /// Days before today.
    pub days_lived: u32,
}

impl YearSummary {
    pub fn from_calendar(info: &CalendarInfo) -> Self {
        Self {
            total_days: info.total_days(),
            days_remaining: info.total_days() - info.current_day(),
            days_lived: info.current_day() - 1,
        }
    }

    /// `days_lived / total_days * 100`.
    pub fn percent(&self) -> f64 {
        self.days_lived as f64 / self.total_days as f64 * 100.0
    }

    /// Percent complete in tenths, rounded half up.
    pub fn percent_tenths(&self) -> u64 {
        let lived = self.days_lived as u64;
        let total = self.total_days as u64;
        (lived * 2000 + total) / (2 * total)
    }

    /// `"27.1%"`.
    pub fn percent_text(&self) -> String {
        let t = self.percent_tenths();
        format!("{}.{}%", t / 10, t % 10)
    }

    /// The large number, e.g. `"265"`.
    pub fn remaining_text(&self) -> String {
        self.days_remaining.to_string()
    }

    /// `"99 days lived"`.
    pub fn lived_text(&self) -> String {
        format!("{} days lived", self.days_lived)
    }
}

impl From<&CalendarInfo> for YearSummary {
    fn from(info: &CalendarInfo) -> Self {
        Self::from_calendar(info)
    }
}

// ============================================================================
// Tests
// ============================================================================
