//! Recurrence matching: decides whether a financial event occurs on a given
//! calendar date.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Schedule type shared by transactions and paychecks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::OneTime => "one-time",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// Returns true when an event with the given schedule occurs on `target`.
///
/// Pure and total: dates outside the `[start, end]` window never match, and
/// every frequency reduces to plain calendar arithmetic. A monthly anchor past
/// the end of a short month lands on that month's last day instead; a yearly
/// Feb-29 anchor simply never matches outside leap years.
pub fn occurs_on(
    frequency: Frequency,
    start: NaiveDate,
    end: Option<NaiveDate>,
    target: NaiveDate,
) -> bool {
    if target < start {
        return false;
    }
    if let Some(end) = end {
        if target > end {
            return false;
        }
    }
    match frequency {
        Frequency::OneTime => target == start,
        Frequency::Daily => true,
        Frequency::Weekly => (target - start).num_days() % 7 == 0,
        Frequency::BiWeekly => (target - start).num_days() % 14 == 0,
        Frequency::Monthly => {
            if target.day() == start.day() {
                return true;
            }
            let last = days_in_month(target.year(), target.month());
            start.day() > last && target.day() == last
        }
        Frequency::Yearly => target.month() == start.month() && target.day() == start.day(),
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}

/// Advances by whole calendar months, clamping the day to the target month's
/// length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}
