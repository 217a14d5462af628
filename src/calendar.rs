//! Week strip and month grid generation.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::day_view::CalendarDay;
use crate::utils;

/// Rows x columns of a month grid
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// Column headers in display order
    pub fn day_labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Monday => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
            WeekStart::Sunday => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for the padding days borrowed from neighbouring months
    pub in_month: bool,
}

/// The first day of the week containing `date`, or `None` when it falls
/// before the earliest representable date
pub fn start_of_week(date: NaiveDate, start: WeekStart) -> Option<NaiveDate> {
    let offset = (7 + date.weekday().num_days_from_monday()
        - start.weekday().num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
}

/// The seven days of the week containing `date`. `None` when the week runs
/// past either end of the representable calendar.
pub fn week_days(date: NaiveDate, start: WeekStart) -> Option<[NaiveDate; 7]> {
    let first = start_of_week(date, start)?;
    // Checking the last day keeps the additions below in range
    first.checked_add_days(Days::new(6))?;
    Some(std::array::from_fn(|i| first + Days::new(i as u64)))
}

/// Move `direction` whole weeks (negative goes back). `None` when the result
/// is not a representable date.
pub fn shift_week(date: NaiveDate, direction: i64) -> Option<NaiveDate> {
    let days = Days::new(direction.unsigned_abs().checked_mul(7)?);
    if direction >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}

/// Whether two values fall on the same calendar day
pub fn is_same_day(a: &impl CalendarDay, b: &impl CalendarDay) -> bool {
    a.calendar_day() == b.calendar_day()
}

/// Whether `date` falls on today in the local timezone
pub fn is_today(date: &impl CalendarDay) -> bool {
    is_same_day(date, &utils::today())
}

/// A 6x7 grid for the month: leading days of the previous month, every day of
/// this month, then days of the next month until 42 cells. `None` when
/// `month` is not 1..=12 or the grid leaves the representable calendar.
pub fn month_grid(year: i32, month: u32, start: WeekStart) -> Option<Vec<CalendarCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let grid_start = start_of_week(first, start)?;

    let cells: Vec<CalendarCell> = grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| CalendarCell {
            date,
            in_month: date.year() == year && date.month() == month,
        })
        .collect();
    (cells.len() == GRID_CELLS).then_some(cells)
}

/// Number of days in the month, or `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(chrono::Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}
