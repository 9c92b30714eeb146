//! Calendar month grid generation.
//!
//! The grid always spans six Monday-first weeks so its height does not
//! change while navigating between months. Generation is pure: "today" is an
//! input, never read from a clock here.

use chrono::{Datelike, Days, Locale, NaiveDate, NaiveTime};

/// Number of day columns in a month grid.
pub const GRID_COLUMNS: usize = 7;
/// Number of week rows in a month grid.
pub const GRID_ROWS: usize = 6;

/// A year and month pair used as the display cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year/month pair if the month is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// Returns the month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the date for this month at the provided day.
    pub fn to_date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.to_date(1).unwrap_or_default()
    }

    /// Adds or subtracts months, adjusting the year as needed.
    pub fn add_months(&self, delta: i32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + delta;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u32;
        Self { year, month }
    }
}

/// Semantic tag attached to every clickable element of the dropdown.
///
/// Controllers dispatch on this tag instead of inspecting presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    /// A day cell of the month grid.
    Day(NaiveDate),
    /// An hour cell (0-23).
    Hour(u32),
    /// A minute cell (0-59).
    Minute(u32),
    /// The "previous month" control.
    PrevMonth,
    /// The "next month" control.
    NextMonth,
    /// The "now" button.
    Now,
}

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// Day-of-month number shown in the cell.
    pub text: String,
    /// The date the cell stands for.
    pub date: NaiveDate,
    /// Canonical `YYYY-MM-DD` key used for click lookup.
    pub key: String,
    /// The day belongs to the previous or next month.
    pub out_of_month: bool,
    /// The day is today. Never set in interval grids.
    pub is_today: bool,
    /// The day lies inside the interval being previewed.
    pub in_selected_interval: bool,
}

impl DayCell {
    /// Returns the click tag of this cell.
    pub fn target(&self) -> ClickTarget {
        ClickTarget::Day(self.date)
    }
}

/// A navigation control rendered next to the month title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavCell {
    /// Glyph shown on the control.
    pub text: &'static str,
    /// Click tag of the control.
    pub target: ClickTarget,
}

/// Six weeks of day cells for one displayed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// The displayed month.
    pub cursor: YearMonth,
    /// Localised month title, e.g. `2024-Mar`.
    pub title: String,
    /// Localised short weekday names, Monday first.
    pub weekdays: Vec<String>,
    /// Control moving the cursor one month back.
    pub prev: NavCell,
    /// Control moving the cursor one month forward.
    pub next: NavCell,
    /// [`GRID_ROWS`] rows of [`GRID_COLUMNS`] cells each.
    pub weeks: Vec<Vec<DayCell>>,
}

impl MonthGrid {
    /// Iterates all cells row by row.
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten()
    }

    /// Looks a cell up by its `YYYY-MM-DD` key.
    pub fn cell(&self, key: &str) -> Option<&DayCell> {
        self.cells().find(|cell| cell.key == key)
    }

    /// Returns the in-month cell showing the given day number.
    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.cells()
            .find(|cell| !cell.out_of_month && cell.date.day() == day)
    }

    /// Returns a copy with every day between `from` and `to` (inclusive, in
    /// either order) flagged as part of the selected interval.
    pub fn with_interval_preview(&self, from: NaiveDate, to: NaiveDate) -> MonthGrid {
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        let mut grid = self.clone();
        for cell in grid.weeks.iter_mut().flatten() {
            cell.in_selected_interval = (start..=end).contains(&cell.date);
        }
        grid
    }
}

/// Builds the month grid for the month containing `anchor`.
///
/// `interval_mode` suppresses the today highlight, which would clash with
/// interval highlighting.
pub fn month_grid(
    anchor: NaiveDate,
    today: NaiveDate,
    interval_mode: bool,
    locale: Locale,
) -> MonthGrid {
    let cursor = YearMonth::of(anchor);
    let first = cursor.first_day();
    let offset = u64::from(first.weekday().num_days_from_monday());
    let start = first.checked_sub_days(Days::new(offset)).unwrap_or(first);

    let mut days = start.iter_days();
    let weeks = (0..GRID_ROWS)
        .map(|_| {
            days.by_ref()
                .take(GRID_COLUMNS)
                .map(|date| {
                    let out_of_month = YearMonth::of(date) != cursor;
                    DayCell {
                        text: date.day().to_string(),
                        date,
                        key: date.format("%Y-%m-%d").to_string(),
                        out_of_month,
                        is_today: !interval_mode && !out_of_month && date == today,
                        in_selected_interval: false,
                    }
                })
                .collect()
        })
        .collect();

    MonthGrid {
        cursor,
        title: localized(first, "%Y-%b", locale),
        weekdays: start
            .iter_days()
            .take(GRID_COLUMNS)
            .map(|date| localized(date, "%a", locale))
            .collect(),
        prev: NavCell {
            text: "<",
            target: ClickTarget::PrevMonth,
        },
        next: NavCell {
            text: ">",
            target: ClickTarget::NextMonth,
        },
        weeks,
    }
}

pub(crate) fn localized(date: NaiveDate, format: &str, locale: Locale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(format, locale)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_has_fixed_shape_and_starts_on_monday() {
        // February 2021 starts on a Monday and fits in four weeks.
        let grid = month_grid(date(2021, 2, 14), date(2021, 2, 10), false, Locale::en_US);
        assert_eq!(grid.weeks.len(), GRID_ROWS);
        assert!(grid.weeks.iter().all(|week| week.len() == GRID_COLUMNS));
        assert_eq!(grid.weeks[0][0].date, date(2021, 2, 1));
        assert_eq!(grid.weeks[5][6].date, date(2021, 3, 14));
        assert_eq!(grid.title, "2021-Feb");
        assert_eq!(grid.weekdays[0], "Mon");
        assert_eq!(grid.weekdays[6], "Sun");
    }

    #[test]
    fn leading_and_trailing_days_are_out_of_month() {
        // March 2024 starts on a Friday.
        let grid = month_grid(date(2024, 3, 1), date(2024, 3, 15), false, Locale::en_US);
        let first = &grid.weeks[0][0];
        assert_eq!(first.date, date(2024, 2, 26));
        assert!(first.out_of_month);
        assert_eq!(first.key, "2024-02-26");
        let fifteenth = grid.day(15).unwrap();
        assert!(!fifteenth.out_of_month);
        assert!(fifteenth.is_today);
        assert_eq!(grid.cells().filter(|c| c.is_today).count(), 1);
        assert_eq!(grid.cell("2024-03-31").map(|c| c.text.as_str()), Some("31"));
        assert!(grid.weeks[5][6].out_of_month);
    }

    #[test]
    fn interval_grids_do_not_highlight_today() {
        let grid = month_grid(date(2024, 3, 1), date(2024, 3, 15), true, Locale::en_US);
        assert!(grid.cells().all(|c| !c.is_today));
    }

    #[test]
    fn interval_preview_is_order_independent() {
        let grid = month_grid(date(2024, 3, 1), date(2024, 3, 15), true, Locale::en_US);
        let forward = grid.with_interval_preview(date(2024, 3, 4), date(2024, 3, 6));
        let backward = grid.with_interval_preview(date(2024, 3, 6), date(2024, 3, 4));
        assert_eq!(forward, backward);
        let marked: Vec<_> = forward
            .cells()
            .filter(|c| c.in_selected_interval)
            .map(|c| c.text.clone())
            .collect();
        assert_eq!(marked, ["4", "5", "6"]);
        assert!(grid.cells().all(|c| !c.in_selected_interval));
    }

    #[test]
    fn month_arithmetic_wraps_years() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.add_months(-1), YearMonth::new(2023, 12).unwrap());
        assert_eq!(jan.add_months(13), YearMonth::new(2025, 2).unwrap());
        assert!(YearMonth::new(2024, 13).is_none());
    }

    #[test]
    fn titles_follow_the_locale() {
        let grid = month_grid(date(2024, 3, 1), date(2024, 3, 15), false, Locale::fr_FR);
        assert_ne!(grid.weekdays[0], "Mon");
        assert!(grid.title.starts_with("2024-"));
    }
}
