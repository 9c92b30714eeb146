//! Hour and minute grids.

use chrono::{Locale, NaiveDateTime, Timelike};

use crate::{error::ConfigError, grid::ClickTarget, grid::localized};

/// Number of rows in the hour grid.
pub const HOUR_ROWS: usize = 6;
/// Number of columns in the hour grid.
pub const HOUR_COLUMNS: usize = 4;

/// Spacing between two minute cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum MinuteStep {
    /// Twelve cells per hour, four per row.
    Five,
    /// Six cells per hour, three per row.
    #[default]
    Ten,
}

impl MinuteStep {
    /// Returns the step in minutes.
    pub fn minutes(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
        }
    }

    /// Returns how many cells a row of the minute grid holds.
    pub fn columns(self) -> usize {
        match self {
            Self::Five => 4,
            Self::Ten => 3,
        }
    }

    /// Rounds `minute` down to the closest cell.
    pub fn floor(self, minute: u32) -> u32 {
        minute - minute % self.minutes()
    }
}

impl TryFrom<u32> for MinuteStep {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            other => Err(ConfigError::UnsupportedMinuteStep(other)),
        }
    }
}

impl From<MinuteStep> for u32 {
    fn from(step: MinuteStep) -> Self {
        step.minutes()
    }
}

/// One cell of the hour or minute grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCell {
    /// Zero-padded `HH:MM` label.
    pub text: String,
    /// Hour the cell stands for.
    pub hour: u32,
    /// Minute the cell stands for.
    pub minute: u32,
    /// The cell contains the current time.
    pub is_now: bool,
    /// Click tag of the cell.
    pub target: ClickTarget,
}

/// A titled grid of time cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTable {
    /// Localised header naming the selected day (and hour).
    pub title: String,
    /// Rows of cells, top to bottom.
    pub rows: Vec<Vec<TimeCell>>,
}

impl TimeTable {
    /// Iterates all cells row by row.
    pub fn cells(&self) -> impl Iterator<Item = &TimeCell> {
        self.rows.iter().flatten()
    }

    /// Returns the labels of all cells in order.
    pub fn labels(&self) -> Vec<&str> {
        self.cells().map(|cell| cell.text.as_str()).collect()
    }
}

/// Builds the 24-cell hour grid for the day of `selected`.
///
/// Labels read `HH:00`, or `HH:MM` with the selected minute when
/// `show_minutes` is set. `now` is the live wall clock at render time.
pub fn hour_table(
    selected: NaiveDateTime,
    show_minutes: bool,
    now: NaiveDateTime,
    locale: Locale,
) -> TimeTable {
    let minute = if show_minutes { selected.minute() } else { 0 };
    let same_day = selected.date() == now.date();
    let rows = (0..HOUR_ROWS)
        .map(|row| {
            (0..HOUR_COLUMNS)
                .map(|column| {
                    let hour = (row * HOUR_COLUMNS + column) as u32;
                    TimeCell {
                        text: format!("{hour:02}:{minute:02}"),
                        hour,
                        minute,
                        is_now: same_day && now.hour() == hour,
                        target: ClickTarget::Hour(hour),
                    }
                })
                .collect()
        })
        .collect();
    TimeTable {
        title: localized(selected.date(), "%x", locale),
        rows,
    }
}

/// Builds the minute grid for the hour of `selected`.
pub fn minute_table(
    selected: NaiveDateTime,
    step: MinuteStep,
    now: NaiveDateTime,
    locale: Locale,
) -> TimeTable {
    let hour = selected.hour();
    let current = (selected.date() == now.date() && now.hour() == hour)
        .then(|| step.floor(now.minute()));
    let minutes: Vec<u32> = (0..60).step_by(step.minutes() as usize).collect();
    let rows = minutes
        .chunks(step.columns())
        .map(|chunk| {
            chunk
                .iter()
                .map(|&minute| TimeCell {
                    text: format!("{hour:02}:{minute:02}"),
                    hour,
                    minute,
                    is_now: current == Some(minute),
                    target: ClickTarget::Minute(minute),
                })
                .collect()
        })
        .collect();
    TimeTable {
        title: format!("{} {hour:02}:00", localized(selected.date(), "%x", locale)),
        rows,
    }
}
