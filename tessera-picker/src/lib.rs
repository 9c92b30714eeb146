//! Engine of the tessera date/time picker.
//!
//! This crate holds everything a picker does that does not involve a host
//! element: the [`Instant`] value type, timezone and offset resolution,
//! calendar and time grid generation, field text formatting and parsing, and
//! the [`Selection`] state machine that turns gestures into transitions.
//!
//! Nothing here reads a clock or touches global state. "Now" and "today" are
//! always inputs, which keeps every operation deterministic under test.
//!
//! # Selecting a value
//!
//! ```
//! use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
//! use tessera_picker::{
//!     ClickTarget, Formatter, Granularity, LocalZone, Selection, SelectionConfig,
//! };
//!
//! let zone = LocalZone::Fixed(FixedOffset::east_opt(3600).unwrap());
//! let now = Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap();
//! let config = SelectionConfig {
//!     granularity: Granularity::Day,
//!     ..SelectionConfig::default()
//! };
//! let mut selection = Selection::new(config, Formatter::default(), zone, false, now);
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let transition = selection.click(ClickTarget::Day(day), now);
//! assert!(transition.close);
//! assert_eq!(selection.field_text(), "2024-03-15T00:00:00+01:00");
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod error;
pub mod format;
pub mod granularity;
pub mod grid;
pub mod instant;
pub mod locale;
pub mod selection;
pub mod tables;
pub mod tz;

pub use crate::{
    error::{ConfigError, ParseError},
    format::{
        DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, DEFAULT_INTERVAL_SEPARATOR, Formatter, IntervalText,
    },
    granularity::Granularity,
    grid::{ClickTarget, DayCell, GRID_COLUMNS, GRID_ROWS, MonthGrid, NavCell, YearMonth, month_grid},
    instant::Instant,
    locale::{DEFAULT_LOCALE, Locale, parse_locale},
    selection::{GridLevel, Notice, Selection, SelectionConfig, Transition},
    tables::{MinuteStep, TimeCell, TimeTable, hour_table, minute_table},
    tz::{LocalZone, format_offset, offset_label},
};
