//! The picker's value type.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

use crate::{
    granularity::Granularity,
    tz::{self, LocalZone},
};

/// An absolute point in time together with the representation it is shown
/// in.
///
/// `Instant` is an immutable value: every setter returns a new instant, so a
/// display cursor and a committed selection can never alias each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instant {
    at: DateTime<Utc>,
    zone: LocalZone,
    utc_mode: bool,
    set_by_user: bool,
}

impl Instant {
    /// Creates an instant that has not been chosen by the user.
    pub fn from_utc(at: DateTime<Utc>, zone: LocalZone, utc_mode: bool) -> Self {
        Self {
            at,
            zone,
            utc_mode,
            set_by_user: false,
        }
    }

    /// The anchor used before anything is selected: midnight on the first
    /// day of the month containing `now`, read in the active representation.
    pub fn default_anchor(now: DateTime<Utc>, zone: LocalZone, utc_mode: bool) -> Self {
        let current = Self::from_utc(now, zone, utc_mode);
        let first = current.date().with_day(1).unwrap_or(current.date());
        current.with_wall_clock(first.and_time(NaiveTime::MIN))
    }

    /// Returns the absolute point in time.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns the zone used for the floating local representation.
    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    /// Returns true when the instant is shown in fixed UTC.
    pub fn is_utc(&self) -> bool {
        self.utc_mode
    }

    /// Returns true once the user (or the embedding application) explicitly
    /// chose this value.
    pub fn is_set_by_user(&self) -> bool {
        self.set_by_user
    }

    /// Returns the offset the wall-clock fields are read with.
    pub fn offset(&self) -> FixedOffset {
        tz::active_offset(&self.zone, self.utc_mode, &self.at)
    }

    /// Returns the instant in its active representation.
    pub fn to_fixed(&self) -> DateTime<FixedOffset> {
        self.at.with_timezone(&self.offset())
    }

    /// Returns the wall-clock fields in the active representation.
    pub fn wall_clock(&self) -> NaiveDateTime {
        self.to_fixed().naive_local()
    }

    /// Returns the calendar date in the active representation.
    pub fn date(&self) -> NaiveDate {
        self.wall_clock().date()
    }

    /// Replaces the wall-clock fields, keeping flags and zone.
    pub fn with_wall_clock(self, wall: NaiveDateTime) -> Self {
        Self {
            at: tz::resolve_wall_clock(&self.zone, self.utc_mode, wall),
            ..self
        }
    }

    /// Replaces year, month and day, keeping the time of day.
    pub fn with_date(self, date: NaiveDate) -> Self {
        self.with_wall_clock(date.and_time(self.wall_clock().time()))
    }

    /// Replaces the hour. Returns `None` for hours outside `0..24`.
    pub fn with_hour(self, hour: u32) -> Option<Self> {
        self.wall_clock()
            .with_hour(hour)
            .map(|wall| self.with_wall_clock(wall))
    }

    /// Replaces the minute. Returns `None` for minutes outside `0..60`.
    pub fn with_minute(self, minute: u32) -> Option<Self> {
        self.wall_clock()
            .with_minute(minute)
            .map(|wall| self.with_wall_clock(wall))
    }

    /// Switches between fixed UTC and floating local representation.
    pub fn with_utc_mode(self, utc_mode: bool) -> Self {
        Self { utc_mode, ..self }
    }

    /// Marks the instant as explicitly chosen.
    pub fn committed(self) -> Self {
        Self {
            set_by_user: true,
            ..self
        }
    }

    /// Zeroes every field finer than `granularity`, always including
    /// sub-second precision.
    pub fn padded(self, granularity: Granularity) -> Self {
        self.with_wall_clock(granularity.pad(self.wall_clock()))
    }

    /// Zeroes seconds and sub-second precision.
    pub fn truncated_to_minute(self) -> Self {
        self.padded(Granularity::Minute)
    }

    /// Zeroes sub-second precision only.
    pub fn truncated_to_second(self) -> Self {
        Self {
            at: self.at.with_nanosecond(0).unwrap_or(self.at),
            ..self
        }
    }
}
