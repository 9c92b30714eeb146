//! Timezone and UTC offset resolution.
//!
//! A picker value is always an absolute point in time. What changes between
//! the floating local representation and the fixed UTC one is only which
//! offset its wall-clock fields are read with. Offsets are resolved from the
//! instant itself every time, so a value that crosses a daylight-saving
//! transition picks up the offset in force on its own side of it.

use std::fmt;

use chrono::{
    DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::warn;

use crate::{error::ConfigError, instant::Instant};

/// The zone used for the floating local representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    /// Whatever the operating system reports, resolved through `chrono::Local`.
    System,
    /// A named IANA zone.
    Named(Tz),
    /// A zone with a constant offset and no daylight-saving rules.
    Fixed(FixedOffset),
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::detect()
    }
}

impl LocalZone {
    /// Detects the system zone by name, falling back to [`LocalZone::System`]
    /// when the name cannot be read or is not a known IANA zone.
    pub fn detect() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => match name.parse::<Tz>() {
                Ok(tz) => Self::Named(tz),
                Err(_) => {
                    warn!(zone = %name, "system time zone is not a known IANA zone");
                    Self::System
                }
            },
            Err(err) => {
                warn!(%err, "unable to read the system time zone");
                Self::System
            }
        }
    }

    /// Looks up an IANA zone by name.
    pub fn named(name: &str) -> Result<Self, ConfigError> {
        name.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| ConfigError::UnknownTimeZone(name.to_string()))
    }

    /// Returns the offset of this zone at the given instant.
    pub fn offset_at(&self, at: &DateTime<Utc>) -> FixedOffset {
        let utc = at.naive_utc();
        match self {
            Self::System => Local.offset_from_utc_datetime(&utc).fix(),
            Self::Named(tz) => tz.offset_from_utc_datetime(&utc).fix(),
            Self::Fixed(offset) => *offset,
        }
    }

    /// Maps a wall-clock time to an instant.
    ///
    /// Ambiguous times resolve to the earliest instant. Returns `None` when
    /// the time falls into a gap.
    pub fn resolve_strict(&self, wall: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::System => Local
                .from_local_datetime(&wall)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Named(tz) => tz
                .from_local_datetime(&wall)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Fixed(offset) => offset
                .from_local_datetime(&wall)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Maps a wall-clock time to an instant, pushing times inside a gap
    /// forward by the length of the gap.
    pub fn resolve(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        if let Some(at) = self.resolve_strict(wall) {
            return at;
        }
        // Read the gap time with the offset in force before the transition.
        let before = self.offset_at(&(wall.and_utc() - TimeDelta::hours(12)));
        wall.and_utc() - TimeDelta::seconds(i64::from(before.local_minus_utc()))
    }
}

impl fmt::Display for LocalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Returns the offset applied to wall-clock fields in the given mode.
pub fn active_offset(zone: &LocalZone, utc_mode: bool, at: &DateTime<Utc>) -> FixedOffset {
    if utc_mode {
        Utc.fix()
    } else {
        zone.offset_at(at)
    }
}

/// Resolves a wall-clock time in the given mode, see [`LocalZone::resolve`].
pub fn resolve_wall_clock(zone: &LocalZone, utc_mode: bool, wall: NaiveDateTime) -> DateTime<Utc> {
    if utc_mode {
        wall.and_utc()
    } else {
        zone.resolve(wall)
    }
}

/// Resolves a wall-clock time in the given mode, see
/// [`LocalZone::resolve_strict`].
pub fn resolve_wall_clock_strict(
    zone: &LocalZone,
    utc_mode: bool,
    wall: NaiveDateTime,
) -> Option<DateTime<Utc>> {
    if utc_mode {
        Some(wall.and_utc())
    } else {
        zone.resolve_strict(wall)
    }
}

/// Formats an offset as a sign followed by zero-padded `HH:MM`.
pub fn format_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Returns the local-zone UTC offset label of the instant, e.g. `+01:00`.
///
/// The offset is read at the instant itself, never cached.
pub fn offset_label(instant: &Instant) -> String {
    format_offset(instant.zone().offset_at(&instant.at()))
}

/// Switches the instant to the fixed UTC representation.
///
/// The absolute point in time is unchanged; only the wall-clock fields read
/// from it move.
pub fn to_fixed_utc(instant: Instant) -> Instant {
    instant.with_utc_mode(true)
}

/// Switches the instant to the floating local representation.
pub fn to_floating_local(instant: Instant) -> Instant {
    instant.with_utc_mode(false)
}
