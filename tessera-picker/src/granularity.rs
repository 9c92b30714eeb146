//! The finest unit a picker lets the user choose.

use std::{fmt, str::FromStr};

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::error::ConfigError;

/// Which grid levels a picker navigates and what padding to a boundary
/// means for it. Fixed for the lifetime of a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Granularity {
    /// A single calendar day.
    Day,
    /// A day and an hour.
    Hour,
    /// A day, an hour and a minute.
    #[default]
    Minute,
    /// A start and end day chosen with two clicks.
    DayInterval,
}

impl Granularity {
    /// Returns true for [`Granularity::DayInterval`].
    pub fn is_interval(self) -> bool {
        matches!(self, Self::DayInterval)
    }

    /// Returns true when a day click leads on to the hour grid.
    pub fn has_hours(self) -> bool {
        matches!(self, Self::Hour | Self::Minute)
    }

    /// Returns true when an hour click leads on to the minute grid.
    pub fn has_minutes(self) -> bool {
        matches!(self, Self::Minute)
    }

    /// Zeroes every wall-clock field finer than this granularity.
    ///
    /// Sub-second precision is always dropped.
    pub fn pad(self, wall: NaiveDateTime) -> NaiveDateTime {
        let time = wall.time();
        let padded = match self {
            Self::Day | Self::DayInterval => Some(NaiveTime::MIN),
            Self::Hour => NaiveTime::from_hms_opt(time.hour(), 0, 0),
            Self::Minute => NaiveTime::from_hms_opt(time.hour(), time.minute(), 0),
        };
        wall.date().and_time(padded.unwrap_or(time))
    }

    /// Returns the configuration name of this granularity.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::DayInterval => "day-interval",
        }
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Self::Day),
            "hour" | "hours" => Ok(Self::Hour),
            "minute" | "minutes" => Ok(Self::Minute),
            "day-interval" | "day_interval" => Ok(Self::DayInterval),
            _ => Err(ConfigError::UnknownGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn names_round_trip_and_accept_plural_aliases() {
        for granularity in [
            Granularity::Day,
            Granularity::Hour,
            Granularity::Minute,
            Granularity::DayInterval,
        ] {
            assert_eq!(granularity.as_str().parse::<Granularity>(), Ok(granularity));
        }
        assert_eq!("Hours".parse::<Granularity>(), Ok(Granularity::Hour));
        assert_eq!(
            "week".parse::<Granularity>(),
            Err(ConfigError::UnknownGranularity("week".into()))
        );
    }

    #[test]
    fn pad_drops_sub_second_precision_everywhere() {
        let wall = NaiveDate::from_ymd_opt(2020, 2, 29)
            .and_then(|d| d.and_hms_milli_opt(7, 8, 9, 999))
            .unwrap();
        assert_eq!(Granularity::Minute.pad(wall).to_string(), "2020-02-29 07:08:00");
        assert_eq!(Granularity::Hour.pad(wall).to_string(), "2020-02-29 07:00:00");
        assert_eq!(Granularity::Day.pad(wall).to_string(), "2020-02-29 00:00:00");
        assert_eq!(Granularity::DayInterval.pad(wall).to_string(), "2020-02-29 00:00:00");
    }
}
