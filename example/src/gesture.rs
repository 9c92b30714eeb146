use std::{fmt, str::FromStr};

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;

/// One step of a gesture script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Focus the field and show the dropdown.
    Open,
    /// Click outside every picker.
    Outside,
    /// Click a day cell, by full date or by day of the displayed month.
    Day(DayRef),
    /// Click an hour cell.
    Hour(u32),
    /// Click a minute cell.
    Minute(u32),
    /// Click the previous-month control.
    Prev,
    /// Click the next-month control.
    Next,
    /// Click the "now" button.
    Now,
    /// Move the pointer over a day cell.
    Hover(DayRef),
    /// Replace the field text without firing `change`.
    Type(String),
    /// Fire `change` on the field.
    Change,
    /// Click the timezone toggle.
    ToggleTz,
    /// Print the dropdown.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRef {
    Date(NaiveDate),
    OfDisplayedMonth(u32),
}

impl FromStr for DayRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(day) = s.parse::<u32>() {
            return Ok(Self::OfDisplayedMonth(day));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .with_context(|| format!("`{s}` is neither a day number nor a YYYY-MM-DD date"))
    }
}

impl FromStr for Gesture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let required = || arg.ok_or_else(|| anyhow!("`{name}` needs an argument, e.g. `{name}:…`"));
        let gesture = match name {
            "open" => Self::Open,
            "outside" | "close" => Self::Outside,
            "day" => Self::Day(required()?.parse()?),
            "hover" => Self::Hover(required()?.parse()?),
            "hour" => Self::Hour(required()?.parse().context("hour must be a number")?),
            "minute" => Self::Minute(required()?.parse().context("minute must be a number")?),
            "prev" => Self::Prev,
            "next" => Self::Next,
            "now" => Self::Now,
            "type" => Self::Type(arg.unwrap_or_default().to_string()),
            "change" => Self::Change,
            "toggle-tz" => Self::ToggleTz,
            "show" => Self::Show,
            other => bail!("unknown gesture `{other}`"),
        };
        Ok(gesture)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Outside => f.write_str("outside"),
            Self::Day(DayRef::Date(date)) => write!(f, "day:{date}"),
            Self::Day(DayRef::OfDisplayedMonth(day)) => write!(f, "day:{day}"),
            Self::Hover(DayRef::Date(date)) => write!(f, "hover:{date}"),
            Self::Hover(DayRef::OfDisplayedMonth(day)) => write!(f, "hover:{day}"),
            Self::Hour(hour) => write!(f, "hour:{hour}"),
            Self::Minute(minute) => write!(f, "minute:{minute}"),
            Self::Prev => f.write_str("prev"),
            Self::Next => f.write_str("next"),
            Self::Now => f.write_str("now"),
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Change => f.write_str("change"),
            Self::ToggleTz => f.write_str("toggle-tz"),
            Self::Show => f.write_str("show"),
        }
    }
}
