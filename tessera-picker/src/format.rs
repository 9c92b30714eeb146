//! Rendering picker values into field text and parsing typed text back.
//!
//! Format strings use `strftime` tokens as understood by `chrono`. An empty
//! format selects [`DEFAULT_FORMAT`], an ISO-8601 layout with seconds and an
//! explicit offset. Interval sides always render date-only: the configured
//! format with its time tokens removed, or [`DEFAULT_DATE_FORMAT`].

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc,
    format::{Fixed, Item, Numeric, Parsed, StrftimeItems},
};

use crate::{
    error::{ConfigError, ParseError},
    instant::Instant,
    tz::{self, LocalZone},
};

/// Layout used when no format is configured.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
/// Layout used for date-only rendering when the configured format has no
/// date tokens.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Separator placed between the two sides of an interval by default.
pub const DEFAULT_INTERVAL_SEPARATOR: &str = " - ";

/// Layouts tried after the configured one when parsing typed text.
const FALLBACK_FORMATS: &[&str] = &[
    DEFAULT_FORMAT,
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    DEFAULT_DATE_FORMAT,
];

/// A parsed interval entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalText {
    /// A single date: the first end of an interval.
    Single(Instant),
    /// Both ends, ordered chronologically.
    Range(Instant, Instant),
}

/// Renders and parses field text for one picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    format: String,
    separator: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            format: String::new(),
            separator: DEFAULT_INTERVAL_SEPARATOR.to_string(),
        }
    }
}

impl Formatter {
    /// Creates a formatter, rejecting format strings with unknown tokens.
    pub fn new(
        format: impl Into<String>,
        separator: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidFormat(format));
        }
        Ok(Self {
            format,
            separator: separator.into(),
        })
    }

    /// Returns the configured format, empty when the default is in use.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Returns the interval separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn effective_format(&self) -> &str {
        if self.format.is_empty() {
            DEFAULT_FORMAT
        } else {
            &self.format
        }
    }

    /// Renders a committed value, or the empty string when there is none.
    ///
    /// Values never chosen by the user render as empty too.
    pub fn render(&self, value: Option<&Instant>) -> String {
        match value {
            Some(instant) if instant.is_set_by_user() => instant
                .to_fixed()
                .format(self.effective_format())
                .to_string(),
            _ => String::new(),
        }
    }

    /// Renders the date part of a value.
    pub fn render_date(&self, value: &Instant) -> String {
        let items = date_items(self.effective_format());
        value.date().format_with_items(items.iter()).to_string()
    }

    /// Renders an interval as `min + separator + max`, whatever the order of
    /// the arguments.
    pub fn render_interval(&self, a: &Instant, b: &Instant) -> String {
        let (start, end) = ordered(*a, *b);
        format!(
            "{}{}{}",
            self.render_date(&start),
            self.separator,
            self.render_date(&end)
        )
    }

    /// Parses typed text in the given representation.
    ///
    /// Text carrying an explicit offset keeps its absolute instant; text
    /// without one is read as wall-clock time in UTC or in `zone`. The result
    /// is marked as chosen by the user.
    pub fn parse(&self, text: &str, zone: LocalZone, utc_mode: bool) -> Result<Instant, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        let layouts = std::iter::once(self.effective_format()).chain(FALLBACK_FORMATS.iter().copied());
        for layout in layouts {
            if let Ok(fixed) = DateTime::parse_from_str(trimmed, layout) {
                return Ok(Instant::from_utc(fixed.with_timezone(&Utc), zone, utc_mode).committed());
            }
            let wall = NaiveDateTime::parse_from_str(trimmed, layout).ok().or_else(|| {
                NaiveDate::parse_from_str(trimmed, layout)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            });
            if let Some(wall) = wall {
                return tz::resolve_wall_clock_strict(&zone, utc_mode, wall)
                    .map(|at| Instant::from_utc(at, zone, utc_mode).committed())
                    .ok_or_else(|| ParseError::NonexistentLocalTime {
                        text: trimmed.to_string(),
                    });
            }
        }
        if let Ok(fixed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Instant::from_utc(fixed.with_timezone(&Utc), zone, utc_mode).committed());
        }
        Err(ParseError::invalid(trimmed))
    }

    /// Parses a date in the date-only layout, at midnight.
    pub fn parse_date(&self, text: &str, zone: LocalZone, utc_mode: bool) -> Result<Instant, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        let items = date_items(self.effective_format());
        let date = parse_date_with(trimmed, &items)
            .or_else(|| NaiveDate::parse_from_str(trimmed, DEFAULT_DATE_FORMAT).ok())
            .ok_or_else(|| ParseError::invalid(trimmed))?;
        let at = tz::resolve_wall_clock(&zone, utc_mode, date.and_time(NaiveTime::MIN));
        Ok(Instant::from_utc(at, zone, utc_mode).committed())
    }

    /// Parses either `A<separator>B` or a single date.
    pub fn parse_interval(
        &self,
        text: &str,
        zone: LocalZone,
        utc_mode: bool,
    ) -> Result<IntervalText, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        let split = if self.separator.is_empty() {
            None
        } else {
            trimmed.split_once(self.separator.as_str())
        };
        match split {
            Some((left, right)) => {
                let invalid = |_: ParseError| ParseError::InvalidInterval {
                    text: trimmed.to_string(),
                };
                let a = self.parse_date(left, zone, utc_mode).map_err(invalid)?;
                let b = self.parse_date(right, zone, utc_mode).map_err(invalid)?;
                let (start, end) = ordered(a, b);
                Ok(IntervalText::Range(start, end))
            }
            None => self
                .parse_date(trimmed, zone, utc_mode)
                .map(IntervalText::Single),
        }
    }
}

/// Orders two instants chronologically.
pub fn ordered(a: Instant, b: Instant) -> (Instant, Instant) {
    if a.at() <= b.at() { (a, b) } else { (b, a) }
}

fn parse_date_with(text: &str, items: &[Item<'_>]) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, text, items.iter()).ok()?;
    parsed.to_naive_date().ok()
}

/// Keeps the date tokens of `format` and the literals between them.
fn date_items(format: &str) -> Vec<Item<'_>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    let first = items.iter().position(is_date_item);
    let last = items.iter().rposition(is_date_item);
    match (first, last) {
        (Some(first), Some(last)) => items[first..=last]
            .iter()
            .filter(|item| is_date_item(item) || matches!(item, Item::Literal(_) | Item::Space(_)))
            .cloned()
            .collect(),
        _ => StrftimeItems::new(DEFAULT_DATE_FORMAT).collect(),
    }
}

fn is_date_item(item: &Item<'_>) -> bool {
    match item {
        Item::Numeric(numeric, _) => matches!(
            numeric,
            Numeric::Year
                | Numeric::YearDiv100
                | Numeric::YearMod100
                | Numeric::IsoYear
                | Numeric::IsoYearDiv100
                | Numeric::IsoYearMod100
                | Numeric::Month
                | Numeric::Day
                | Numeric::WeekFromSun
                | Numeric::WeekFromMon
                | Numeric::IsoWeek
                | Numeric::NumDaysFromSun
                | Numeric::WeekdayFromMon
                | Numeric::Ordinal
        ),
        Item::Fixed(fixed) => matches!(
            fixed,
            Fixed::ShortMonthName
                | Fixed::LongMonthName
                | Fixed::ShortWeekdayName
                | Fixed::LongWeekdayName
        ),
        _ => false,
    }
}
