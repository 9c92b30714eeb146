//! The selection state machine.
//!
//! [`Selection`] owns the value a picker is editing and interprets gestures
//! into transitions. It never touches a host element: every gesture returns a
//! [`Transition`] describing what the caller has to do next (write the field,
//! notify subscribers, close the dropdown, redraw the grid).
//!
//! Three values are kept apart:
//! - the *committed* value, which is what the field shows and what
//!   subscribers receive;
//! - the *working* instant, which grid navigation edits before a leaf cell
//!   commits it;
//! - the display *cursor*, the month shown by the day grid, which month
//!   navigation moves without touching either of the above.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, warn};

use crate::{
    error::ParseError,
    format::{self, Formatter, IntervalText},
    granularity::Granularity,
    grid::{ClickTarget, YearMonth},
    instant::Instant,
    tz::{self, LocalZone},
};

/// The grid level the dropdown shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridLevel {
    /// The month grid.
    #[default]
    Days,
    /// The 24-hour grid of the working day.
    Hours,
    /// The minute grid of the working hour.
    Minutes,
}

/// Details of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    /// False while an interval only has its first end.
    pub clean: bool,
}

/// Effects a gesture asks the caller to carry out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// Overwrite the field with [`Selection::field_text`].
    pub render_field: bool,
    /// Notify subscribers.
    pub notice: Option<Notice>,
    /// Hide the dropdown.
    pub close: bool,
    /// Regenerate the displayed grid.
    pub redraw: bool,
    /// Typed text that was refused. The selection did not change and no
    /// subscriber is notified.
    pub rejected: Option<ParseError>,
}

impl Transition {
    /// A gesture that changed nothing.
    pub fn none() -> Self {
        Self::default()
    }

    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn commit() -> Self {
        Self {
            render_field: true,
            notice: Some(Notice { clean: true }),
            close: true,
            redraw: true,
            rejected: None,
        }
    }

    fn anchor_pending() -> Self {
        Self {
            render_field: true,
            notice: Some(Notice { clean: false }),
            redraw: true,
            ..Self::default()
        }
    }

    fn closed() -> Self {
        Self {
            close: true,
            redraw: true,
            ..Self::default()
        }
    }

    fn rejected(error: ParseError) -> Self {
        Self {
            close: true,
            redraw: true,
            rejected: Some(error),
            ..Self::default()
        }
    }

    /// Returns true when the caller has nothing to do.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Behavioural settings of a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Finest unit the user picks.
    pub granularity: Granularity,
    /// Zero fields finer than the granularity when a grid cell commits.
    pub pad_to_boundary: bool,
    /// Commit unfinished or unconfirmed edits when the dropdown closes.
    pub update_on_close: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            pad_to_boundary: true,
            update_on_close: true,
        }
    }
}

/// The value a picker edits, and the rules for changing it.
#[derive(Debug, Clone)]
pub struct Selection {
    config: SelectionConfig,
    formatter: Formatter,
    zone: LocalZone,
    utc_mode: bool,
    default_anchor: Instant,
    committed: Instant,
    working: Instant,
    anchor: Option<Instant>,
    interval: Option<(Instant, Instant)>,
    cursor: YearMonth,
    level: GridLevel,
    pending: bool,
}

impl Selection {
    /// Creates an unset selection whose default anchor is the start of the
    /// month containing `now`.
    pub fn new(
        config: SelectionConfig,
        formatter: Formatter,
        zone: LocalZone,
        utc_mode: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let default_anchor = Instant::default_anchor(now, zone, utc_mode);
        Self {
            config,
            formatter,
            zone,
            utc_mode,
            default_anchor,
            committed: default_anchor,
            working: default_anchor,
            anchor: None,
            interval: None,
            cursor: YearMonth::of(default_anchor.date()),
            level: GridLevel::Days,
            pending: false,
        }
    }

    /// Returns the behavioural settings.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Returns the configured granularity.
    pub fn granularity(&self) -> Granularity {
        self.config.granularity
    }

    /// Returns the formatter used for field text.
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Returns the floating local zone.
    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    /// Returns true in fixed UTC mode.
    pub fn is_utc(&self) -> bool {
        self.utc_mode
    }

    /// Returns the committed value, or `None` while nothing was chosen.
    pub fn value(&self) -> Option<Instant> {
        self.committed
            .is_set_by_user()
            .then_some(self.committed)
    }

    /// Returns the instant grid navigation is editing.
    pub fn working(&self) -> Instant {
        self.working
    }

    /// Returns the pending first end of an interval.
    pub fn anchor(&self) -> Option<Instant> {
        self.anchor
    }

    /// Returns the completed interval, ordered.
    pub fn interval(&self) -> Option<(Instant, Instant)> {
        self.interval
    }

    /// Returns the month displayed by the day grid.
    pub fn cursor(&self) -> YearMonth {
        self.cursor
    }

    /// Returns the displayed grid level.
    pub fn level(&self) -> GridLevel {
        self.level
    }

    /// Returns true while grid navigation holds an uncommitted edit.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the text the field shows for the committed state.
    pub fn field_text(&self) -> String {
        if let Some((start, end)) = &self.interval {
            return self.formatter.render_interval(start, end);
        }
        if let Some(anchor) = &self.anchor {
            return self.formatter.render_date(anchor);
        }
        match self.value() {
            Some(value) if self.config.granularity.is_interval() => {
                self.formatter.render_date(&value)
            }
            value => self.formatter.render(value.as_ref()),
        }
    }

    /// Returns the local-zone offset label of the working instant.
    pub fn offset_label(&self) -> String {
        tz::offset_label(&self.working)
    }

    /// Returns the interval a pointer over `date` would select, while an
    /// anchor is pending.
    pub fn hover_interval(&self, date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        self.anchor.map(|anchor| (anchor.date(), date))
    }

    /// Interprets a click on a tagged dropdown element.
    ///
    /// Targets that cannot have been rendered at the current grid level are
    /// logged and ignored.
    #[tracing::instrument(level = "debug", skip(self, now))]
    pub fn click(&mut self, target: ClickTarget, now: DateTime<Utc>) -> Transition {
        match (target, self.level) {
            (ClickTarget::Day(date), GridLevel::Days) => self.click_day(date),
            (ClickTarget::Hour(hour), GridLevel::Hours) => self.click_hour(hour),
            (ClickTarget::Minute(minute), GridLevel::Minutes) => self.click_minute(minute),
            (ClickTarget::PrevMonth, GridLevel::Days) => self.shift_month(-1),
            (ClickTarget::NextMonth, GridLevel::Days) => self.shift_month(1),
            (ClickTarget::Now, _) => self.click_now(now),
            (target, level) => {
                warn!(?target, ?level, "click target is not reachable from the displayed grid");
                Transition::none()
            }
        }
    }

    fn click_day(&mut self, date: NaiveDate) -> Transition {
        let granularity = self.config.granularity;
        if granularity.is_interval() {
            return match self.anchor {
                None => self.start_interval(date),
                Some(anchor) => self.complete_interval(anchor, date),
            };
        }
        let working = self.working.with_date(date);
        if granularity.has_hours() {
            self.working = working;
            self.pending = true;
            self.level = GridLevel::Hours;
            return Transition::redraw();
        }
        self.commit(working, true)
    }

    fn click_hour(&mut self, hour: u32) -> Transition {
        let Some(working) = self.working.with_hour(hour) else {
            warn!(hour, "hour cell out of range");
            return Transition::none();
        };
        if self.config.granularity.has_minutes() {
            self.working = working;
            self.pending = true;
            self.level = GridLevel::Minutes;
            return Transition::redraw();
        }
        self.commit(working, true)
    }

    fn click_minute(&mut self, minute: u32) -> Transition {
        let Some(working) = self.working.with_minute(minute) else {
            warn!(minute, "minute cell out of range");
            return Transition::none();
        };
        self.commit(working.truncated_to_minute(), true)
    }

    /// "Now" copies the current wall clock down to the second and is never
    /// padded.
    fn click_now(&mut self, now: DateTime<Utc>) -> Transition {
        let current = Instant::from_utc(now, self.zone, self.utc_mode).truncated_to_second();
        if self.config.granularity.is_interval() {
            return match self.anchor {
                None => self.start_interval(current.date()),
                Some(anchor) => self.complete_interval(anchor, current.date()),
            };
        }
        self.commit(current, false)
    }

    fn shift_month(&mut self, delta: i32) -> Transition {
        self.cursor = self.cursor.add_months(delta);
        Transition::redraw()
    }

    fn day_start(&self, date: NaiveDate) -> Instant {
        self.working
            .with_wall_clock(date.and_time(NaiveTime::MIN))
            .committed()
    }

    fn start_interval(&mut self, date: NaiveDate) -> Transition {
        let anchor = self.day_start(date);
        self.anchor = Some(anchor);
        self.interval = None;
        self.committed = anchor;
        self.working = anchor;
        self.pending = false;
        debug!(%date, "interval anchor recorded");
        Transition::anchor_pending()
    }

    fn complete_interval(&mut self, anchor: Instant, date: NaiveDate) -> Transition {
        let end = self.day_start(date);
        let (start, stop) = format::ordered(anchor, end);
        self.interval = Some((start, stop));
        self.anchor = None;
        self.settle(end);
        debug!(start = %start.date(), end = %stop.date(), "interval committed");
        Transition::commit()
    }

    fn commit(&mut self, value: Instant, pad: bool) -> Transition {
        let value = if pad && self.config.pad_to_boundary {
            value.padded(self.config.granularity)
        } else {
            value.truncated_to_second()
        };
        self.anchor = None;
        self.interval = None;
        self.settle(value.committed());
        debug!(value = %self.committed.to_fixed(), "value committed");
        Transition::commit()
    }

    /// Makes `value` both committed and working, and returns the display to
    /// the month grid of that value.
    fn settle(&mut self, value: Instant) {
        self.committed = value;
        self.working = value;
        self.pending = false;
        self.cursor = YearMonth::of(value.date());
        self.level = GridLevel::Days;
    }

    fn reset(&mut self) -> Transition {
        self.anchor = None;
        self.interval = None;
        self.settle(self.default_anchor.with_utc_mode(self.utc_mode));
        debug!("value cleared");
        Transition::commit()
    }

    /// Applies text typed into the field.
    ///
    /// Valid text replaces the value without padding. Empty text clears the
    /// value and notifies with no value. Anything else is rejected and
    /// changes nothing but the dropdown, which closes either way.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn edit_field(&mut self, text: &str) -> Transition {
        if self.config.granularity.is_interval() {
            return match self.formatter.parse_interval(text, self.zone, self.utc_mode) {
                Ok(IntervalText::Range(start, end)) => {
                    self.interval = Some((start, end));
                    self.anchor = None;
                    self.settle(end);
                    Transition::commit()
                }
                Ok(IntervalText::Single(anchor)) => {
                    self.interval = None;
                    self.anchor = Some(anchor);
                    self.settle(anchor);
                    Transition {
                        close: true,
                        ..Transition::anchor_pending()
                    }
                }
                Err(ParseError::Empty) => self.reset(),
                Err(error) => self.reject(error),
            };
        }
        match self.formatter.parse(text, self.zone, self.utc_mode) {
            Ok(value) => {
                self.anchor = None;
                self.interval = None;
                self.settle(value);
                Transition::commit()
            }
            Err(ParseError::Empty) => self.reset(),
            Err(error) => self.reject(error),
        }
    }

    fn reject(&self, error: ParseError) -> Transition {
        debug!(%error, "typed text rejected");
        Transition::rejected(error)
    }

    /// Handles an outside click or focus loss while the dropdown is open.
    ///
    /// `field_text` is what the field shows now, `focus_text` what it showed
    /// when the dropdown opened.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn dismiss(&mut self, field_text: &str, focus_text: &str) -> Transition {
        if !self.config.update_on_close {
            self.reset_view();
            return Transition::closed();
        }
        if self.pending {
            // Navigation stopped above the leaf grid: keep every field it
            // reached and drop only what no grid can set.
            let reached = self.working.committed().truncated_to_minute();
            if field_text != self.formatter.render(Some(&reached)) {
                return self.commit(reached, false);
            }
        } else if field_text != self.field_text() {
            // Text typed without a change event.
            let mut transition = self.edit_field(field_text);
            transition.close = true;
            transition.redraw = true;
            if transition.rejected.is_some() {
                self.reset_view();
            }
            return transition;
        }
        if field_text != focus_text && !self.config.granularity.is_interval() {
            if let Some(value) = self.value() {
                return self.commit(value, true);
            }
        }
        self.reset_view();
        Transition::closed()
    }

    /// Flips between fixed UTC and floating local representation.
    ///
    /// `silent` suppresses the notification.
    pub fn toggle_timezone(&mut self, silent: bool) -> Transition {
        self.set_utc_mode(!self.utc_mode, silent)
    }

    /// Switches the representation of every held instant.
    ///
    /// Chosen instants keep their absolute time. The default anchor, and
    /// anything derived from it before a value was chosen, keep their wall
    /// clock instead so they stay on local midnight of the month start.
    pub fn set_utc_mode(&mut self, utc_mode: bool, silent: bool) -> Transition {
        let switch = |instant: Instant| {
            if instant.is_set_by_user() || instant.is_utc() == utc_mode {
                instant.with_utc_mode(utc_mode)
            } else {
                let wall = instant.wall_clock();
                instant.with_utc_mode(utc_mode).with_wall_clock(wall)
            }
        };
        self.utc_mode = utc_mode;
        self.default_anchor = switch(self.default_anchor);
        self.committed = switch(self.committed);
        self.working = switch(self.working);
        self.anchor = self.anchor.map(|anchor| anchor.with_utc_mode(utc_mode));
        self.interval = self
            .interval
            .map(|(start, end)| (start.with_utc_mode(utc_mode), end.with_utc_mode(utc_mode)));
        debug!(utc_mode, silent, "representation switched");
        Transition {
            render_field: true,
            notice: (!silent).then_some(Notice {
                clean: self.anchor.is_none(),
            }),
            redraw: true,
            ..Transition::default()
        }
    }

    /// Replaces the value and representation directly, without notifying.
    pub fn update(&mut self, value: Option<DateTime<Utc>>, utc_mode: bool) -> Transition {
        self.set_utc_mode(utc_mode, true);
        self.anchor = None;
        self.interval = None;
        match value {
            Some(at) => self.settle(Instant::from_utc(at, self.zone, utc_mode).committed()),
            None => self.settle(self.default_anchor),
        }
        Transition {
            render_field: true,
            redraw: true,
            ..Transition::default()
        }
    }

    /// Drops uncommitted navigation and returns to the month grid, showing
    /// the month of the committed value if there is one.
    pub fn reset_view(&mut self) {
        self.working = self.committed;
        self.pending = false;
        if let Some(value) = self.value() {
            self.cursor = YearMonth::of(value.date());
        }
        self.level = GridLevel::Days;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use chrono_tz::Europe::Paris;

    use super::*;

    fn plus_one() -> LocalZone {
        LocalZone::Fixed(FixedOffset::east_opt(3600).unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 17, 42).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn selection(granularity: Granularity) -> Selection {
        selection_in(granularity, plus_one())
    }

    fn selection_in(granularity: Granularity, zone: LocalZone) -> Selection {
        let config = SelectionConfig {
            granularity,
            ..SelectionConfig::default()
        };
        Selection::new(config, Formatter::default(), zone, false, now())
    }

    #[test]
    fn starts_unset_on_the_current_month() {
        let s = selection(Granularity::Minute);
        assert!(s.value().is_none());
        assert_eq!(s.field_text(), "");
        assert_eq!(s.cursor(), YearMonth::new(2024, 3).unwrap());
        assert_eq!(s.level(), GridLevel::Days);
    }

    #[test]
    fn day_click_commits_midnight_in_day_mode() {
        let mut s = selection(Granularity::Day);
        let t = s.click(ClickTarget::Day(date(2024, 3, 15)), now());
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2024-03-15T00:00:00+01:00");
    }

    #[test]
    fn hour_mode_walks_day_then_hour() {
        let mut s = selection(Granularity::Hour);
        let t = s.click(ClickTarget::Day(date(2024, 3, 15)), now());
        assert_eq!(t, Transition::redraw());
        assert_eq!(s.level(), GridLevel::Hours);
        assert!(s.value().is_none());
        let t = s.click(ClickTarget::Hour(2), now());
        assert!(t.close && t.notice.is_some());
        assert_eq!(s.field_text(), "2024-03-15T02:00:00+01:00");
        assert_eq!(s.level(), GridLevel::Days);
    }

    #[test]
    fn minute_mode_commits_on_minute_click() {
        let mut s = selection(Granularity::Minute);
        s.click(ClickTarget::Day(date(2024, 3, 15)), now());
        s.click(ClickTarget::Hour(23), now());
        assert_eq!(s.level(), GridLevel::Minutes);
        let t = s.click(ClickTarget::Minute(0), now());
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2024-03-15T23:00:00+01:00");
    }

    #[test]
    fn unreachable_targets_change_nothing() {
        let mut s = selection(Granularity::Day);
        let before = s.clone();
        assert!(s.click(ClickTarget::Hour(3), now()).is_noop());
        assert!(s.click(ClickTarget::Minute(10), now()).is_noop());
        assert_eq!(s.value(), before.value());
        assert_eq!(s.level(), before.level());
    }

    #[test]
    fn month_navigation_only_moves_the_cursor() {
        let mut s = selection(Granularity::Day);
        s.click(ClickTarget::Day(date(2024, 3, 15)), now());
        let committed = s.value();
        assert_eq!(s.click(ClickTarget::NextMonth, now()), Transition::redraw());
        assert_eq!(s.click(ClickTarget::NextMonth, now()), Transition::redraw());
        assert_eq!(s.cursor(), YearMonth::new(2024, 5).unwrap());
        s.click(ClickTarget::PrevMonth, now());
        assert_eq!(s.cursor(), YearMonth::new(2024, 4).unwrap());
        assert_eq!(s.value(), committed);
    }

    #[test]
    fn now_is_never_padded() {
        let mut s = selection(Granularity::Day);
        let t = s.click(ClickTarget::Now, now());
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2024-03-20T10:17:42+01:00");
    }

    #[test]
    fn interval_order_does_not_matter() {
        let mut forward = selection(Granularity::DayInterval);
        let first = forward.click(ClickTarget::Day(date(2024, 3, 4)), now());
        assert_eq!(first.notice, Some(Notice { clean: false }));
        assert!(!first.close);
        assert_eq!(forward.field_text(), "2024-03-04");
        let second = forward.click(ClickTarget::Day(date(2024, 3, 18)), now());
        assert_eq!(second, Transition::commit());
        assert!(forward.anchor().is_none());

        let mut backward = selection(Granularity::DayInterval);
        backward.click(ClickTarget::Day(date(2024, 3, 18)), now());
        backward.click(ClickTarget::Day(date(2024, 3, 4)), now());

        assert_eq!(forward.field_text(), "2024-03-04 - 2024-03-18");
        assert_eq!(backward.field_text(), forward.field_text());
    }

    #[test]
    fn now_starts_an_interval_at_today() {
        let mut s = selection(Granularity::DayInterval);
        let t = s.click(ClickTarget::Now, now());
        assert_eq!(t.notice, Some(Notice { clean: false }));
        assert_eq!(s.anchor().map(|a| a.wall_clock().time()), Some(NaiveTime::MIN));
        assert_eq!(s.hover_interval(date(2024, 3, 22)), Some((date(2024, 3, 20), date(2024, 3, 22))));
    }

    #[test]
    fn typed_text_keeps_its_precision() {
        let mut s = selection(Granularity::Minute);
        let t = s.edit_field("2012-03-03T22:45:32+01:00");
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2012-03-03T22:45:32+01:00");
        assert_eq!(s.cursor(), YearMonth::new(2012, 3).unwrap());
    }

    #[test]
    fn invalid_text_is_rejected_without_changes() {
        let mut s = selection(Granularity::Minute);
        s.edit_field("2012-03-03T22:45:32+01:00");
        let t = s.edit_field("2012-02-31T10:00:00+01:00");
        assert!(matches!(t.rejected, Some(ParseError::Invalid { .. })));
        assert!(t.notice.is_none() && !t.render_field);
        assert!(t.close);
        assert_eq!(s.field_text(), "2012-03-03T22:45:32+01:00");
    }

    #[test]
    fn empty_text_resets_and_notifies() {
        let mut s = selection(Granularity::Minute);
        s.edit_field("2012-03-03T22:45:32+01:00");
        let t = s.edit_field("");
        assert_eq!(t, Transition::commit());
        assert!(s.value().is_none());
        assert_eq!(s.field_text(), "");
        assert_eq!(s.cursor(), YearMonth::new(2024, 3).unwrap());
    }

    #[test]
    fn closing_after_a_partial_walk_keeps_reached_fields() {
        let mut s = selection(Granularity::Minute);
        s.edit_field("2012-03-03T22:45:32+01:00");
        let focus = s.field_text();
        s.click(ClickTarget::Day(date(2012, 3, 15)), now());
        let t = s.dismiss(&focus, &focus);
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2012-03-15T22:45:00+01:00");
    }

    #[test]
    fn closing_untouched_is_silent() {
        let mut s = selection(Granularity::Minute);
        s.click(ClickTarget::PrevMonth, now());
        let t = s.dismiss("", "");
        assert_eq!(t, Transition::closed());
        assert!(s.value().is_none());
        assert_eq!(s.cursor(), YearMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn closing_without_update_discards_navigation() {
        let config = SelectionConfig {
            granularity: Granularity::Minute,
            update_on_close: false,
            ..SelectionConfig::default()
        };
        let mut s = Selection::new(config, Formatter::default(), plus_one(), false, now());
        s.edit_field("2012-03-03T22:45:32+01:00");
        s.click(ClickTarget::Day(date(2012, 3, 15)), now());
        assert_eq!(s.dismiss("2012-03-03T22:45:32+01:00", "2012-03-03T22:45:32+01:00"), Transition::closed());
        assert_eq!(s.working(), s.value().unwrap());
        assert_eq!(s.field_text(), "2012-03-03T22:45:32+01:00");
    }

    #[test]
    fn closing_after_a_mode_switch_commits_padded() {
        let mut s = selection(Granularity::Hour);
        s.edit_field("2012-03-03T22:45:32+01:00");
        let focus = s.field_text();
        s.toggle_timezone(false);
        let shown = s.field_text();
        assert_eq!(shown, "2012-03-03T21:45:32+00:00");
        let t = s.dismiss(&shown, &focus);
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2012-03-03T21:00:00+00:00");
    }

    #[test]
    fn unconfirmed_typing_is_applied_on_close() {
        let mut s = selection(Granularity::Minute);
        let t = s.dismiss("2012-03-03T22:45:32+01:00", "");
        assert!(t.close && t.notice.is_some());
        assert_eq!(s.field_text(), "2012-03-03T22:45:32+01:00");

        let t = s.dismiss("garbage", "2012-03-03T22:45:32+01:00");
        assert!(t.close && t.rejected.is_some() && t.notice.is_none());
        assert_eq!(s.field_text(), "2012-03-03T22:45:32+01:00");
    }

    #[test]
    fn dst_changes_the_rendered_offset() {
        let mut s = selection_in(Granularity::Day, LocalZone::Named(Paris));
        s.click(ClickTarget::Day(date(2021, 3, 27)), now());
        assert_eq!(s.field_text(), "2021-03-27T00:00:00+01:00");
        assert_eq!(s.offset_label(), "+01:00");
        s.click(ClickTarget::Day(date(2021, 3, 29)), now());
        assert_eq!(s.field_text(), "2021-03-29T00:00:00+02:00");
        assert_eq!(s.offset_label(), "+02:00");
        let selected = s.value().unwrap().at();
        s.toggle_timezone(false);
        assert_eq!(s.field_text(), "2021-03-28T22:00:00+00:00");
        assert_eq!(s.value().unwrap().at(), selected);
    }

    #[test]
    fn programmatic_update_is_silent() {
        let mut s = selection(Granularity::Minute);
        let at = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let t = s.update(Some(at), true);
        assert!(t.notice.is_none() && t.render_field);
        assert!(s.is_utc());
        assert_eq!(s.field_text(), "2020-01-02T03:04:05+00:00");
        s.update(None, false);
        assert!(s.value().is_none());
        assert!(!s.is_utc());
    }

    #[test]
    fn interval_text_entry() {
        let mut s = selection(Granularity::DayInterval);
        let t = s.edit_field("2024-03-18 - 2024-03-04");
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2024-03-04 - 2024-03-18");
        let t = s.edit_field("2024-03-09");
        assert_eq!(t.notice, Some(Notice { clean: false }));
        assert!(s.anchor().is_some());
        s.click(ClickTarget::Day(date(2024, 3, 1)), now());
        assert_eq!(s.field_text(), "2024-03-01 - 2024-03-09");
    }

    #[test]
    fn minute_click_drops_typed_seconds_without_padding() {
        let config = SelectionConfig {
            granularity: Granularity::Minute,
            pad_to_boundary: false,
            ..SelectionConfig::default()
        };
        let mut s = Selection::new(config, Formatter::default(), plus_one(), false, now());
        s.edit_field("2012-03-03T22:45:32+01:00");
        s.click(ClickTarget::Day(date(2012, 3, 15)), now());
        s.click(ClickTarget::Hour(10), now());
        let t = s.click(ClickTarget::Minute(10), now());
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2012-03-15T10:10:00+01:00");
    }

    #[test]
    fn utc_mode_keeps_the_default_anchor_at_local_midnight() {
        let mut s = selection_in(Granularity::Hour, LocalZone::Named(Paris));
        s.toggle_timezone(false);
        assert_eq!(s.working().wall_clock(), date(2024, 3, 1).and_time(NaiveTime::MIN));
        assert_eq!(s.cursor(), YearMonth::new(2024, 3).unwrap());

        s.edit_field("2012-03-03T22:45:32+01:00");
        s.edit_field("");
        assert!(s.value().is_none());
        assert_eq!(s.cursor(), YearMonth::new(2024, 3).unwrap());

        s.click(ClickTarget::Day(date(2024, 3, 15)), now());
        let t = s.dismiss("", "");
        assert_eq!(t, Transition::commit());
        assert_eq!(s.field_text(), "2024-03-15T00:00:00+00:00");

        s.toggle_timezone(false);
        assert_eq!(s.field_text(), "2024-03-15T01:00:00+01:00");
    }
}
