//! The picker controller.
//!
//! ## Usage
//!
//! Attach a picker to a host element, forward the host's gestures to it and
//! read the field back.
//!
//! ```
//! use chrono::FixedOffset;
//! use tessera_picker::{ClickTarget, Granularity, LocalZone};
//! use tessera_picker_widget::{DateTimePicker, GridView, MemoryHost, PickerConfig};
//!
//! let host = MemoryHost::new();
//! let config = PickerConfig::default()
//!     .granularity(Granularity::Day)
//!     .zone(LocalZone::Fixed(FixedOffset::east_opt(3600).unwrap()));
//! let picker = DateTimePicker::init("start", host.clone(), config).unwrap();
//!
//! picker.open();
//! let GridView::Days(grid) = picker.view().grid else { unreachable!() };
//! picker.click(grid.day(15).unwrap().target());
//!
//! assert!(host.text().contains("-15T00:00:00+01:00"));
//! assert!(!picker.is_displayed());
//! ```

use std::{fmt, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use tessera_picker::{
    ClickTarget, ConfigError, GridLevel, Instant, Locale, MinuteStep, MonthGrid, ParseError,
    Selection, TimeTable, Transition, hour_table, minute_table, month_grid,
};
use tracing::{debug, trace, warn};

use crate::{
    config::PickerConfig,
    event::{ChangeCallback, ChangeEvent},
    host::HostElement,
    registry::{Document, DropdownHandle, WidgetId},
};

/// Label of the timezone toggle in fixed UTC mode.
pub const UTC_LABEL: &str = "UTC";

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The grid a dropdown currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    /// The month grid.
    Days(MonthGrid),
    /// The hour grid of the working day.
    Hours(TimeTable),
    /// The minute grid of the working hour.
    Minutes(TimeTable),
}

/// Everything a host needs to draw the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    /// The displayed grid.
    pub grid: GridView,
    /// Label of the "now" button, tagged [`ClickTarget::Now`].
    pub now_button_text: String,
}

struct PickerInner {
    selection: Selection,
    host: Box<dyn HostElement>,
    locale: Locale,
    minute_step: MinuteStep,
    now_button_text: String,
    displayed: bool,
    focus_text: String,
    hover: Option<NaiveDate>,
    last_error: Option<ParseError>,
}

impl PickerInner {
    fn timezone_label(&self) -> String {
        if self.selection.is_utc() {
            UTC_LABEL.to_string()
        } else {
            self.selection.offset_label()
        }
    }

    fn refresh_timezone_label(&mut self) {
        if self.host.has_timezone_toggle() {
            let label = self.timezone_label();
            self.host.set_timezone_label(&label);
        }
    }

    fn view(&self, now: DateTime<Utc>) -> PickerView {
        let today = Instant::from_utc(now, self.selection.zone(), self.selection.is_utc())
            .wall_clock();
        let working = self.selection.working().wall_clock();
        let granularity = self.selection.granularity();
        let grid = match self.selection.level() {
            GridLevel::Days => {
                let grid = month_grid(
                    self.selection.cursor().first_day(),
                    today.date(),
                    granularity.is_interval(),
                    self.locale,
                );
                let preview = self
                    .hover
                    .and_then(|date| self.selection.hover_interval(date))
                    .or_else(|| {
                        self.selection
                            .interval()
                            .map(|(start, end)| (start.date(), end.date()))
                    });
                GridView::Days(match preview {
                    Some((from, to)) => grid.with_interval_preview(from, to),
                    None => grid,
                })
            }
            GridLevel::Hours => GridView::Hours(hour_table(
                working,
                granularity.has_minutes(),
                today,
                self.locale,
            )),
            GridLevel::Minutes => GridView::Minutes(minute_table(
                working,
                self.minute_step,
                today,
                self.locale,
            )),
        };
        PickerView {
            grid,
            now_button_text: self.now_button_text.clone(),
        }
    }

    fn redraw(&mut self, now: DateTime<Utc>) {
        let view = self.view(now);
        self.host.render_dropdown(&view);
    }

    fn close(&mut self) {
        self.displayed = false;
        self.hover = None;
        self.selection.reset_view();
        self.host.set_dropdown_visible(false);
    }

    /// Carries out a transition and returns the event to hand to the
    /// subscriber once the lock is released.
    fn apply(
        &mut self,
        transition: Transition,
        now: DateTime<Utc>,
        element_id: &str,
    ) -> Option<ChangeEvent> {
        if transition.is_noop() {
            return None;
        }
        match transition.rejected {
            Some(error) => self.last_error = Some(error),
            None => self.last_error = None,
        }
        if transition.render_field {
            let text = self.selection.field_text();
            self.host.set_input_text(&text);
        }
        self.refresh_timezone_label();
        if transition.close {
            self.close();
        }
        if transition.redraw || transition.close {
            self.redraw(now);
        }
        let notice = transition.notice?;
        let event = ChangeEvent::new(
            element_id,
            self.selection.formatter().format(),
            self.selection.value(),
            self.selection.is_utc(),
            notice.clean,
            self.selection.interval(),
        );
        debug!(id = element_id, value = ?event.value, clean = event.clean, "change dispatched");
        self.host.dispatch_change(&event);
        Some(event)
    }
}

struct PickerShared {
    id: WidgetId,
    element_id: String,
    clock: Clock,
    callback: Option<ChangeCallback>,
    inner: Mutex<PickerInner>,
}

impl PickerShared {
    fn run<F>(&self, gesture: F)
    where
        F: FnOnce(&mut PickerInner, DateTime<Utc>) -> Transition,
    {
        let now = (self.clock)();
        let event = {
            let mut inner = self.inner.lock();
            let transition = gesture(&mut *inner, now);
            inner.apply(transition, now, &self.element_id)
        };
        if let (Some(event), Some(callback)) = (event, &self.callback) {
            callback.call(&event);
        }
    }
}

impl DropdownHandle for PickerShared {
    fn dismiss(&self) {
        self.run(|inner, _| {
            if !inner.displayed {
                return Transition::none();
            }
            let text = inner.host.input_text();
            let focus_text = std::mem::take(&mut inner.focus_text);
            let mut transition = inner.selection.dismiss(&text, &focus_text);
            transition.close = true;
            transition
        });
    }
}

/// A date/time picker attached to one host element.
///
/// Dropping the picker deregisters it from its document.
pub struct DateTimePicker {
    shared: Arc<PickerShared>,
    document: Arc<Document>,
}

impl DateTimePicker {
    /// Attaches a picker to `host` in the global document, using the system
    /// clock.
    pub fn init(
        element_id: impl Into<String>,
        host: impl HostElement + 'static,
        config: PickerConfig,
    ) -> Result<Self, ConfigError> {
        Self::init_with(Document::global(), Utc::now, element_id, host, config)
    }

    /// Attaches a picker to `host` in `document`, reading "now" from `clock`.
    pub fn init_with<C>(
        document: Arc<Document>,
        clock: C,
        element_id: impl Into<String>,
        host: impl HostElement + 'static,
        config: PickerConfig,
    ) -> Result<Self, ConfigError>
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        let resolved = config.resolve()?;
        let element_id = element_id.into();
        let mut selection = Selection::new(
            resolved.selection,
            resolved.formatter,
            config.zone,
            config.utc_mode,
            clock(),
        );
        if let Some(text) = config.initial_value.as_deref() {
            // Validated by `resolve`. The field and host are written below.
            let transition = selection.edit_field(text);
            debug_assert!(transition.rejected.is_none());
        }

        let mut inner = PickerInner {
            selection,
            host: Box::new(host),
            locale: resolved.locale,
            minute_step: config.minute_step,
            now_button_text: config.now_button_text,
            displayed: false,
            focus_text: String::new(),
            hover: None,
            last_error: None,
        };
        let text = inner.selection.field_text();
        inner.host.set_input_text(&text);
        inner.refresh_timezone_label();
        inner.host.set_dropdown_visible(false);

        let shared = Arc::new(PickerShared {
            id: WidgetId::new(),
            element_id,
            clock: Arc::new(clock),
            callback: config.callback,
            inner: Mutex::new(inner),
        });
        let handle: Arc<dyn DropdownHandle> = shared.clone();
        document.register(shared.id, Arc::downgrade(&handle));
        debug!(element = %shared.element_id, id = %shared.id, "picker attached");
        Ok(Self { shared, document })
    }

    /// Returns the registry id of this picker.
    pub fn id(&self) -> WidgetId {
        self.shared.id
    }

    /// Returns the id of the host element.
    pub fn element_id(&self) -> &str {
        &self.shared.element_id
    }

    /// Returns the document this picker is registered in.
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Shows the dropdown and hides every other one in the document.
    pub fn open(&self) {
        self.document.dispatch_click(Some(self.shared.id));
        let now = (self.shared.clock)();
        let mut inner = self.shared.inner.lock();
        if inner.displayed {
            return;
        }
        inner.focus_text = inner.host.input_text();
        inner.selection.reset_view();
        inner.hover = None;
        inner.displayed = true;
        inner.host.set_dropdown_visible(true);
        inner.redraw(now);
        trace!(id = %self.shared.id, "dropdown opened");
    }

    /// Handles a click on a tagged dropdown element.
    #[tracing::instrument(level = "debug", skip(self), fields(element = %self.shared.element_id))]
    pub fn click(&self, target: ClickTarget) {
        self.shared.run(|inner, now| {
            if !inner.displayed {
                warn!(?target, "click on a closed dropdown");
                return Transition::none();
            }
            inner.selection.click(target, now)
        });
    }

    /// Moves the pointer over a day cell, or off the grid with `None`.
    ///
    /// While an interval has only its first end, the grid previews the
    /// interval the pointer would select.
    pub fn hover(&self, date: Option<NaiveDate>) {
        let now = (self.shared.clock)();
        let mut inner = self.shared.inner.lock();
        if inner.hover == date {
            return;
        }
        inner.hover = date;
        if inner.displayed && inner.selection.anchor().is_some() {
            inner.redraw(now);
        }
    }

    /// Handles a `change` event of the value field.
    #[tracing::instrument(level = "debug", skip(self), fields(element = %self.shared.element_id))]
    pub fn field_changed(&self) {
        self.shared.run(|inner, _| {
            let text = inner.host.input_text();
            inner.selection.edit_field(&text)
        });
    }

    /// Handles a click on the timezone toggle.
    pub fn toggle_timezone(&self) {
        self.shared
            .run(|inner, _| inner.selection.toggle_timezone(false));
    }

    /// Sets the value and representation without notifying.
    pub fn update<Tz: TimeZone>(&self, value: Option<DateTime<Tz>>, force_utc_mode: bool) {
        let at = value.map(|value| value.with_timezone(&Utc));
        self.shared
            .run(|inner, _| inner.selection.update(at, force_utc_mode));
    }

    /// Closes the dropdown as if focus left the picker.
    pub fn dismiss(&self) {
        self.shared.dismiss();
    }

    /// Returns true while the dropdown is shown.
    pub fn is_displayed(&self) -> bool {
        self.shared.inner.lock().displayed
    }

    /// Returns the current dropdown contents.
    pub fn view(&self) -> PickerView {
        let now = (self.shared.clock)();
        self.shared.inner.lock().view(now)
    }

    /// Returns the committed value in its active representation.
    pub fn value(&self) -> Option<DateTime<FixedOffset>> {
        self.shared
            .inner
            .lock()
            .selection
            .value()
            .map(|value| value.to_fixed())
    }

    /// Returns the committed interval, ordered.
    pub fn interval(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        self.shared
            .inner
            .lock()
            .selection
            .interval()
            .map(|(start, end)| (start.to_fixed(), end.to_fixed()))
    }

    /// Returns true in fixed UTC mode.
    pub fn is_utc(&self) -> bool {
        self.shared.inner.lock().selection.is_utc()
    }

    /// Returns the canonical field text of the committed state.
    pub fn field_text(&self) -> String {
        self.shared.inner.lock().selection.field_text()
    }

    /// Returns the timezone toggle label: the offset in local mode, `UTC`
    /// otherwise.
    pub fn timezone_label(&self) -> String {
        self.shared.inner.lock().timezone_label()
    }

    /// Returns why the last typed text was rejected, until the next
    /// accepted transition.
    pub fn last_error(&self) -> Option<ParseError> {
        self.shared.inner.lock().last_error.clone()
    }
}

impl Drop for DateTimePicker {
    fn drop(&mut self) {
        self.document.deregister(self.shared.id);
    }
}

impl fmt::Debug for DateTimePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimePicker")
            .field("id", &self.shared.id)
            .field("element_id", &self.shared.element_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Datelike;
    use chrono_tz::Europe::Paris;
    use tessera_picker::{Granularity, LocalZone};

    use super::*;
    use crate::host::MemoryHost;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 17, 42).unwrap()
    }

    fn paris() -> LocalZone {
        LocalZone::Named(Paris)
    }

    fn picker_in(
        document: &Arc<Document>,
        host: &MemoryHost,
        config: PickerConfig,
    ) -> DateTimePicker {
        DateTimePicker::init_with(document.clone(), clock, "when", host.clone(), config).unwrap()
    }

    fn attach(granularity: Granularity) -> (DateTimePicker, MemoryHost) {
        let host = MemoryHost::with_timezone_toggle();
        let config = PickerConfig::default().granularity(granularity).zone(paris());
        (picker_in(&Document::new(), &host, config), host)
    }

    fn days(picker: &DateTimePicker) -> MonthGrid {
        match picker.view().grid {
            GridView::Days(grid) => grid,
            other => panic!("expected the month grid, got {other:?}"),
        }
    }

    fn times(picker: &DateTimePicker) -> TimeTable {
        match picker.view().grid {
            GridView::Hours(table) | GridView::Minutes(table) => table,
            other => panic!("expected a time grid, got {other:?}"),
        }
    }

    fn click_day(picker: &DateTimePicker, day: u32) {
        let target = days(picker).day(day).unwrap().target();
        picker.click(target);
    }

    fn click_label(picker: &DateTimePicker, label: &str) {
        let table = times(picker);
        let cell = table.cells().find(|cell| cell.text == label).unwrap();
        picker.click(cell.target);
    }

    #[test]
    fn dropdowns_start_closed() {
        for granularity in [
            Granularity::Day,
            Granularity::Hour,
            Granularity::Minute,
            Granularity::DayInterval,
        ] {
            let (picker, host) = attach(granularity);
            assert!(!picker.is_displayed());
            assert!(!host.is_dropdown_visible());
            assert_eq!(host.text(), "");
        }
    }

    #[test]
    fn day_click_commits_midnight() {
        let (picker, host) = attach(Granularity::Day);
        picker.open();
        assert!(host.is_dropdown_visible());
        click_day(&picker, 15);
        assert_eq!(host.text(), "2024-03-15T00:00:00+01:00");
        assert!(!picker.is_displayed());
        let events = host.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "when");
        assert_eq!(events[0].value, picker.value());
        assert!(!events[0].utc_mode);
    }

    #[test]
    fn hour_grid_lists_every_hour() {
        let (picker, host) = attach(Granularity::Hour);
        picker.open();
        click_day(&picker, 15);
        assert!(picker.is_displayed());
        let expected: Vec<String> = (0..24).map(|hour| format!("{hour:02}:00")).collect();
        assert_eq!(times(&picker).labels(), expected);
        assert!(host.events().is_empty());
        click_label(&picker, "02:00");
        assert_eq!(host.text(), "2024-03-15T02:00:00+01:00");
        assert_eq!(host.events().len(), 1);
    }

    #[test]
    fn minute_grid_uses_ten_minute_steps() {
        let (picker, host) = attach(Granularity::Minute);
        picker.open();
        click_day(&picker, 15);
        click_label(&picker, "23:00");
        assert_eq!(
            times(&picker).labels(),
            ["23:00", "23:10", "23:20", "23:30", "23:40", "23:50"]
        );
        click_label(&picker, "23:00");
        assert_eq!(host.text(), "2024-03-15T23:00:00+01:00");
    }

    #[test]
    fn reopening_without_edits_changes_nothing() {
        let host = MemoryHost::new();
        let config = PickerConfig::default()
            .zone(paris())
            .initial_value("2012-03-03T22:45:32+01:00");
        let picker = picker_in(&Document::new(), &host, config);
        let before = host.text();
        for _ in 0..2 {
            picker.open();
            picker.click(ClickTarget::NextMonth);
            picker.dismiss();
        }
        assert!(!picker.is_displayed());
        assert_eq!(host.text(), before);
        assert!(host.events().is_empty());
    }

    #[test]
    fn partial_walk_keeps_typed_precision() {
        let (picker, host) = attach(Granularity::Minute);
        host.type_text("2012-03-03T22:45:32+01:00");
        picker.field_changed();
        assert_eq!(host.text(), "2012-03-03T22:45:32+01:00");
        picker.open();
        assert_eq!(days(&picker).cursor.year(), 2012);
        click_day(&picker, 15);
        picker.dismiss();
        assert_eq!(host.text(), "2012-03-15T22:45:00+01:00");
        assert_eq!(host.events().len(), 2);
    }

    #[test]
    fn crossing_dst_relabels_the_offset() {
        let host = MemoryHost::with_timezone_toggle();
        let config = PickerConfig::default()
            .granularity(Granularity::Day)
            .zone(paris())
            .initial_value("2021-03-27T00:00:00+01:00");
        let picker = picker_in(&Document::new(), &host, config);
        assert_eq!(host.timezone_label().as_deref(), Some("+01:00"));

        picker.open();
        click_day(&picker, 29);
        assert_eq!(host.text(), "2021-03-29T00:00:00+02:00");
        assert_eq!(host.timezone_label().as_deref(), Some("+02:00"));

        let selected = picker.value().unwrap();
        picker.toggle_timezone();
        assert_eq!(host.text(), "2021-03-28T22:00:00+00:00");
        assert_eq!(host.timezone_label().as_deref(), Some(UTC_LABEL));
        let last = host.events().pop().unwrap();
        assert!(last.utc_mode);
        assert_eq!(last.value, Some(selected));
    }

    #[test]
    fn interval_click_order_is_irrelevant() {
        let (forward, forward_host) = attach(Granularity::DayInterval);
        forward.open();
        click_day(&forward, 4);
        assert!(forward.is_displayed());
        assert_eq!(forward_host.text(), "2024-03-04");
        assert!(!forward_host.events()[0].clean);
        click_day(&forward, 18);

        let (backward, backward_host) = attach(Granularity::DayInterval);
        backward.open();
        click_day(&backward, 18);
        click_day(&backward, 4);

        assert_eq!(forward_host.text(), "2024-03-04 - 2024-03-18");
        assert_eq!(backward_host.text(), forward_host.text());
        assert_eq!(backward.interval(), forward.interval());
        let last = backward_host.events().pop().unwrap();
        assert!(last.clean);
        assert_eq!(last.interval, backward.interval());
    }

    #[test]
    fn hovering_previews_the_interval() {
        let (picker, host) = attach(Granularity::DayInterval);
        picker.open();
        let grid = days(&picker);
        assert!(grid.cells().all(|cell| !cell.is_today));
        click_day(&picker, 10);
        picker.hover(grid.day(7).map(|cell| cell.date));
        let drawn = match host.last_view().unwrap().grid {
            GridView::Days(grid) => grid,
            other => panic!("unexpected {other:?}"),
        };
        let marked: Vec<u32> = drawn
            .cells()
            .filter(|cell| cell.in_selected_interval)
            .map(|cell| cell.date.day())
            .collect();
        assert_eq!(marked, [7, 8, 9, 10]);
    }

    #[test]
    fn clearing_the_field_notifies_null() {
        let (picker, host) = attach(Granularity::Minute);
        host.type_text("2012-03-03T22:45:32+01:00");
        picker.field_changed();
        host.type_text("");
        picker.field_changed();
        let last = host.events().pop().unwrap();
        assert!(last.value.is_none());
        assert!(picker.value().is_none());
        assert_eq!(host.text(), "");
    }

    #[test]
    fn invalid_text_is_left_as_typed() {
        let (picker, host) = attach(Granularity::Minute);
        host.type_text("2012-03-03T22:45:32+01:00");
        picker.field_changed();
        picker.open();
        host.type_text("2012-02-30T10:00");
        picker.field_changed();
        assert_eq!(host.text(), "2012-02-30T10:00");
        assert!(!picker.is_displayed());
        assert!(!host.is_dropdown_visible());
        assert_eq!(host.events().len(), 1);
        assert!(matches!(picker.last_error(), Some(ParseError::Invalid { .. })));
        assert_eq!(picker.field_text(), "2012-03-03T22:45:32+01:00");

        host.type_text("2012-03-04T10:00:00+01:00");
        picker.field_changed();
        assert!(picker.last_error().is_none());
    }

    #[test]
    fn now_button_copies_the_clock_unpadded() {
        let (picker, host) = attach(Granularity::Hour);
        picker.open();
        assert_eq!(picker.view().now_button_text, "Now");
        picker.click(ClickTarget::Now);
        assert_eq!(host.text(), "2024-03-20T10:17:42+01:00");
    }

    #[test]
    fn unreachable_clicks_are_ignored() {
        let (picker, host) = attach(Granularity::Day);
        picker.open();
        picker.click(ClickTarget::Minute(30));
        assert!(picker.is_displayed());
        assert!(host.events().is_empty());
    }

    #[test]
    fn programmatic_update_is_silent() {
        let (picker, host) = attach(Granularity::Minute);
        let at = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2020, 1, 2, 4, 4, 5)
            .unwrap();
        picker.update(Some(at), true);
        assert_eq!(host.text(), "2020-01-02T03:04:05+00:00");
        assert_eq!(host.timezone_label().as_deref(), Some(UTC_LABEL));
        picker.update(None::<DateTime<Utc>>, false);
        assert_eq!(host.text(), "");
        assert!(!picker.is_utc());
        assert!(host.events().is_empty());
    }

    #[test]
    fn only_one_dropdown_is_open_per_document() {
        let document = Document::new();
        let first_host = MemoryHost::new();
        let second_host = MemoryHost::new();
        let config = || PickerConfig::default().zone(paris());
        let first = picker_in(&document, &first_host, config());
        let second = picker_in(&document, &second_host, config());
        assert_eq!(document.len(), 2);

        first.open();
        second.open();
        assert!(!first.is_displayed());
        assert!(second.is_displayed());

        document.dispatch_click(Some(second.id()));
        assert!(second.is_displayed());
        document.dispatch_click(None);
        assert!(!second.is_displayed());
        assert!(first_host.events().is_empty() && second_host.events().is_empty());

        drop(first);
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn callback_receives_every_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let host = MemoryHost::new();
        let config = PickerConfig::default()
            .granularity(Granularity::Day)
            .zone(paris())
            .callback(move |event| {
                assert_eq!(event.id, "when");
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let picker = picker_in(&Document::new(), &host, config);
        picker.open();
        click_day(&picker, 1);
        picker.toggle_timezone();
        picker.update(Some(clock()), false);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
