//! The boundary between a picker and the element hosting it.
//!
//! A host provides exactly one text field and, optionally, a timezone toggle
//! control. The picker reads and writes the field through [`HostElement`],
//! hands it every regenerated dropdown view, and fires change events on it.
//! Hosts that cannot satisfy this shape are a caller contract violation.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{event::ChangeEvent, picker::PickerView};

/// An element a picker is attached to.
pub trait HostElement: Send {
    /// Returns the current text of the value field.
    fn input_text(&self) -> String;

    /// Overwrites the text of the value field.
    fn set_input_text(&mut self, text: &str);

    /// Returns true when the element carries a timezone toggle control.
    fn has_timezone_toggle(&self) -> bool {
        false
    }

    /// Relabels the timezone toggle control.
    fn set_timezone_label(&mut self, _label: &str) {}

    /// Fires a change event on the element.
    fn dispatch_change(&mut self, _event: &ChangeEvent) {}

    /// Draws a regenerated dropdown.
    fn render_dropdown(&mut self, _view: &PickerView) {}

    /// Shows or hides the dropdown.
    fn set_dropdown_visible(&mut self, _visible: bool) {}
}

#[derive(Debug, Default)]
struct MemoryHostState {
    text: String,
    toggle: Option<String>,
    events: Vec<ChangeEvent>,
    view: Option<PickerView>,
    visible: bool,
}

/// An in-memory host, used for headless embedding and tests.
///
/// Clones share the same element, so one clone can be handed to a picker
/// while another inspects what the picker did.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryHostState>>,
}

impl MemoryHost {
    /// Creates a host with an empty field and no timezone toggle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host that also carries a timezone toggle control.
    pub fn with_timezone_toggle() -> Self {
        let host = Self::default();
        host.state.lock().toggle = Some(String::new());
        host
    }

    /// Returns the current field text.
    pub fn text(&self) -> String {
        self.state.lock().text.clone()
    }

    /// Replaces the field text the way typing does, without firing anything.
    pub fn type_text(&self, text: &str) {
        self.state.lock().text = text.to_string();
    }

    /// Returns the label of the timezone toggle, if there is one.
    pub fn timezone_label(&self) -> Option<String> {
        self.state.lock().toggle.clone()
    }

    /// Returns every change event fired so far.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.state.lock().events.clone()
    }

    /// Returns the last rendered dropdown.
    pub fn last_view(&self) -> Option<PickerView> {
        self.state.lock().view.clone()
    }

    /// Returns true while the dropdown is shown.
    pub fn is_dropdown_visible(&self) -> bool {
        self.state.lock().visible
    }
}

impl HostElement for MemoryHost {
    fn input_text(&self) -> String {
        self.text()
    }

    fn set_input_text(&mut self, text: &str) {
        self.type_text(text);
    }

    fn has_timezone_toggle(&self) -> bool {
        self.state.lock().toggle.is_some()
    }

    fn set_timezone_label(&mut self, label: &str) {
        if let Some(toggle) = self.state.lock().toggle.as_mut() {
            *toggle = label.to_string();
        }
    }

    fn dispatch_change(&mut self, event: &ChangeEvent) {
        self.state.lock().events.push(event.clone());
    }

    fn render_dropdown(&mut self, view: &PickerView) {
        self.state.lock().view = Some(view.clone());
    }

    fn set_dropdown_visible(&mut self, visible: bool) {
        self.state.lock().visible = visible;
    }
}
