//! Embeddable date/time picker built on `tessera-picker`.
//!
//! A [`DateTimePicker`] is attached to a [`HostElement`] exposing one text
//! field and, optionally, a timezone toggle. The host forwards its gestures
//! (clicks on tagged dropdown cells, field `change` events, focus loss) to
//! the picker; the picker keeps the field text, the toggle label and the
//! dropdown contents in sync and fires a [`ChangeEvent`] on every commit.
//!
//! At most one dropdown is open per [`Document`]: opening one dismisses all
//! others, and a click outside every picker dismisses them all.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod config;
pub mod event;
pub mod host;
pub mod picker;
pub mod registry;

pub use tessera_picker;

pub use crate::{
    config::PickerConfig,
    event::{ChangeCallback, ChangeEvent},
    host::{HostElement, MemoryHost},
    picker::{DateTimePicker, GridView, PickerView, UTC_LABEL},
    registry::{Document, DropdownHandle, WidgetId},
};
