//! Outbound change notifications.

use std::{fmt, sync::Arc};

use chrono::{DateTime, FixedOffset};
use tessera_picker::Instant;

/// Payload fired on the host element whenever a picker commits, resets or
/// toggles its timezone mode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChangeEvent {
    /// Id of the host element.
    pub id: String,
    /// Configured output format, empty for the default layout.
    pub format: String,
    /// The committed value in its active representation. `None` exactly when
    /// no value was ever explicitly set.
    pub value: Option<DateTime<FixedOffset>>,
    /// True when the value is represented in fixed UTC.
    pub utc_mode: bool,
    /// False while an interval only has its first end.
    pub clean: bool,
    /// Both ends of a completed interval, ordered.
    pub interval: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
}

impl ChangeEvent {
    pub(crate) fn new(
        id: &str,
        format: &str,
        value: Option<Instant>,
        utc_mode: bool,
        clean: bool,
        interval: Option<(Instant, Instant)>,
    ) -> Self {
        Self {
            id: id.to_string(),
            format: format.to_string(),
            value: value.map(|value| value.to_fixed()),
            utc_mode,
            clean,
            interval: interval.map(|(start, end)| (start.to_fixed(), end.to_fixed())),
        }
    }
}

/// Shared handle to a change subscriber.
///
/// Two handles compare equal when they wrap the same closure.
pub struct ChangeCallback {
    handler: Arc<dyn Fn(&ChangeEvent) + Send + Sync>,
}

impl ChangeCallback {
    /// Creates a callback handle from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Invokes the callback.
    pub fn call(&self, event: &ChangeEvent) {
        (self.handler)(event)
    }
}

impl<F> From<F> for ChangeCallback
where
    F: Fn(&ChangeEvent) + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl Clone for ChangeCallback {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl PartialEq for ChangeCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Eq for ChangeCallback {}

impl fmt::Debug for ChangeCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeCallback").finish_non_exhaustive()
    }
}
