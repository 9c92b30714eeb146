//! # Dropdown Registry
//!
//! Keeps at most one picker dropdown open per document.
//!
//! Every picker registers itself with a [`Document`] when it is created and
//! deregisters when it is dropped. A click anywhere in the document is routed
//! through [`Document::dispatch_click`], which dismisses every registered
//! dropdown except the one the click landed in. Opening a dropdown goes
//! through the same path, so the last opened dropdown always wins.
//!
//! The registry only holds weak references: it never keeps a picker alive,
//! and entries whose picker is gone are pruned on the next dispatch.
//!
//! ## Usage
//!
//! ```
//! use tessera_picker_widget::Document;
//!
//! let document = Document::new();
//! assert!(document.is_empty());
//!
//! // A click outside every picker dismisses them all.
//! document.dispatch_click(None);
//! ```
//!
//! Most applications have a single document and use [`Document::global`].

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, Weak},
};

use parking_lot::RwLock;
use tracing::trace;
use uuid::Uuid;

/// Global document used by pickers created without an explicit one.
static GLOBAL_DOCUMENT: OnceLock<Arc<Document>> = OnceLock::new();

/// Identifies one registered picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Something the document can close.
pub trait DropdownHandle: Send + Sync {
    /// Closes the dropdown as if focus left it.
    fn dismiss(&self);
}

/// A document-scoped registry of picker dropdowns.
#[derive(Default)]
pub struct Document {
    entries: RwLock<HashMap<WidgetId, Weak<dyn DropdownHandle>>>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the process-wide document.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_DOCUMENT.get_or_init(Self::new))
    }

    pub(crate) fn register(&self, id: WidgetId, handle: Weak<dyn DropdownHandle>) {
        trace!(%id, "dropdown registered");
        self.entries.write().insert(id, handle);
    }

    pub(crate) fn deregister(&self, id: WidgetId) {
        trace!(%id, "dropdown deregistered");
        self.entries.write().remove(&id);
    }

    /// Returns the number of registered dropdowns.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns true when `id` is registered.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Routes a document click: every dropdown except `target` is dismissed.
    ///
    /// Handles are dismissed after the registry lock is released, so a
    /// dismissed picker may deregister or open another one from inside
    /// its handler.
    pub fn dispatch_click(&self, target: Option<WidgetId>) {
        let mut dead = Vec::new();
        let live: Vec<Arc<dyn DropdownHandle>> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter(|(id, _)| Some(**id) != target)
                .filter_map(|(id, handle)| match handle.upgrade() {
                    Some(handle) => Some(handle),
                    None => {
                        dead.push(*id);
                        None
                    }
                })
                .collect()
        };
        if !dead.is_empty() {
            let mut entries = self.entries.write();
            for id in dead {
                entries.remove(&id);
            }
        }
        trace!(count = live.len(), ?target, "dismissing dropdowns");
        for handle in live {
            handle.dismiss();
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("entries", &self.len())
            .finish()
    }
}
