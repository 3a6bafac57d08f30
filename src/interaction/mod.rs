//! Headless editing layer.
//!
//! Pointer gestures, the scroll tracker, the section context menu, minimap
//! reordering and image drops, all expressed as plain functions of
//! [`PageState`](crate::session::PageState) and input events. Whatever
//! hosts the preview (a webview, a test) feeds events in and recomposes
//! the page afterwards.
//!
//! The only thing the host must supply beyond events is geometry: the
//! rendered height of a section the user starts resizing. That comes in
//! through [`LayoutMeasure`].

pub mod drop;
pub mod gesture;
pub mod menu;
pub mod reorder;
pub mod tracker;

pub use drop::{CompositeRequest, DropOutcome, drop_image};
pub use gesture::{GestureController, MouseButton, PointerEvent, PointerTarget};
pub use menu::{ContextMenu, MenuAction};
pub use reorder::{move_section, nudge_section};
pub use tracker::{ActiveSectionTracker, Visibility};

use crate::types::Rect;
use std::collections::{BTreeMap, HashMap};

/// Geometry of the rendered preview.
pub trait LayoutMeasure {
    fn section_rect(&self, key: &str) -> Option<Rect>;
}

/// A host that cannot measure anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayout;

impl LayoutMeasure for NoLayout {
    fn section_rect(&self, _key: &str) -> Option<Rect> {
        None
    }
}

impl LayoutMeasure for HashMap<String, Rect> {
    fn section_rect(&self, key: &str) -> Option<Rect> {
        self.get(key).copied()
    }
}

impl LayoutMeasure for BTreeMap<String, Rect> {
    fn section_rect(&self, key: &str) -> Option<Rect> {
        self.get(key).copied()
    }
}

/// Effect of one event on the page state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Unchanged,
    /// Only transient gesture state moved; the stored state is untouched.
    Preview,
    /// The stored state changed.
    Committed,
}

impl StateChange {
    pub fn is_committed(self) -> bool {
        self == StateChange::Committed
    }
}
