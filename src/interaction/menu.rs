//! Per-section context menu.

use super::StateChange;
use crate::registry::RegistryError;
use crate::session::PageState;
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Make the section active.
    Select,
    /// Lock or unlock the section against replacement.
    ToggleHold,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuAnchor {
    pub section: String,
    pub at: Point,
}

/// At most one menu is open at a time.
#[derive(Debug, Clone, Default)]
pub struct ContextMenu {
    open: Option<MenuAnchor>,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the menu for `section`, replacing any menu already open.
    pub fn open(&mut self, section: impl Into<String>, at: Point) {
        self.open = Some(MenuAnchor {
            section: section.into(),
            at,
        });
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn anchor(&self) -> Option<&MenuAnchor> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Perform `action` on the section the menu was opened for. The menu
    /// closes whatever the result. A section that vanished while the menu
    /// was open is left alone; deleting the hero is an error.
    pub fn choose(
        &mut self,
        action: MenuAction,
        state: &mut PageState,
    ) -> Result<StateChange, RegistryError> {
        let Some(anchor) = self.open.take() else {
            return Ok(StateChange::Unchanged);
        };
        if !state.registry().contains(&anchor.section) {
            return Ok(StateChange::Unchanged);
        }
        let changed = match action {
            MenuAction::Select => state.set_active_section(&anchor.section),
            MenuAction::ToggleHold => {
                state.toggle_hold(&anchor.section)?;
                true
            }
            MenuAction::Delete => {
                state.remove_section(&anchor.section)?;
                true
            }
        };
        Ok(if changed {
            StateChange::Committed
        } else {
            StateChange::Unchanged
        })
    }
}
