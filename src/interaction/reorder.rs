//! Minimap drag reordering.

use crate::registry::RegistryError;
use crate::session::PageState;

/// `order` with the item at `from` moved to `to`. `None` when either index
/// is out of range.
pub fn moved_order(order: &[String], from: usize, to: usize) -> Option<Vec<String>> {
    if from >= order.len() || to >= order.len() {
        return None;
    }
    let mut next = order.to_vec();
    let item = next.remove(from);
    next.insert(to, item);
    Some(next)
}

/// Move the section at `from` to position `to`. Returns false when the
/// indices are out of range or equal.
pub fn move_section(state: &mut PageState, from: usize, to: usize) -> Result<bool, RegistryError> {
    if from == to {
        return Ok(false);
    }
    match moved_order(state.order(), from, to) {
        Some(order) => {
            state.reorder(order)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Move a section by `offset` positions, clamped to the ends of the order.
pub fn nudge_section(state: &mut PageState, key: &str, offset: isize) -> Result<bool, RegistryError> {
    let Some(from) = state.registry().position(key) else {
        return Err(RegistryError::UnknownKey(key.to_string()));
    };
    let last = state.order().len().saturating_sub(1);
    let to = from.saturating_add_signed(offset).min(last);
    move_section(state, from, to)
}
