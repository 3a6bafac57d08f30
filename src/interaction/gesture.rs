//! Pointer gesture state machine.
//!
//! One gesture at a time:
//!
//! ```text
//! Idle ──down on text──────────▶ DraggingText ──up──▶ Idle   (commit top/left once)
//! Idle ──down on resize handle─▶ Resizing     ──up──▶ Idle   (height stored per move)
//! Idle ──left down on image────▶ Panning      ──up──▶ Idle   (translate stored per move)
//! ```
//!
//! Wheel events zoom the image of a section and do not interact with the
//! gesture in progress. Every handler whose target has gone missing leaves
//! the state untouched and returns the controller to `Idle`.

use super::{LayoutMeasure, StateChange};
use crate::config::{PageConfig, ZoomConfig};
use crate::overlay::TextEdit;
use crate::session::PageState;
use crate::types::{ImageTransform, Point};

/// Start height used when a section has neither an override nor a
/// measurement.
pub const FALLBACK_SECTION_HEIGHT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Text(String),
    ResizeHandle(String),
    Image(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        at: Point,
        button: MouseButton,
    },
    Move {
        at: Point,
    },
    Up {
        at: Point,
    },
    Wheel {
        section: String,
        delta_y: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    DraggingText {
        id: String,
        /// Pointer minus the box's (left, top) at press time.
        offset: Point,
        /// Box position while dragging, `x` = left, `y` = top.
        position: Point,
    },
    Resizing {
        section: String,
        start_y: f64,
        start_height: f64,
    },
    Panning {
        section: String,
        origin: Point,
        start: ImageTransform,
    },
}

#[derive(Debug, Clone)]
pub struct GestureController {
    gesture: Gesture,
    min_height: f64,
    zoom: ZoomConfig,
}

impl GestureController {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            gesture: Gesture::Idle,
            min_height: config.sections.min_height,
            zoom: config.zoom.clone(),
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// Text box being dragged and its uncommitted position.
    pub fn drag_preview(&self) -> Option<(&str, Point)> {
        match &self.gesture {
            Gesture::DraggingText { id, position, .. } => Some((id, *position)),
            _ => None,
        }
    }

    /// Abandon the current gesture without committing anything further.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        state: &mut PageState,
        measure: &dyn LayoutMeasure,
    ) -> StateChange {
        match event {
            PointerEvent::Down { target, at, button } => self.press(target, at, button, state, measure),
            PointerEvent::Move { at } => self.motion(at, state),
            PointerEvent::Up { at } => self.release(at, state),
            PointerEvent::Wheel { section, delta_y } => self.wheel(&section, delta_y, state),
        }
    }

    fn press(
        &mut self,
        target: PointerTarget,
        at: Point,
        button: MouseButton,
        state: &PageState,
        measure: &dyn LayoutMeasure,
    ) -> StateChange {
        if !self.is_idle() {
            return StateChange::Unchanged;
        }
        self.gesture = match target {
            PointerTarget::Text(id) => match state.texts().get(&id) {
                Some(element) => Gesture::DraggingText {
                    offset: Point::new(at.x - element.left, at.y - element.top),
                    position: Point::new(element.left, element.top),
                    id,
                },
                None => Gesture::Idle,
            },
            PointerTarget::ResizeHandle(section) => {
                if !state.registry().contains(&section) {
                    return StateChange::Unchanged;
                }
                let start_height = state
                    .registry()
                    .state(&section)
                    .height_px
                    .or_else(|| measure.section_rect(&section).map(|r| r.height))
                    .unwrap_or(FALLBACK_SECTION_HEIGHT);
                Gesture::Resizing {
                    section,
                    start_y: at.y,
                    start_height,
                }
            }
            PointerTarget::Image(section) => {
                if button != MouseButton::Left
                    || !state.registry().contains(&section)
                    || state.is_placeholder_section(&section)
                {
                    return StateChange::Unchanged;
                }
                Gesture::Panning {
                    start: state.registry().state(&section).transform,
                    section,
                    origin: at,
                }
            }
        };
        StateChange::Unchanged
    }

    fn motion(&mut self, at: Point, state: &mut PageState) -> StateChange {
        match &mut self.gesture {
            Gesture::Idle => StateChange::Unchanged,
            Gesture::DraggingText { offset, position, .. } => {
                *position = Point::new(at.x - offset.x, at.y - offset.y);
                StateChange::Preview
            }
            Gesture::Resizing {
                section,
                start_y,
                start_height,
            } => {
                let height = (*start_height + (at.y - *start_y)).max(self.min_height);
                match state.set_section_height(section, height) {
                    Ok(_) => StateChange::Committed,
                    Err(e) => {
                        tracing::debug!(error = %e, "resize target vanished");
                        self.gesture = Gesture::Idle;
                        StateChange::Unchanged
                    }
                }
            }
            Gesture::Panning {
                section,
                origin,
                start,
            } => {
                let transform = ImageTransform {
                    scale: start.scale,
                    x: start.x + (at.x - origin.x),
                    y: start.y + (at.y - origin.y),
                };
                match state.set_image_transform(section, transform) {
                    Ok(()) => StateChange::Committed,
                    Err(e) => {
                        tracing::debug!(error = %e, "pan target vanished");
                        self.gesture = Gesture::Idle;
                        StateChange::Unchanged
                    }
                }
            }
        }
    }

    fn release(&mut self, at: Point, state: &mut PageState) -> StateChange {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::DraggingText { id, offset, .. } => {
                let edit = TextEdit::Position {
                    top: at.y - offset.y,
                    left: at.x - offset.x,
                };
                if state.update_text(&id, edit) {
                    StateChange::Committed
                } else {
                    StateChange::Unchanged
                }
            }
            _ => StateChange::Unchanged,
        }
    }

    fn wheel(&mut self, section: &str, delta_y: f64, state: &mut PageState) -> StateChange {
        if !state.registry().contains(section) || state.is_placeholder_section(section) {
            return StateChange::Unchanged;
        }
        let current = state.registry().state(section).transform;
        let Some(scale) = zoom_step(current.scale, delta_y, &self.zoom) else {
            return StateChange::Unchanged;
        };
        if scale == current.scale {
            return StateChange::Unchanged;
        }
        let transform = ImageTransform { scale, ..current };
        match state.set_image_transform(section, transform) {
            Ok(()) => StateChange::Committed,
            Err(_) => StateChange::Unchanged,
        }
    }
}

/// Next scale for one wheel notch: `delta_y > 0` zooms out, `< 0` zooms
/// in, zero (or a non-finite delta) is ignored. The result is rounded to
/// two decimals, then clamped to the configured range, so a bound with more
/// precision is still never crossed.
pub fn zoom_step(scale: f64, delta_y: f64, zoom: &ZoomConfig) -> Option<f64> {
    if delta_y == 0.0 || !delta_y.is_finite() {
        return None;
    }
    let step = if delta_y > 0.0 { -zoom.step } else { zoom.step };
    let next = ((scale + step) * 100.0).round() / 100.0;
    Some(next.clamp(zoom.min, zoom.max))
}
