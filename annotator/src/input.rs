//! Input model: interaction modes, persistent UI state, and the drag gesture.
//!
//! `Mode` is the user's chosen way of interacting with the diagram and gates
//! which gestures are legal. `InputState` is the gesture being tracked between
//! pointer-down and pointer-up; in practice the only gesture is drawing a
//! click area for the selected annotation in edit mode.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{AnnotationId, Rect};
use crate::export::ExportOptions;

/// Which interaction mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Click on empty space places a new annotation (default).
    #[default]
    Add,
    /// Drag to define the selected annotation's click area.
    Edit,
    /// Read-only; clicks show annotation details.
    View,
}

impl Mode {
    /// CSS cursor for the diagram in this mode.
    #[must_use]
    pub fn cursor(self, has_selection: bool) -> &'static str {
        match self {
            Self::Add => "crosshair",
            Self::Edit if has_selection => "crosshair",
            Self::Edit => "default",
            Self::View => "pointer",
        }
    }

    /// Hint line shown over the diagram. `selected` is the number of the
    /// selected annotation, if any.
    #[must_use]
    pub fn hint(self, selected: Option<u32>) -> String {
        match (self, selected) {
            (Self::Add, _) => "Click anywhere on the SVG to add an annotation".to_owned(),
            (Self::Edit, Some(number)) => {
                format!("Editing annotation #{number} - drag to set its click area")
            }
            (Self::Edit, None) => "Select an annotation from the list to edit it".to_owned(),
            (Self::View, _) => "Preview mode - click an annotation to see its details".to_owned(),
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    #[serde(default)]
    pub dx: f64,
    /// Vertical scroll amount in pixels (negative = up = zoom in).
    pub dy: f64,
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active mode.
    pub mode: Mode,
    /// The id of the currently selected annotation, if any.
    pub selected_id: Option<AnnotationId>,
    /// Which layers the visible SVG export includes.
    pub export: ExportOptions,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is dragging out a click area for the selected annotation.
    DrawingArea {
        /// Where the drag started, in SVG user space.
        anchor: Point,
        /// Latest pointer position.
        current: Point,
    },
}

impl InputState {
    /// The in-progress rectangle, normalized, if a drag is active.
    #[must_use]
    pub fn draft(&self) -> Option<Rect> {
        match *self {
            Self::Idle => None,
            Self::DrawingArea { anchor, current } => Some(Rect::from_corners(anchor, current)),
        }
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::DrawingArea { .. })
    }
}
