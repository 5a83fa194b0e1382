#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

/// A point in SVG user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Presentation transform for the diagram.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom), kept within `[ZOOM_MIN, ZOOM_MAX]`.
/// Annotation coordinates never pass through the camera; only the host's
/// view of the diagram does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Step the zoom up by one increment. Returns `true` if the zoom changed.
    pub fn zoom_in(&mut self) -> bool {
        if self.zoom >= ZOOM_MAX {
            return false;
        }
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
        true
    }

    /// Step the zoom down by one increment. Returns `true` if the zoom changed.
    pub fn zoom_out(&mut self) -> bool {
        if self.zoom <= ZOOM_MIN {
            return false;
        }
        self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN);
        true
    }

    /// Restore the 1:1 scale. Pan is left alone.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom as a whole percentage for the zoom label.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }

    /// CSS `transform` value the host applies to the diagram element.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.pan_x, self.pan_y, self.zoom)
    }
}
