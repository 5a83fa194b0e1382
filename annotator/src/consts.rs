//! Shared numeric constants for the annotator crate.

// ── Markers ─────────────────────────────────────────────────────

/// Radius of the drawn number marker, in SVG user units.
pub const MARKER_RADIUS: f64 = 15.0;

/// Vertical offset from the marker center to the label baseline.
pub const LABEL_BASELINE_OFFSET: f64 = 5.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// A point closer than this to a marker center hits the marker.
pub const MARKER_HIT_RADIUS: f64 = 20.0;

// ── Click areas ─────────────────────────────────────────────────

/// Minimum width and height of a committed click area.
pub const MIN_CLICK_AREA: f64 = 10.0;

/// Side of the square synthesized around a marker with no click area.
pub const DEFAULT_CLICK_AREA: f64 = 30.0;

// ── Zoom ────────────────────────────────────────────────────────

pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 5.0;
pub const ZOOM_STEP: f64 = 0.2;

// ── Numbering ───────────────────────────────────────────────────

/// Largest number a user may set as the next annotation number.
pub const MAX_START_NUMBER: u32 = 999;

/// Largest number an imported annotation may carry.
pub const MAX_ANNOTATION_NUMBER: u32 = 9999;
