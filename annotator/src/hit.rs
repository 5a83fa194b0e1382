#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::MARKER_HIT_RADIUS;
use crate::doc::{Annotation, AnnotationStore};

/// Which part of an annotation was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Within the hit radius of the numbered marker.
    Marker,
    /// Inside the annotation's click area.
    ClickArea,
}

/// Test whether `pt` targets `annotation`, checking the marker before the
/// click area.
#[must_use]
pub fn hit_annotation(annotation: &Annotation, pt: Point) -> Option<HitPart> {
    if annotation.position.distance_to(pt) < MARKER_HIT_RADIUS {
        return Some(HitPart::Marker);
    }
    annotation
        .click_area
        .filter(|area| area.contains(pt))
        .map(|_| HitPart::ClickArea)
}

/// Find the annotation under `pt`.
///
/// Annotations are tried in store (creation) order and the first match wins,
/// whether it matched by marker or by click area. A later annotation whose
/// marker sits inside an earlier annotation's click area is therefore
/// shadowed at that spot.
#[must_use]
pub fn locate(store: &AnnotationStore, pt: Point) -> Option<&Annotation> {
    store.iter().find(|a| hit_annotation(a, pt).is_some())
}
