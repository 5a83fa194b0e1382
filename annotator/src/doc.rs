//! Document model: annotations, click areas, and the numbering store.
//!
//! This module defines what a user has placed on the diagram (`Annotation`,
//! `Rect`), a field-level update type for edits coming from the host
//! (`AnnotationUpdate`), and the runtime store that owns all live annotations
//! together with the numbering cursor (`AnnotationStore`).
//!
//! The store keeps annotations in creation order. Hit-testing walks that
//! order; list display and exports sort by `number` instead.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{MAX_START_NUMBER, MIN_CLICK_AREA};

/// Unique identifier for an annotation.
pub type AnnotationId = Uuid;

/// Axis-aligned rectangle in SVG user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two corners, with the origin flipped so that
    /// width and height are never negative.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Square of side `size` centered on `center`.
    #[must_use]
    pub fn centered_square(center: Point, size: f64) -> Self {
        let half = size / 2.0;
        Self { x: center.x - half, y: center.y - half, width: size, height: size }
    }

    /// Whether `pt` lies inside the rectangle. Edges count as inside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Whether the rectangle is large enough to be stored as a click area.
    #[must_use]
    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_CLICK_AREA && self.height >= MIN_CLICK_AREA
    }
}

/// A numbered marker placed on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier, fixed for the lifetime of the session.
    pub id: AnnotationId,
    /// User-facing label. Unique by convention only.
    pub number: u32,
    /// Marker center in SVG user space. Never moves after creation.
    pub position: Point,
    pub name: String,
    pub description: String,
    /// Region that targets this annotation in the viewer, if defined.
    pub click_area: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
}

impl Annotation {
    /// Create an annotation with the default name for `number` and no
    /// description, click area, or metadata.
    #[must_use]
    pub fn new(number: u32, position: Point) -> Self {
        Self {
            id: Uuid::now_v7(),
            number,
            position,
            name: default_name(number),
            description: String::new(),
            click_area: None,
            voltage: None,
            kind: None,
            compatibility: None,
        }
    }

    /// The name, falling back to the default label when blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() { default_name(self.number) } else { self.name.clone() }
    }
}

/// Default label for an annotation numbered `number`.
#[must_use]
pub fn default_name(number: u32) -> String {
    format!("Interface {number}")
}

/// A single-field edit. Fields not named here (`id`, `position`) are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum AnnotationUpdate {
    Name(String),
    Description(String),
    /// Set or clear the click area. Areas below the minimum are rejected.
    ClickArea(Option<Rect>),
    /// Explicit renumber.
    Number(u32),
    Voltage(Option<String>),
    Kind(Option<String>),
    Compatibility(Option<String>),
}

/// Rejected value for the next-number cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberError {
    #[error("annotation number must be between 1 and {MAX_START_NUMBER}, got {0}")]
    OutOfRange(i64),
}

/// In-memory store of annotations plus the numbering cursor.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    next_number: u32,
    auto_increment: bool,
}

impl AnnotationStore {
    /// Create an empty store with the cursor at 1 and auto-increment on.
    #[must_use]
    pub fn new() -> Self {
        Self { annotations: Vec::new(), next_number: 1, auto_increment: true }
    }

    /// Place a new annotation at `position` and append it.
    ///
    /// With auto-increment the first unused number at or above the cursor is
    /// taken and the cursor moves past it. Without, the cursor value is used
    /// as-is and stays put, so repeated placements share a number.
    pub fn create(&mut self, position: Point) -> &Annotation {
        let number = if self.auto_increment {
            let number = self.first_free_from(self.next_number);
            self.next_number = self.first_free_from(number.saturating_add(1));
            number
        } else {
            self.next_number
        };
        self.annotations.push(Annotation::new(number, position));
        let index = self.annotations.len() - 1;
        &self.annotations[index]
    }

    /// Apply a single-field update. Returns `false` without mutating anything
    /// if the annotation doesn't exist or the value is rejected.
    pub fn update(&mut self, id: &AnnotationId, update: AnnotationUpdate) -> bool {
        let Some(annotation) = self.get_mut(id) else {
            return false;
        };
        match update {
            AnnotationUpdate::Name(name) => annotation.name = name,
            AnnotationUpdate::Description(description) => annotation.description = description,
            AnnotationUpdate::ClickArea(area) => {
                if area.is_some_and(|rect| !rect.meets_minimum()) {
                    return false;
                }
                annotation.click_area = area;
            }
            AnnotationUpdate::Number(number) => {
                if number == 0 {
                    return false;
                }
                annotation.number = number;
            }
            AnnotationUpdate::Voltage(voltage) => annotation.voltage = voltage,
            AnnotationUpdate::Kind(kind) => annotation.kind = kind,
            AnnotationUpdate::Compatibility(compatibility) => annotation.compatibility = compatibility,
        }
        true
    }

    /// Remove an annotation by id, returning it if it was present.
    pub fn delete(&mut self, id: &AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == *id)?;
        Some(self.annotations.remove(index))
    }

    /// Remove every annotation and reset the cursor to 1.
    pub fn clear(&mut self) {
        self.annotations.clear();
        self.next_number = 1;
    }

    /// Replace the contents with previously exported annotations. The cursor
    /// moves to one past the highest number present.
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) {
        self.next_number = annotations
            .iter()
            .map(|a| a.number)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.annotations = annotations;
    }

    /// Set the cursor from user input.
    ///
    /// # Errors
    ///
    /// Returns [`NumberError::OutOfRange`] unless `1 <= number <= 999`.
    pub fn set_next_number(&mut self, number: i64) -> Result<u32, NumberError> {
        let valid = u32::try_from(number).map_err(|_| NumberError::OutOfRange(number))?;
        if !(1..=MAX_START_NUMBER).contains(&valid) {
            return Err(NumberError::OutOfRange(number));
        }
        self.next_number = valid;
        Ok(valid)
    }

    /// Toggle auto-increment. Turning it on moves the cursor forward past any
    /// number already in use.
    pub fn set_auto_increment(&mut self, enabled: bool) {
        self.auto_increment = enabled;
        if enabled {
            self.next_number = self.first_free_from(self.next_number);
        }
    }

    #[must_use]
    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    #[must_use]
    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// Return a reference to an annotation by id.
    #[must_use]
    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == *id)
    }

    fn get_mut(&mut self, id: &AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == *id)
    }

    /// Annotations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Annotations ordered by `number`; ties keep creation order.
    #[must_use]
    pub fn sorted_by_number(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<&Annotation> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| a.number);
        sorted
    }

    /// Number of annotations currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Returns `true` if the store contains no annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// First number at or above `start` that no annotation uses. If every
    /// number up to `u32::MAX` is taken, `start` itself is returned.
    fn first_free_from(&self, start: u32) -> u32 {
        let start = start.max(1);
        let mut candidate = start;
        while self.annotations.iter().any(|a| a.number == candidate) {
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => return start,
            }
        }
        candidate
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}
