//! Exports: turning the annotation store into files for the viewer.
//!
//! DESIGN
//! ======
//! Every export is a pure function of the store (plus the uploaded SVG text
//! where needed). Annotations are emitted ascending by `number`, ties in
//! creation order. The SVG exports append layers to the user's document
//! without touching anything else in it; see [`crate::svg`].
//!
//! | Format | Needs SVG | Needs annotations | File |
//! |--------|-----------|-------------------|------|
//! | visible SVG | yes | no | `{base}-v.svg` |
//! | invisible SVG | yes | yes | `{base}-iv.svg` |
//! | interfaces JSON | no | yes | `{base}-sbc-interfaces.json` |
//! | annotations JSON | no | no | `{base}-annotations.json` |
//!
//! ERROR HANDLING
//! ==============
//! Missing prerequisites are reported before any output is produced. Import
//! validates every record and names the first offending entry; nothing is
//! partially applied.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DEFAULT_CLICK_AREA, LABEL_BASELINE_OFFSET, MARKER_RADIUS, MAX_ANNOTATION_NUMBER};
use crate::doc::{Annotation, AnnotationStore, Rect};
use crate::interfaces::{InterfaceEntry, InterfacesFile};
use crate::svg::{self, Element, SvgError};

/// `id` of the group the viewer binds clicks to.
pub const CLICK_LAYER_ID: &str = "click-layer";
/// `id` of the group holding visible number markers.
pub const NUMBER_LAYER_ID: &str = "number-labels";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("load an SVG file first")]
    NoSvgLoaded,
    #[error("add at least one annotation first")]
    NoAnnotations,
    #[error("invalid SVG: {0}")]
    Svg(#[from] SvgError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid annotations file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("annotation #{index} has number 0; numbers start at 1")]
    InvalidNumber { index: usize },
    #[error("annotation #{index} has number {number}; the largest allowed is {MAX_ANNOTATION_NUMBER}")]
    NumberTooLarge { index: usize, number: u32 },
    #[error("annotation #{index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("annotation #{index} (number {number}) has a click area smaller than 10x10")]
    ClickAreaTooSmall { index: usize, number: u32 },
    #[error("annotation id {0} appears more than once")]
    DuplicateId(Uuid),
}

/// Which layers the visible SVG export includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub include_numbers: bool,
    pub include_click_layer: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { include_numbers: true, include_click_layer: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    VisibleSvg,
    InvisibleSvg,
    Interfaces,
    Annotations,
}

impl ExportFormat {
    /// Download name derived from the uploaded file's base name.
    #[must_use]
    pub fn file_name(self, base: Option<&str>) -> String {
        let (suffix, fallback) = match self {
            Self::VisibleSvg => ("-v.svg", "annotated-v.svg"),
            Self::InvisibleSvg => ("-iv.svg", "invisible-iv.svg"),
            Self::Interfaces => ("-sbc-interfaces.json", "sbc-interfaces.json"),
            Self::Annotations => ("-annotations.json", "annotations.json"),
        };
        match base.filter(|b| !b.is_empty()) {
            Some(base) => format!("{base}{suffix}"),
            None => fallback.to_owned(),
        }
    }

    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::VisibleSvg | Self::InvisibleSvg => "image/svg+xml",
            Self::Interfaces | Self::Annotations => "application/json",
        }
    }
}

/// A produced file, ready for the host to download or write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub file_name: String,
    pub mime: String,
    pub content: String,
}

/// Strip the last extension from an uploaded file name: `rock5t.svg` -> `rock5t`.
#[must_use]
pub fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}

/// Run one export over the store.
///
/// # Errors
///
/// Returns [`ExportError`] when the format's prerequisites are missing or
/// encoding fails.
pub fn export(
    format: ExportFormat,
    svg_text: Option<&str>,
    base: Option<&str>,
    store: &AnnotationStore,
    options: ExportOptions,
) -> Result<ExportFile, ExportError> {
    let content = match format {
        ExportFormat::VisibleSvg => visible_svg(svg_text.ok_or(ExportError::NoSvgLoaded)?, store, options)?,
        ExportFormat::InvisibleSvg => invisible_svg(svg_text.ok_or(ExportError::NoSvgLoaded)?, store)?,
        ExportFormat::Interfaces => interfaces(store)?.to_json()?,
        ExportFormat::Annotations => annotations_json(store)?,
    };
    Ok(ExportFile {
        format,
        file_name: format.file_name(base),
        mime: format.mime().to_owned(),
        content,
    })
}

// =============================================================================
// SVG
// =============================================================================

fn click_layer() -> Element {
    Element::new("g")
        .attr("id", CLICK_LAYER_ID)
        .attr("opacity", "0")
        .attr("style", "cursor: pointer;")
}

fn click_rect(annotation: &Annotation, area: Rect) -> Element {
    Element::new("rect")
        .attr("x", area.x)
        .attr("y", area.y)
        .attr("width", area.width)
        .attr("height", area.height)
        .attr("fill", "white")
        .attr("data-id", annotation.number)
        .attr("title", annotation.display_name())
}

fn number_marker(layer: &mut Element, annotation: &Annotation) {
    let Point { x, y } = annotation.position;
    layer.push(
        Element::new("circle")
            .attr("cx", x)
            .attr("cy", y)
            .attr("r", MARKER_RADIUS)
            .attr("fill", "#ff4444")
            .attr("stroke", "white")
            .attr("stroke-width", "2"),
    );
    layer.push(
        Element::new("text")
            .attr("x", x)
            .attr("y", y + LABEL_BASELINE_OFFSET)
            .attr("text-anchor", "middle")
            .attr("fill", "white")
            .text(annotation.number),
    );
}

/// The uploaded SVG plus a visible number layer and a click layer holding one
/// rectangle per defined click area.
///
/// # Errors
///
/// Returns [`ExportError::Svg`] if `svg_text` is not an SVG document.
pub fn visible_svg(svg_text: &str, store: &AnnotationStore, options: ExportOptions) -> Result<String, ExportError> {
    let sorted = store.sorted_by_number();
    let mut markup = String::new();

    if options.include_numbers {
        let mut layer = Element::new("g")
            .attr("id", NUMBER_LAYER_ID)
            .attr("font-family", "Arial, sans-serif")
            .attr("font-size", "14")
            .attr("font-weight", "bold");
        for annotation in &sorted {
            number_marker(&mut layer, annotation);
        }
        markup.push_str(&layer.to_string());
    }

    if options.include_click_layer {
        let mut layer = click_layer();
        for annotation in &sorted {
            if let Some(area) = annotation.click_area {
                layer.push(click_rect(annotation, area));
            }
        }
        markup.push_str(&layer.to_string());
    }

    Ok(svg::append_to_root(svg_text, &markup)?)
}

/// The uploaded SVG plus a click layer only. Every annotation gets a rectangle;
/// those without a click area get a 30x30 square around the marker.
///
/// # Errors
///
/// Returns [`ExportError::NoAnnotations`] for an empty store, or
/// [`ExportError::Svg`] if `svg_text` is not an SVG document.
pub fn invisible_svg(svg_text: &str, store: &AnnotationStore) -> Result<String, ExportError> {
    if store.is_empty() {
        return Err(ExportError::NoAnnotations);
    }
    let mut layer = click_layer();
    for annotation in store.sorted_by_number() {
        let area = annotation
            .click_area
            .unwrap_or_else(|| Rect::centered_square(annotation.position, DEFAULT_CLICK_AREA));
        layer.push(click_rect(annotation, area));
    }
    Ok(svg::append_to_root(svg_text, &layer.to_string())?)
}

// =============================================================================
// JSON
// =============================================================================

#[allow(clippy::cast_possible_truncation)]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Details text: the description (or a placeholder) followed by a summary of
/// the click area.
#[must_use]
pub fn details(annotation: &Annotation) -> String {
    let base = if annotation.description.is_empty() {
        format!("Details of interface {}", annotation.number)
    } else {
        annotation.description.clone()
    };
    match annotation.click_area {
        Some(area) => format!(
            "{base}\n\nClick area:\n- Position: ({}, {})\n- Size: {}\u{d7}{}",
            round_half_up(area.x),
            round_half_up(area.y),
            round_half_up(area.width),
            round_half_up(area.height),
        ),
        None => format!("{base}\n\nClick area: not defined"),
    }
}

/// Structured data for the viewer, keyed by number. When numbers repeat the
/// later annotation wins.
///
/// # Errors
///
/// Returns [`ExportError::NoAnnotations`] for an empty store.
pub fn interfaces(store: &AnnotationStore) -> Result<InterfacesFile, ExportError> {
    if store.is_empty() {
        return Err(ExportError::NoAnnotations);
    }
    let mut file = InterfacesFile::default();
    for annotation in store.sorted_by_number() {
        let number = annotation.number;
        let entry = InterfaceEntry {
            name: annotation.display_name(),
            description: if annotation.description.is_empty() {
                format!("Description of interface {number}")
            } else {
                annotation.description.clone()
            },
            details: details(annotation),
            voltage: annotation.voltage.clone().filter(|v| !v.is_empty()),
            kind: annotation.kind.clone().filter(|v| !v.is_empty()),
            compatibility: annotation.compatibility.clone().filter(|v| !v.is_empty()),
            ..Default::default()
        };
        file.interfaces.insert(number, entry);
    }
    Ok(file)
}

#[derive(Serialize)]
struct AnnotationsOut<'a> {
    annotations: Vec<&'a Annotation>,
}

/// Full dump of the store in creation order, re-importable with
/// [`import_annotations`].
///
/// # Errors
///
/// Propagates serialization failures from `serde_json`.
pub fn annotations_json(store: &AnnotationStore) -> Result<String, ExportError> {
    let out = AnnotationsOut { annotations: store.iter().collect() };
    Ok(serde_json::to_string_pretty(&out)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    number: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    position: Point,
    #[serde(default)]
    click_area: Option<Rect>,
    #[serde(default)]
    voltage: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    compatibility: Option<String>,
}

#[derive(Deserialize)]
struct AnnotationsIn {
    annotations: Vec<AnnotationRecord>,
}

/// Parse an annotations file produced by [`annotations_json`].
///
/// Ids that are not UUIDs (or are missing) are replaced with fresh ones.
///
/// # Errors
///
/// Returns [`ImportError`] for malformed JSON or the first invalid record.
pub fn import_annotations(text: &str) -> Result<Vec<Annotation>, ImportError> {
    let input: AnnotationsIn = serde_json::from_str(text)?;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(input.annotations.len());

    for (index, record) in input.annotations.into_iter().enumerate() {
        if record.number == 0 {
            return Err(ImportError::InvalidNumber { index });
        }
        if record.number > MAX_ANNOTATION_NUMBER {
            return Err(ImportError::NumberTooLarge { index, number: record.number });
        }
        let finite = [record.position.x, record.position.y]
            .into_iter()
            .chain(record.click_area.iter().flat_map(|r| [r.x, r.y, r.width, r.height]))
            .all(f64::is_finite);
        if !finite {
            return Err(ImportError::NonFinite { index });
        }
        if record.click_area.is_some_and(|r| !r.meets_minimum()) {
            return Err(ImportError::ClickAreaTooSmall { index, number: record.number });
        }

        let mut annotation = Annotation::new(record.number, record.position);
        if let Some(raw) = record.id.as_ref().and_then(serde_json::Value::as_str) {
            if let Ok(id) = Uuid::parse_str(raw) {
                annotation.id = id;
            }
        }
        if !seen.insert(annotation.id) {
            return Err(ImportError::DuplicateId(annotation.id));
        }
        if !record.name.is_empty() {
            annotation.name = record.name;
        }
        annotation.description = record.description;
        annotation.click_area = record.click_area;
        annotation.voltage = record.voltage;
        annotation.kind = record.kind;
        annotation.compatibility = record.compatibility;
        out.push(annotation);
    }

    Ok(out)
}
