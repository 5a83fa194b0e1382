use serde::Serialize;
use tracing::{debug, warn};

use crate::camera::{Camera, Point};
use crate::doc::{Annotation, AnnotationId, AnnotationStore, AnnotationUpdate, NumberError, Rect};
use crate::export::{self, ExportError, ExportFile, ExportFormat, ExportOptions, ImportError};
use crate::hit;
use crate::input::{InputState, Mode, UiState, WheelDelta};
use crate::svg::{self, SvgError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// A new SVG replaced the diagram; all annotations are gone.
    SvgLoaded { file_name: Option<String>, view_box: String, width: String, height: String },
    AnnotationCreated { annotation: Annotation },
    AnnotationUpdated { annotation: Annotation },
    AnnotationDeleted { id: AnnotationId },
    /// Annotations were replaced wholesale (import).
    AnnotationsReplaced { count: usize },
    Cleared,
    SelectionChanged { id: Option<AnnotationId> },
    ModeChanged { mode: Mode, hint: String },
    /// The in-progress click area for the host to outline.
    DraftArea { rect: Rect },
    DraftCleared,
    /// Read-only details for an annotation clicked in view mode.
    ShowDetails { annotation: Annotation },
    ZoomChanged { zoom: f64, percent: i64, transform: String },
    NextNumberChanged { number: u32 },
    ExportOptionsChanged { options: ExportOptions },
    Exported { file: ExportFile },
    /// Blocking, user-facing message for a rejected operation.
    Notice { message: String },
    SetCursor { cursor: String },
}

/// Reasons a user command is refused. Surfaced to the host as
/// [`Action::Notice`]; the session is left unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("select an annotation from the list before editing its click area")]
    NoSelection,
    #[error(transparent)]
    Number(#[from] NumberError),
    #[error("invalid SVG file: {0}")]
    Svg(#[from] SvgError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// The uploaded diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSource {
    pub content: String,
    /// Upload name without its extension, used to name exports.
    pub base_name: Option<String>,
}

/// Core session state: all logic that doesn't depend on a rendering surface.
///
/// The host owns exactly one of these per editor instance. Pointer
/// coordinates passed in are already in SVG user space.
#[derive(Debug, Default)]
pub struct SessionCore {
    pub store: AnnotationStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub svg: Option<SvgSource>,
}

impl SessionCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(err: CommandError) -> Vec<Action> {
        warn!(error = %err, "command rejected");
        vec![Action::Notice { message: err.to_string() }]
    }

    fn cursor_action(&self) -> Action {
        Action::SetCursor { cursor: self.ui.mode.cursor(self.ui.selected_id.is_some()).to_owned() }
    }

    // --- Document ---

    /// Replace the diagram. Every annotation, the selection, and the
    /// numbering cursor are reset.
    pub fn load_svg(&mut self, content: String, file_name: Option<&str>) -> Vec<Action> {
        if let Err(err) = svg::validate(&content) {
            return Self::reject(err.into());
        }
        let view_box = svg::root_attr(&content, "viewBox").unwrap_or_else(|| svg::DEFAULT_VIEW_BOX.to_owned());
        let width = svg::root_attr(&content, "width").unwrap_or_else(|| svg::DEFAULT_WIDTH.to_owned());
        let height = svg::root_attr(&content, "height").unwrap_or_else(|| svg::DEFAULT_HEIGHT.to_owned());
        let base_name = file_name.map(|name| export::base_name(name).to_owned());

        self.input = InputState::Idle;
        self.store.clear();
        self.ui.selected_id = None;
        self.svg = Some(SvgSource { content, base_name });
        debug!(file = ?file_name, "svg loaded");

        vec![
            Action::SvgLoaded { file_name: file_name.map(str::to_owned), view_box, width, height },
            Action::Cleared,
            Action::SelectionChanged { id: None },
            Action::NextNumberChanged { number: self.store.next_number() },
            self.cursor_action(),
        ]
    }

    /// Replace all annotations with the contents of an annotations file.
    pub fn import_annotations(&mut self, text: &str) -> Vec<Action> {
        let annotations = match export::import_annotations(text) {
            Ok(annotations) => annotations,
            Err(err) => return Self::reject(err.into()),
        };
        let count = annotations.len();
        self.input = InputState::Idle;
        self.ui.selected_id = None;
        self.store.replace_all(annotations);
        vec![
            Action::DraftCleared,
            Action::AnnotationsReplaced { count },
            Action::SelectionChanged { id: None },
            Action::NextNumberChanged { number: self.store.next_number() },
        ]
    }

    // --- Modes ---

    /// Switch modes. Any in-progress drag is finalized first.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        let mut actions = self.finish_editing();
        self.ui.mode = mode;
        actions.push(Action::ModeChanged { mode, hint: self.mode_hint() });
        actions.push(self.cursor_action());
        actions
    }

    /// Hint text for the current mode and selection.
    #[must_use]
    pub fn mode_hint(&self) -> String {
        let selected = self.ui.selected_id.and_then(|id| self.store.get(&id)).map(|a| a.number);
        self.ui.mode.hint(selected)
    }

    /// Commit or discard the in-progress drag.
    ///
    /// A draft at least 10x10 becomes the selected annotation's click area;
    /// anything smaller is dropped and the previous area is kept.
    pub fn finish_editing(&mut self) -> Vec<Action> {
        let InputState::DrawingArea { .. } = self.input else {
            return Vec::new();
        };
        let draft = self.input.draft();
        self.input = InputState::Idle;
        let mut actions = vec![Action::DraftCleared];

        let (Some(rect), Some(id)) = (draft, self.ui.selected_id) else {
            return actions;
        };
        if !rect.meets_minimum() {
            debug!(?rect, "click area below minimum, discarded");
            return actions;
        }
        if self.store.update(&id, AnnotationUpdate::ClickArea(Some(rect))) {
            debug!(%id, ?rect, "click area committed");
            if let Some(annotation) = self.store.get(&id) {
                actions.push(Action::AnnotationUpdated { annotation: annotation.clone() });
            }
        }
        actions
    }

    // --- Selection ---

    /// Select an annotation. Unknown ids are ignored.
    pub fn select(&mut self, id: &AnnotationId) -> Vec<Action> {
        if self.store.get(id).is_none() {
            return Vec::new();
        }
        let mut actions = self.finish_editing();
        self.ui.selected_id = Some(*id);
        actions.push(Action::SelectionChanged { id: Some(*id) });
        actions.push(self.cursor_action());
        actions
    }

    /// Clear the selection, finalizing any drag.
    pub fn deselect(&mut self) -> Vec<Action> {
        let mut actions = self.finish_editing();
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged { id: None });
            actions.push(self.cursor_action());
        }
        actions
    }

    /// Select an annotation and switch to edit mode.
    pub fn edit_annotation(&mut self, id: &AnnotationId) -> Vec<Action> {
        let mut actions = self.select(id);
        if actions.is_empty() {
            return actions;
        }
        actions.extend(self.set_mode(Mode::Edit));
        actions
    }

    // --- Pointer input (SVG user space) ---

    /// A click that is not part of a drag.
    pub fn on_click(&mut self, pt: Point) -> Vec<Action> {
        if self.input.is_drawing() {
            return Vec::new();
        }
        let hit = hit::locate(&self.store, pt).cloned();
        match (self.ui.mode, hit) {
            (Mode::Add, Some(annotation)) => self.select(&annotation.id),
            (Mode::Add, None) => {
                let annotation = self.store.create(pt).clone();
                debug!(number = annotation.number, x = pt.x, y = pt.y, "annotation created");
                let mut actions = vec![
                    Action::AnnotationCreated { annotation: annotation.clone() },
                    Action::NextNumberChanged { number: self.store.next_number() },
                ];
                actions.extend(self.select(&annotation.id));
                actions
            }
            (Mode::View, Some(annotation)) => vec![Action::ShowDetails { annotation }],
            (Mode::View | Mode::Edit, None) | (Mode::Edit, Some(_)) => Vec::new(),
        }
    }

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        if self.ui.mode != Mode::Edit {
            return Vec::new();
        }
        if self.ui.selected_id.is_none() {
            return Self::reject(CommandError::NoSelection);
        }
        self.input = InputState::DrawingArea { anchor: pt, current: pt };
        vec![Action::DraftArea { rect: Rect::from_corners(pt, pt) }]
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let InputState::DrawingArea { anchor, .. } = self.input else {
            return Vec::new();
        };
        self.input = InputState::DrawingArea { anchor, current: pt };
        vec![Action::DraftArea { rect: Rect::from_corners(anchor, pt) }]
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let InputState::DrawingArea { anchor, .. } = self.input else {
            return Vec::new();
        };
        self.input = InputState::DrawingArea { anchor, current: pt };
        self.finish_editing()
    }

    // --- Zoom / pan ---

    fn zoom_action(&self) -> Action {
        Action::ZoomChanged {
            zoom: self.camera.zoom,
            percent: self.camera.zoom_percent(),
            transform: self.camera.css_transform(),
        }
    }

    /// One wheel tick: up zooms in, down zooms out.
    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        if delta.dy < 0.0 { self.zoom_in() } else { self.zoom_out() }
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        if self.camera.zoom_in() { vec![self.zoom_action()] } else { Vec::new() }
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        if self.camera.zoom_out() { vec![self.zoom_action()] } else { Vec::new() }
    }

    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.camera.reset_zoom();
        vec![self.zoom_action()]
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        self.camera.pan_by(dx, dy);
        vec![self.zoom_action()]
    }

    // --- Annotation edits ---

    /// Apply a field update. Unknown ids and rejected values change nothing.
    pub fn update(&mut self, id: &AnnotationId, update: AnnotationUpdate) -> Vec<Action> {
        if !self.store.update(id, update) {
            return Vec::new();
        }
        self.store
            .get(id)
            .map(|annotation| vec![Action::AnnotationUpdated { annotation: annotation.clone() }])
            .unwrap_or_default()
    }

    /// Remove the click area from an annotation.
    pub fn delete_click_area(&mut self, id: &AnnotationId) -> Vec<Action> {
        self.update(id, AnnotationUpdate::ClickArea(None))
    }

    /// Delete an annotation. Unknown ids are ignored.
    pub fn delete(&mut self, id: &AnnotationId) -> Vec<Action> {
        if self.store.delete(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::AnnotationDeleted { id: *id }];
        if self.ui.selected_id == Some(*id) {
            // The draft belonged to the deleted annotation.
            if self.input.is_drawing() {
                self.input = InputState::Idle;
                actions.push(Action::DraftCleared);
            }
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged { id: None });
            actions.push(self.cursor_action());
        }
        actions
    }

    /// Remove every annotation and reset numbering to 1.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_drawing() {
            self.input = InputState::Idle;
            actions.push(Action::DraftCleared);
        }
        self.store.clear();
        self.ui.selected_id = None;
        actions.push(Action::Cleared);
        actions.push(Action::SelectionChanged { id: None });
        actions.push(Action::NextNumberChanged { number: self.store.next_number() });
        actions.push(self.cursor_action());
        actions
    }

    // --- Numbering ---

    pub fn set_start_number(&mut self, number: i64) -> Vec<Action> {
        match self.store.set_next_number(number) {
            Ok(number) => vec![Action::NextNumberChanged { number }],
            Err(err) => Self::reject(err.into()),
        }
    }

    pub fn set_auto_increment(&mut self, enabled: bool) -> Vec<Action> {
        self.store.set_auto_increment(enabled);
        vec![Action::NextNumberChanged { number: self.store.next_number() }]
    }

    // --- Export ---

    pub fn set_export_options(&mut self, options: ExportOptions) -> Vec<Action> {
        self.ui.export = options;
        vec![Action::ExportOptionsChanged { options }]
    }

    /// Produce one export file, or a notice if prerequisites are missing.
    pub fn export(&mut self, format: ExportFormat) -> Vec<Action> {
        match self.export_file(format) {
            Ok(file) => vec![Action::Exported { file }],
            Err(err) => Self::reject(err.into()),
        }
    }

    /// Produce one export file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] when the format's prerequisites are missing.
    pub fn export_file(&self, format: ExportFormat) -> Result<ExportFile, ExportError> {
        let content = self.svg.as_ref().map(|s| s.content.as_str());
        let base = self.svg.as_ref().and_then(|s| s.base_name.as_deref());
        export::export(format, content, base, &self.store, self.ui.export)
    }

    // --- Queries ---

    /// The currently selected annotation id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<AnnotationId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ui.mode
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an annotation by id.
    #[must_use]
    pub fn annotation(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.store.get(id)
    }

    /// Annotations for the side list, ordered by number.
    #[must_use]
    pub fn list(&self) -> Vec<&Annotation> {
        self.store.sorted_by_number()
    }
}
