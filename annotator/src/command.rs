//! User commands and their dispatch onto the session.
//!
//! Every UI event the host forwards is one [`Command`]. The browser facade
//! receives them as JSON (`{"type": "click", "x": 10, "y": 20}`) and the CLI
//! reads them line by line from a script, so both hosts drive the session
//! through the same table.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{AnnotationId, AnnotationUpdate};
use crate::engine::{Action, SessionCore};
use crate::export::{ExportFormat, ExportOptions};
use crate::input::{Mode, WheelDelta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    LoadSvg {
        content: String,
        #[serde(default)]
        file_name: Option<String>,
    },
    ImportAnnotations { content: String },
    SetMode { mode: Mode },
    Click { x: f64, y: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Wheel(WheelDelta),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Pan { dx: f64, dy: f64 },
    Select { id: AnnotationId },
    Deselect,
    EditAnnotation { id: AnnotationId },
    Update { id: AnnotationId, update: AnnotationUpdate },
    DeleteClickArea { id: AnnotationId },
    Delete { id: AnnotationId },
    Clear,
    SetStartNumber { number: i64 },
    SetAutoIncrement { enabled: bool },
    SetExportOptions(ExportOptions),
    Export { format: ExportFormat },
}

impl SessionCore {
    /// Run one command to completion and return what the host must apply.
    pub fn dispatch(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::LoadSvg { content, file_name } => self.load_svg(content, file_name.as_deref()),
            Command::ImportAnnotations { content } => self.import_annotations(&content),
            Command::SetMode { mode } => self.set_mode(mode),
            Command::Click { x, y } => self.on_click(Point::new(x, y)),
            Command::PointerDown { x, y } => self.on_pointer_down(Point::new(x, y)),
            Command::PointerMove { x, y } => self.on_pointer_move(Point::new(x, y)),
            Command::PointerUp { x, y } => self.on_pointer_up(Point::new(x, y)),
            Command::Wheel(delta) => self.on_wheel(delta),
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::ResetZoom => self.reset_zoom(),
            Command::Pan { dx, dy } => self.pan_by(dx, dy),
            Command::Select { id } => self.select(&id),
            Command::Deselect => self.deselect(),
            Command::EditAnnotation { id } => self.edit_annotation(&id),
            Command::Update { id, update } => self.update(&id, update),
            Command::DeleteClickArea { id } => self.delete_click_area(&id),
            Command::Delete { id } => self.delete(&id),
            Command::Clear => self.clear(),
            Command::SetStartNumber { number } => self.set_start_number(number),
            Command::SetAutoIncrement { enabled } => self.set_auto_increment(enabled),
            Command::SetExportOptions(options) => self.set_export_options(options),
            Command::Export { format } => self.export(format),
        }
    }
}
