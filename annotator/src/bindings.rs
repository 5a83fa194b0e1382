//! Browser-facing wrappers.
//!
//! Everything crosses the boundary as JSON strings so the page script stays a
//! thin event forwarder: it serializes a [`Command`], calls
//! [`Annotator::dispatch`], and applies each returned [`Action`].

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::command::Command;
use crate::engine::{Action, SessionCore};
use crate::interfaces::InterfacesFile;
use crate::viewer::{Lang, ViewerError, ViewerState};

fn to_json(value: &impl Serialize) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            warn!(error = %err, "failed to encode response");
            "null".to_owned()
        }
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// One editor session bound to a page.
#[wasm_bindgen]
#[derive(Default)]
pub struct Annotator {
    core: SessionCore,
}

#[wasm_bindgen]
impl Annotator {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one JSON-encoded command and return the resulting actions as a
    /// JSON array. Malformed commands produce a single notice.
    pub fn dispatch(&mut self, command: &str) -> String {
        let actions = match serde_json::from_str::<Command>(command) {
            Ok(command) => self.core.dispatch(command),
            Err(err) => {
                warn!(error = %err, "malformed command");
                vec![Action::Notice { message: format!("malformed command: {err}") }]
            }
        };
        to_json(&actions)
    }

    /// Annotations ordered by number, for the side list.
    #[wasm_bindgen(js_name = listJson)]
    #[must_use]
    pub fn list_json(&self) -> String {
        to_json(&self.core.list())
    }

    #[wasm_bindgen(js_name = modeHint)]
    #[must_use]
    pub fn mode_hint(&self) -> String {
        self.core.mode_hint()
    }

    #[wasm_bindgen(js_name = nextNumber)]
    #[must_use]
    pub fn next_number(&self) -> u32 {
        self.core.store.next_number()
    }
}

// =============================================================================
// VIEWER
// =============================================================================

/// Viewer page state. The page fetches data files itself and hands the text
/// to [`Viewer::set_data`].
#[wasm_bindgen]
#[derive(Default)]
pub struct Viewer {
    state: ViewerState,
}

#[wasm_bindgen]
impl Viewer {
    /// Start from the page's `location.search`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self { state: ViewerState::from_query(query) }
    }

    #[wasm_bindgen(js_name = toQuery)]
    #[must_use]
    pub fn to_query(&self) -> String {
        self.state.to_query()
    }

    /// # Errors
    ///
    /// Returns the message for an unknown board id.
    #[wasm_bindgen(js_name = selectBoard)]
    pub fn select_board(&mut self, id: &str) -> Result<(), String> {
        self.state.select_board(id).map_err(|err| err.to_string())
    }

    pub fn flip(&mut self) {
        self.state.flip();
    }

    /// Returns `true` if the language changed and data must be fetched again.
    ///
    /// # Errors
    ///
    /// Returns the message for a code other than `zh` or `en`.
    #[wasm_bindgen(js_name = setLang)]
    pub fn set_lang(&mut self, code: &str) -> Result<bool, String> {
        let lang = code.parse::<Lang>().map_err(|err: ViewerError| err.to_string())?;
        Ok(self.state.set_lang(lang))
    }

    #[wasm_bindgen(js_name = svgPath)]
    #[must_use]
    pub fn svg_path(&self) -> String {
        self.state.svg_path().to_owned()
    }

    /// Data file to fetch for the current language.
    #[wasm_bindgen(js_name = dataPath)]
    #[must_use]
    pub fn data_path(&self) -> String {
        self.state.data_path(self.state.lang)
    }

    /// English data file to try when [`Viewer::data_path`] fails, if the
    /// current language isn't English already.
    #[wasm_bindgen(js_name = fallbackPath)]
    #[must_use]
    pub fn fallback_path(&self) -> Option<String> {
        (self.state.lang != Lang::En).then(|| self.state.data_path(Lang::En))
    }

    /// # Errors
    ///
    /// Returns the parse error message if `text` is not an interfaces file.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, text: &str) -> Result<(), String> {
        let file = InterfacesFile::from_json(text).map_err(|err| err.to_string())?;
        self.state.set_interfaces(file);
        Ok(())
    }

    #[wasm_bindgen(js_name = legendJson)]
    #[must_use]
    pub fn legend_json(&self) -> String {
        to_json(&self.state.legend())
    }

    /// Info panel contents for a clicked rect's `data-id`, or `null`.
    #[wasm_bindgen(js_name = detailsJson)]
    #[must_use]
    pub fn details_json(&self, data_id: &str) -> String {
        to_json(&self.state.details(data_id))
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.state.lang.title().to_owned()
    }

    /// Value for `<html lang>` after a language change.
    #[wasm_bindgen(js_name = htmlLang)]
    #[must_use]
    pub fn html_lang(&self) -> String {
        self.state.lang.html_lang().to_owned()
    }
}
