//! Viewer state: which board, side and language is shown, and the interface
//! data loaded for it.
//!
//! The viewer page renders the board SVG itself and binds clicks on
//! `#click-layer rect[data-id]`; this module owns everything it decides
//! about what to show. Data files live at `data/{lang}/{board}.json`; when
//! the file for the current language cannot be loaded the English one is
//! used instead.

#[cfg(test)]
#[path = "viewer_test.rs"]
mod viewer_test;

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::interfaces::{BACK_RANGE, FRONT_RANGE, InterfaceEntry, InterfacesFile, SpecField};

// =============================================================================
// CATALOG
// =============================================================================

/// A supported board and its diagram files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Board {
    pub id: &'static str,
    pub name: &'static str,
    pub svg_front: &'static str,
    pub svg_back: &'static str,
}

pub static BOARDS: [Board; 5] = [
    Board {
        id: "rock5b",
        name: "ROCK 5B+",
        svg_front: "boards/rock5b/rock5b-plus.svg",
        svg_back: "boards/rock5b/rock5b-plus-back.svg",
    },
    Board {
        id: "rock5t",
        name: "ROCK 5T",
        svg_front: "boards/rock5t/rock5t-v.svg",
        svg_back: "boards/rock5t/rock5t-v-back.svg",
    },
    Board {
        id: "rpi4b",
        name: "Raspberry Pi 4B",
        svg_front: "boards/rpi4b/rpi4b.svg",
        svg_back: "boards/rpi4b/rpi4b-back.svg",
    },
    Board { id: "a7s", name: "A7S", svg_front: "boards/a7s/a7s-v.svg", svg_back: "boards/a7s/a7s-back-v.svg" },
    Board { id: "a7a", name: "A7A", svg_front: "boards/a7a/a7a-iv.svg", svg_back: "boards/a7a/a7a-v.svg" },
];

pub const DEFAULT_BOARD: &str = "rock5t";

/// Find a board by id.
#[must_use]
pub fn board(id: &str) -> Option<&'static Board> {
    BOARDS.iter().find(|b| b.id == id)
}

fn default_board() -> &'static Board {
    &BOARDS[1]
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("unknown board: {0}")]
    UnknownBoard(String),
    #[error("unknown language: {0} (expected zh or en)")]
    UnknownLang(String),
    #[error("unknown side: {0} (expected front or back)")]
    UnknownSide(String),
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },
    #[error("invalid interface data in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// LANGUAGE / SIDE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Zh,
    En,
}

impl Lang {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Value for the document's `lang` attribute.
    #[must_use]
    pub fn html_lang(self) -> &'static str {
        match self {
            Self::Zh => "zh-CN",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Zh => "SBC 接口查看器",
            Self::En => "SBC Interface Viewer",
        }
    }

    /// Legend name for an entry that has none.
    #[must_use]
    pub fn interface_label(self, number: u32) -> String {
        match self {
            Self::Zh => format!("接口 {number}"),
            Self::En => format!("Interface {number}"),
        }
    }

    #[must_use]
    pub fn spec_label(self, field: SpecField) -> &'static str {
        if self == Self::En {
            return field.label();
        }
        match field {
            SpecField::Voltage => "电压",
            SpecField::Type => "类型",
            SpecField::Speed => "速度",
            SpecField::Capacity => "容量",
            SpecField::MaxResolution => "最大分辨率",
            SpecField::Compatibility => "兼容性",
            SpecField::Interface => "接口",
            SpecField::Power => "电源",
            SpecField::Function => "功能",
            SpecField::Frequency => "频率",
            SpecField::Count => "数量",
        }
    }
}

impl FromStr for Lang {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Self::Zh),
            "en" => Ok(Self::En),
            other => Err(ViewerError::UnknownLang(other.to_owned())),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Interface numbers shown on this side.
    #[must_use]
    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            Self::Front => FRONT_RANGE,
            Self::Back => BACK_RANGE,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl FromStr for Side {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            other => Err(ViewerError::UnknownSide(other.to_owned())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DATA SOURCE
// =============================================================================

/// Where interface data files come from: `fetch` in the browser, the
/// filesystem in the CLI.
pub trait InterfaceSource {
    /// Return the raw text of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Load`] if the file cannot be read.
    fn read(&self, path: &str) -> Result<String, ViewerError>;
}

fn load_file(source: &impl InterfaceSource, path: &str) -> Result<InterfacesFile, ViewerError> {
    let text = source.read(path)?;
    InterfacesFile::from_json(&text).map_err(|source| ViewerError::Parse { path: path.to_owned(), source })
}

// =============================================================================
// STATE
// =============================================================================

/// One row of the legend beside the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendItem {
    pub number: u32,
    pub name: String,
}

/// The info panel for a clicked interface, with labels in the current language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDetails {
    pub number: u32,
    pub name: String,
    pub description: String,
    pub details: String,
    pub specs: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    pub board: &'static Board,
    pub lang: Lang,
    pub side: Side,
    interfaces: Option<InterfacesFile>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self { board: default_board(), lang: Lang::default(), side: Side::default(), interfaces: None }
    }
}

impl ViewerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from a query string such as `?sbc=rpi4b&lang=en&side=back`.
    /// Unknown or missing values keep their defaults.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "sbc" => {
                    if let Some(found) = board(value) {
                        state.board = found;
                    }
                }
                "lang" => {
                    if let Ok(lang) = value.parse() {
                        state.lang = lang;
                    }
                }
                "side" => {
                    if let Ok(side) = value.parse() {
                        state.side = side;
                    }
                }
                _ => {}
            }
        }
        state
    }

    /// The query string that reproduces this state.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("sbc={}&lang={}&side={}", self.board.id, self.lang, self.side)
    }

    /// Switch boards. The new board is shown front side up and its data must
    /// be loaded again.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownBoard`] if `id` is not in the catalog.
    pub fn select_board(&mut self, id: &str) -> Result<(), ViewerError> {
        let found = board(id).ok_or_else(|| ViewerError::UnknownBoard(id.to_owned()))?;
        self.board = found;
        self.side = Side::Front;
        self.interfaces = None;
        Ok(())
    }

    /// Turn the board over. Loaded data stays valid since both sides share
    /// one file.
    pub fn flip(&mut self) {
        self.side = self.side.flipped();
    }

    /// Change language. Returns `false` if it was already current; otherwise
    /// the data must be reloaded.
    pub fn set_lang(&mut self, lang: Lang) -> bool {
        if self.lang == lang {
            return false;
        }
        self.lang = lang;
        self.interfaces = None;
        true
    }

    /// Diagram for the current side.
    #[must_use]
    pub fn svg_path(&self) -> &'static str {
        match self.side {
            Side::Front => self.board.svg_front,
            Side::Back => self.board.svg_back,
        }
    }

    /// Data file for the current board in `lang`.
    #[must_use]
    pub fn data_path(&self, lang: Lang) -> String {
        format!("data/{lang}/{}.json", self.board.id)
    }

    /// Load interface data, falling back to English. Returns the language
    /// actually loaded.
    ///
    /// # Errors
    ///
    /// Returns the English load error if the fallback fails too, or the
    /// first error when the current language is already English.
    pub fn load(&mut self, source: &impl InterfaceSource) -> Result<Lang, ViewerError> {
        let path = self.data_path(self.lang);
        let loaded = match load_file(source, &path) {
            Ok(file) => (file, self.lang),
            Err(err) if self.lang != Lang::En => {
                warn!(error = %err, "interface data unavailable, falling back to English");
                (load_file(source, &self.data_path(Lang::En))?, Lang::En)
            }
            Err(err) => return Err(err),
        };
        debug!(board = self.board.id, lang = %loaded.1, count = loaded.0.interfaces.len(), "interfaces loaded");
        self.interfaces = Some(loaded.0);
        Ok(loaded.1)
    }

    /// Use already-parsed data (e.g. a fresh structured-data export).
    pub fn set_interfaces(&mut self, file: InterfacesFile) {
        self.interfaces = Some(file);
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.interfaces.is_some()
    }

    /// Legend rows for the current side, ascending by number.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendItem> {
        let Some(file) = &self.interfaces else {
            return Vec::new();
        };
        file.in_range(self.side.range())
            .map(|(number, entry)| LegendItem {
                number,
                name: if entry.name.is_empty() { self.lang.interface_label(number) } else { entry.name.clone() },
            })
            .collect()
    }

    /// Entry for a clicked rect's `data-id`.
    #[must_use]
    pub fn lookup(&self, data_id: &str) -> Option<&InterfaceEntry> {
        self.interfaces.as_ref()?.lookup(data_id)
    }

    /// Info panel contents for a clicked rect's `data-id`.
    #[must_use]
    pub fn details(&self, data_id: &str) -> Option<InterfaceDetails> {
        let entry = self.lookup(data_id)?;
        let number = data_id.trim().parse().unwrap_or_default();
        Some(InterfaceDetails {
            number,
            name: entry.name.clone(),
            description: entry.description.clone(),
            details: entry.details.clone(),
            specs: entry
                .spec_items()
                .into_iter()
                .map(|(field, value)| (self.lang.spec_label(field), value.to_owned()))
                .collect(),
        })
    }
}
