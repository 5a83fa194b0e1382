//! Structured-data schema shared by the exporter and the viewer.
//!
//! The file is `{"interfaces": {"<number>": {...}}}`. Keys are annotation
//! numbers rendered as strings; numbers 1-100 describe the front of a board and
//! 101-199 the back.

#[cfg(test)]
#[path = "interfaces_test.rs"]
mod interfaces_test;

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Numbers shown when the front of a board is displayed.
pub const FRONT_RANGE: RangeInclusive<u32> = 1..=100;
/// Numbers shown when the back of a board is displayed.
pub const BACK_RANGE: RangeInclusive<u32> = 101..=199;

/// Details for one interface on a board.
///
/// The editor only ever writes `name`, `description`, `details` and the three
/// passthrough fields; hand-maintained data files use the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,
}

/// Optional hardware fields of an [`InterfaceEntry`], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecField {
    Voltage,
    Type,
    Speed,
    Capacity,
    MaxResolution,
    Compatibility,
    Interface,
    Power,
    Function,
    Frequency,
    Count,
}

impl SpecField {
    /// English display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Voltage => "Voltage",
            Self::Type => "Type",
            Self::Speed => "Speed",
            Self::Capacity => "Capacity",
            Self::MaxResolution => "Max resolution",
            Self::Compatibility => "Compatibility",
            Self::Interface => "Interface",
            Self::Power => "Power",
            Self::Function => "Function",
            Self::Frequency => "Frequency",
            Self::Count => "Count",
        }
    }
}

impl InterfaceEntry {
    /// Hardware values that are present, in display order.
    #[must_use]
    pub fn spec_items(&self) -> Vec<(SpecField, &str)> {
        [
            (SpecField::Voltage, &self.voltage),
            (SpecField::Type, &self.kind),
            (SpecField::Speed, &self.speed),
            (SpecField::Capacity, &self.capacity),
            (SpecField::MaxResolution, &self.max_resolution),
            (SpecField::Compatibility, &self.compatibility),
            (SpecField::Interface, &self.interface),
            (SpecField::Power, &self.power),
            (SpecField::Function, &self.function),
            (SpecField::Frequency, &self.frequency),
            (SpecField::Count, &self.count),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().filter(|v| !v.is_empty()).map(|v| (field, v)))
        .collect()
    }
}

/// A board's interface data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfacesFile {
    /// Entries keyed by annotation number, serialized as string keys.
    pub interfaces: BTreeMap<u32, InterfaceEntry>,
}

impl InterfacesFile {
    /// Parse a data file.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is not a valid interfaces file.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty-printed JSON, two-space indented.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up an entry by the `data-id` string of a clicked rectangle.
    #[must_use]
    pub fn lookup(&self, data_id: &str) -> Option<&InterfaceEntry> {
        let Ok(number) = data_id.trim().parse::<u32>() else {
            return None;
        };
        self.interfaces.get(&number)
    }

    /// Entries whose numbers fall in `range`, ascending.
    pub fn in_range(&self, range: RangeInclusive<u32>) -> impl Iterator<Item = (u32, &InterfaceEntry)> {
        self.interfaces.range(range).map(|(number, entry)| (*number, entry))
    }
}
