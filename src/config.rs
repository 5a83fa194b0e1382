//! CLI configuration parsed from environment variables.

use std::path::PathBuf;

use annotator::consts::MAX_START_NUMBER;
use annotator::export::ExportOptions;

pub const DEFAULT_OUT_DIR: &str = ".";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
    #[error("{key} must be a number between 1 and 999, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub out_dir: PathBuf,
    pub export: ExportOptions,
    pub start_number: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self { out_dir: PathBuf::from(DEFAULT_OUT_DIR), export: ExportOptions::default(), start_number: None }
    }
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `BOARDMARK_OUT_DIR`: where exports are written (default `.`)
    /// - `BOARDMARK_INCLUDE_NUMBERS`: visible export number layer (default true)
    /// - `BOARDMARK_INCLUDE_CLICK_LAYER`: visible export click layer (default true)
    /// - `BOARDMARK_START_NUMBER`: first annotation number, 1-999
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let out_dir = var("BOARDMARK_OUT_DIR").filter(|v| !v.is_empty()).map_or(defaults.out_dir, PathBuf::from);
        let export = ExportOptions {
            include_numbers: parse_bool("BOARDMARK_INCLUDE_NUMBERS", var("BOARDMARK_INCLUDE_NUMBERS"), true)?,
            include_click_layer: parse_bool(
                "BOARDMARK_INCLUDE_CLICK_LAYER",
                var("BOARDMARK_INCLUDE_CLICK_LAYER"),
                true,
            )?,
        };
        let start_number = parse_start_number("BOARDMARK_START_NUMBER", var("BOARDMARK_START_NUMBER"))?;
        Ok(Self { out_dir, export, start_number })
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value: raw }),
    }
}

fn parse_start_number(key: &'static str, raw: Option<String>) -> Result<Option<u32>, ConfigError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_START_NUMBER).contains(&n) => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
