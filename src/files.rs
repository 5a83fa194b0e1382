//! Filesystem side of the CLI: reading inputs, command scripts, and writing
//! exports.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use annotator::command::Command;
use annotator::export::ExportFile;
use annotator::viewer::{InterfaceSource, ViewerError};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{line}: invalid command: {source}")]
    Script {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub fn read_text(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path).map_err(|source| FileError::Read { path: path.to_owned(), source })
}

/// The file name component, used to name exports after the upload.
#[must_use]
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Parse a command script: one JSON command per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_script(path: &Path, text: &str) -> Result<Vec<Command>, FileError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| FileError::Script {
                path: path.to_owned(),
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Write an export into `dir`, creating the directory if needed.
pub fn write_export(dir: &Path, file: &ExportFile) -> Result<PathBuf, FileError> {
    fs::create_dir_all(dir).map_err(|source| FileError::Write { path: dir.to_owned(), source })?;
    let path = dir.join(&file.file_name);
    fs::write(&path, &file.content).map_err(|source| FileError::Write { path: path.clone(), source })?;
    info!(path = %path.display(), bytes = file.content.len(), "export written");
    Ok(path)
}

/// Viewer data files under a local directory laid out like the site:
/// `{root}/data/{lang}/{board}.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    pub root: PathBuf,
}

impl InterfaceSource for DirSource {
    fn read(&self, path: &str) -> Result<String, ViewerError> {
        let full = self.root.join(path);
        fs::read_to_string(&full)
            .map_err(|err| ViewerError::Load { path: full.display().to_string(), message: err.to_string() })
    }
}

#[cfg(test)]
#[path = "files_test.rs"]
mod tests;
