//! I/O ports: where save files come from and where exports go.
//!
//! The library never touches the filesystem directly. Import reads through a
//! [`TextSource`], export writes through a [`TextSink`], and the host decides
//! what those are: the CLI uses [`FsSource`] and [`DirSink`], tests use
//! in-memory captures.

use crate::error::BondError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the text of a save file.
pub trait TextSource {
    /// Read the whole text behind `handle`.
    fn read_text(&self, handle: &Path) -> Result<String, BondError>;
}

/// Receives an exported document.
pub trait TextSink {
    /// Store `text` under `name`, returning where it ended up.
    fn write_text(&self, name: &str, text: &str) -> Result<PathBuf, BondError>;
}

/// Reads save files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl TextSource for FsSource {
    fn read_text(&self, handle: &Path) -> Result<String, BondError> {
        let path = handle.to_path_buf();
        let bytes = std::fs::read(handle).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BondError::FileNotFound { path: path.clone() },
            std::io::ErrorKind::PermissionDenied => {
                BondError::PermissionDenied { path: path.clone() }
            }
            _ => BondError::ReadFailed {
                path: path.clone(),
                source: e,
            },
        })?;
        let mut text = String::from_utf8(bytes).map_err(|_| BondError::NotUtf8 { path })?;
        // Editors on Windows like to prepend a BOM; JSON parsers do not.
        if text.starts_with('\u{FEFF}') {
            text.remove(0);
        }
        debug!("Read {} bytes from {}", text.len(), handle.display());
        Ok(text)
    }
}

/// Writes exports into a directory, atomically.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TextSink for DirSink {
    /// Atomic write: a temp file in the destination directory, then rename.
    fn write_text(&self, name: &str, text: &str) -> Result<PathBuf, BondError> {
        validate_file_name(name)?;
        let path = self.dir.join(name);
        let write_failed = |source: std::io::Error| BondError::OutputWriteFailed {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_failed)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_failed)?;
        tmp.write_all(text.as_bytes()).map_err(write_failed)?;
        tmp.flush().map_err(write_failed)?;
        tmp.persist(&path).map_err(|e| write_failed(e.error))?;

        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(path)
    }
}

/// The final path component of `path`, used as the export name.
pub fn file_name_of(path: &Path) -> Result<String, BondError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| BondError::InvalidFileName {
            name: path.display().to_string(),
        })
}

fn validate_file_name(name: &str) -> Result<(), BondError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(BondError::InvalidFileName {
            name: name.to_string(),
        });
    }
    Ok(())
}
