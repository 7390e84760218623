//! CLI command implementations.

pub mod index;
pub mod inspect;
pub mod polish;

use entindex_core::Batch;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors reading or writing batch files.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid batch.
    #[error("{path}: invalid batch: {source}")]
    Json {
        /// File involved.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Reads a JSON batch file.
pub fn read_batch(path: &Path) -> Result<Batch, FileError> {
    let text = fs::read_to_string(path).map_err(|source| FileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| FileError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Writes a batch as pretty-printed JSON, creating parent directories.
pub fn write_batch(path: &Path, batch: &Batch) -> Result<(), FileError> {
    let io_err = |source| FileError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = serde_json::to_string_pretty(batch).map_err(|source| FileError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, text).map_err(io_err)
}
