//! Atomic JSON persistence for the learning and vocabulary files.
//!
//! Writes go to a temp file in the destination directory and are renamed into
//! place, so a crash mid-write leaves the previous file intact.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{StorageError, StorageResult};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

/// Serializes `value` as pretty JSON and atomically replaces `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|source| StorageError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    let temp_file = NamedTempFile::new_in(parent).map_err(|source| StorageError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| {
            StorageError::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;
        writer.flush().map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    temp_file
        .as_file()
        .sync_all()
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .persist(path)
        .map_err(|e| StorageError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;
    Ok(())
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<T> {
    if !path.exists() {
        return Err(StorageError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_json`], but a missing file yields `Ok(None)`.
pub fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    match read_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
