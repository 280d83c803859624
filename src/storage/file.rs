//! File-backed durable store.
//!
//! Every cache id maps to one JSON file inside the store directory. Writes go
//! to a temporary sibling first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DurableStore, StorageError};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the payload file for `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_id(id)))
    }
}

/// Escapes every byte outside `[A-Za-z0-9_-]` as `%XX` so ids map to distinct file names.
fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn io_error(id: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        id: id.to_string(),
        source,
    }
}

impl DurableStore for FileStore {
    fn read(&self, id: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(id, e)),
        }
    }

    fn write(&self, id: &str, payload: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(id, e))?;

        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(|e| io_error(id, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(id, e))?;

        debug!("Persisted {} bytes to {}", payload.len(), path.display());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(id, e)),
        }
    }
}
