//! File-backed durable storage for the session record.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go through a temporary file
//! and a rename, so a crash mid-write leaves either the old record or the
//! new one, never a torn file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use storefront_auth::{SessionStorage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under `{app_data_dir}/storefront`.
    pub fn in_default_dir() -> Result<Self, StorageError> {
        Ok(Self::new(default_data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            // Binary junk in the file is malformed data, not an I/O failure.
            Err(err) if err.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// `{app_data_dir}/storefront`, falling back to `~/.local/share/storefront`.
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StorageError::Backend(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share"
                    .to_string(),
            )
        })?;

    Ok(base.join("storefront"))
}
