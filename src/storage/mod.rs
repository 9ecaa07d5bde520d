// SPDX-License-Identifier: MIT
//! Durable single-record storage.
//!
//! Each key maps to one JSON file under the data directory
//! (`<data_dir>/<key>.json`) holding one serialized record. Used for the
//! persisted auth session; everything else in the client is memory-only.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed record store rooted at the client data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load the record stored under `key`. Returns `None` when the file is
    /// missing or unreadable; a corrupt record resets to defaults rather
    /// than failing startup.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable record");
                None
            }
        }
    }

    /// Persist `value` under `key`, replacing any previous record.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(key, error = %e, "could not create data directory");
            return;
        }
        let path = self.path_for(key);
        match serde_json::to_string_pretty(value) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    warn!(key, error = %e, "could not persist record");
                }
            }
            Err(e) => warn!(key, error = %e, "could not serialize record"),
        }
    }

    /// Delete the record under `key`. Missing file is a no-op.
    pub fn delete(&self, key: &str) {
        let path = self.path_for(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!(key, error = %e, "could not delete record");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let record = Sample {
            name: "x".into(),
            count: 3,
        };
        store.save("sample", &record);
        assert_eq!(store.load::<Sample>("sample"), Some(record));
    }

    #[test]
    fn load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        assert_eq!(store.load::<Sample>("absent"), None);
    }

    #[test]
    fn corrupt_record_resets_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        assert_eq!(store.load::<Sample>("bad"), None);
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.save(
            "gone",
            &Sample {
                name: "g".into(),
                count: 1,
            },
        );
        store.delete("gone");
        store.delete("gone");
        assert_eq!(store.load::<Sample>("gone"), None);
    }
}
