use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::models::StatusRecord;

/// One JSON file per bug, named `<id>.json`.
pub struct StatusStore {
    root: PathBuf,
}

impl StatusStore {
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create status directory {}", root.display()))?;
        Ok(StatusStore {
            root: root.to_path_buf(),
        })
    }

    pub fn path_for(&self, bug_id: u64) -> PathBuf {
        self.root.join(format!("{}.json", bug_id))
    }

    /// Returns the empty record when the bug has never been saved.
    pub fn load(&self, bug_id: u64) -> Result<StatusRecord> {
        let path = self.path_for(bug_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(bug_id, "no status record");
                return Ok(StatusRecord::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid status record {}", path.display()))
    }

    /// Replace the record for a bug. The new file is renamed into place.
    pub fn save(&self, bug_id: u64, action: &str, last_change_time: &str) -> Result<()> {
        let record = StatusRecord {
            action: Some(action.to_string()),
            last_change_time: Some(last_change_time.to_string()),
        };
        let mut json = serde_json::to_string_pretty(&record)?;
        json.push('\n');

        let path = self.path_for(bug_id);
        let mut tmp = NamedTempFile::new_in(&self.root)
            .with_context(|| format!("Failed to create temp file in {}", self.root.display()))?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(bug_id, last_change_time, "saved status record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn setup_test_store() -> (StatusStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = StatusStore::open(&dir.path().join("status")).unwrap();
        (store, dir)
    }

    const MAY: &str = "2018-05-01T10:00:00Z";
    const JUNE: &str = "2018-06-01T10:00:00Z";

    // ==================== Unit Tests ====================

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("status");
        StatusStore::open(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (store, _dir) = setup_test_store();
        let record = store.load(12345).unwrap();
        assert_eq!(record, StatusRecord::default());
    }

    #[test]
    fn test_save_then_load() {
        let (store, _dir) = setup_test_store();
        store.save(111, "ping dev", MAY).unwrap();

        let record = store.load(111).unwrap();
        assert_eq!(record.action.as_deref(), Some("ping dev"));
        assert_eq!(record.last_change_time.as_deref(), Some(MAY));
    }

    #[test]
    fn test_save_writes_two_key_json() {
        let (store, _dir) = setup_test_store();
        store.save(7, "wait", MAY).unwrap();

        let contents = fs::read_to_string(store.path_for(7)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["action"], "wait");
        assert_eq!(map["last_change_time"], MAY);
    }

    #[test]
    fn test_save_overwrites() {
        let (store, _dir) = setup_test_store();
        store.save(111, "old", MAY).unwrap();
        store.save(111, "new", JUNE).unwrap();

        let record = store.load(111).unwrap();
        assert_eq!(record.action.as_deref(), Some("new"));
        assert_eq!(record.last_change_time.as_deref(), Some(JUNE));
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (store, dir) = setup_test_store();
        store.save(1, "a", "t").unwrap();
        store.save(2, "b", "t").unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path().join("status"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["1.json", "2.json"]);
    }

    #[test]
    fn test_load_corrupt_record_fails() {
        let (store, _dir) = setup_test_store();
        fs::write(store.path_for(9), "not json").unwrap();

        let err = store.load(9).unwrap_err();
        assert!(err.to_string().contains("Invalid status record"));
    }

    #[test]
    fn test_load_other_io_error_fails() {
        let (store, _dir) = setup_test_store();
        // A directory where the file should be cannot be read as a string.
        fs::create_dir(store.path_for(10)).unwrap();

        assert!(store.load(10).is_err());
    }

    // ==================== Property-Based Tests ====================

    proptest! {
        #[test]
        fn prop_save_load_preserves_action(
            bug_id in 1u64..10_000_000,
            action in "[a-zA-Z0-9 .,:'-]{0,80}"
        ) {
            let (store, _dir) = setup_test_store();
            store.save(bug_id, &action, MAY).unwrap();

            let record = store.load(bug_id).unwrap();
            prop_assert_eq!(record.action, Some(action));
        }
    }
}
