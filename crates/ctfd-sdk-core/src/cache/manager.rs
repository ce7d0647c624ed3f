use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CacheDocument, EntityKind, IdRecord, UserRecord};

pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, source: std::io::Error) -> Error {
        Error::Storage {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the whole document, creating an empty one on first access.
    pub fn load(&self) -> Result<CacheDocument> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Initializing empty storage");
            let empty = CacheDocument::default();
            self.save(&empty)?;
            return Ok(empty);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the stored document. The new contents are written to a sibling
    /// file first and renamed into place.
    pub fn save(&self, document: &CacheDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }

        let contents = serde_json::to_string_pretty(document)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, contents).map_err(|e| self.storage_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.storage_error(e))?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("ctfd_storage.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load, apply `f`, save.
    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut CacheDocument) -> Result<()>,
    {
        let mut document = self.load()?;
        f(&mut document)?;
        self.save(&document)
    }

    pub fn get(&self, kind: EntityKind, name: &str) -> Result<IdRecord> {
        self.load()?
            .get(kind, name)
            .ok_or_else(|| not_found(kind, name))
    }

    pub fn get_user(&self, name: &str) -> Result<UserRecord> {
        self.load()?
            .users
            .get(name)
            .copied()
            .ok_or_else(|| not_found(EntityKind::Users, name))
    }

    /// Presence check. An unreadable store counts as "absent".
    pub fn exists(&self, kind: EntityKind, name: &str) -> bool {
        match self.load() {
            Ok(document) => document.contains(kind, name),
            Err(e) => {
                debug!(
                    kind = %kind,
                    name = name,
                    error = %e,
                    "Failed to load storage for presence check"
                );
                false
            }
        }
    }

    /// Remember the id CTFd assigned to a newly created entity.
    pub fn record(&self, kind: EntityKind, name: &str, id: i64) -> Result<()> {
        debug!(kind = %kind, name = name, id = id, "Recording entity");
        self.update(|document| {
            document.insert(kind, name, id);
            Ok(())
        })
    }

    pub fn set_team(&self, user: &str, team_id: Option<i64>) -> Result<()> {
        self.update(|document| {
            let record = document
                .users
                .get_mut(user)
                .ok_or_else(|| not_found(EntityKind::Users, user))?;
            record.team_id = team_id;
            Ok(())
        })
    }

    pub fn remove(&self, kind: EntityKind, name: &str) -> Result<()> {
        debug!(kind = %kind, name = name, "Removing entity");
        self.update(|document| {
            if document.remove(kind, name) {
                Ok(())
            } else {
                Err(not_found(kind, name))
            }
        })
    }

    /// Remove a team and clear `team_id` on the users that were in it.
    pub fn remove_team(&self, name: &str) -> Result<()> {
        debug!(team = name, "Removing team");
        self.update(|document| {
            if document.remove_team(name) {
                Ok(())
            } else {
                Err(not_found(EntityKind::Teams, name))
            }
        })
    }
}

fn not_found(kind: EntityKind, name: &str) -> Error {
    Error::NotFound {
        kind,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> CacheStore {
        CacheStore::new(dir.path().join("nested").join("ctfd_storage.json"))
    }

    #[test]
    fn test_load_initializes_document() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(!store.path().exists());

        let document = store.load().unwrap();
        assert!(document.is_empty());

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            serde_json::json!({"users": {}, "teams": {}, "challenges": {}, "flags": {}})
        );
    }

    #[test]
    fn test_record_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.record(EntityKind::Challenges, "warmup", 12).unwrap();
        assert!(store.exists(EntityKind::Challenges, "warmup"));
        assert_eq!(store.get(EntityKind::Challenges, "warmup").unwrap().id, 12);

        store.remove(EntityKind::Challenges, "warmup").unwrap();
        assert!(!store.exists(EntityKind::Challenges, "warmup"));
        assert!(store.get(EntityKind::Challenges, "warmup").unwrap_err().is_not_found());
    }

    #[test]
    fn test_user_team_tracking() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.record(EntityKind::Users, "alice", 7).unwrap();
        assert_eq!(store.get_user("alice").unwrap(), UserRecord { id: 7, team_id: None });

        store.set_team("alice", Some(3)).unwrap();
        assert_eq!(store.get_user("alice").unwrap().team_id, Some(3));

        store.set_team("alice", None).unwrap();
        assert_eq!(store.get_user("alice").unwrap().team_id, None);
    }

    #[test]
    fn test_remove_team_clears_memberships() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.record(EntityKind::Teams, "red", 3).unwrap();
        store.record(EntityKind::Users, "alice", 7).unwrap();
        store.set_team("alice", Some(3)).unwrap();

        store.remove_team("red").unwrap();
        assert!(!store.exists(EntityKind::Teams, "red"));
        assert_eq!(store.get_user("alice").unwrap().team_id, None);
        assert!(store.remove_team("red").unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_entries_are_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.get_user("ghost").unwrap_err().is_not_found());
        assert!(store.set_team("ghost", Some(1)).unwrap_err().is_not_found());
        assert!(store.remove(EntityKind::Flags, "ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_external_edits_are_observed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.load().unwrap();

        let edited = r#"{"users":{},"teams":{"blue":{"id":9}},"challenges":{},"flags":{}}"#;
        std::fs::write(store.path(), edited).unwrap();
        assert_eq!(store.get(EntityKind::Teams, "blue").unwrap().id, 9);
    }

    #[test]
    fn test_corrupt_store() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.load().unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.load(), Err(Error::Json(_))));
        assert!(!store.exists(EntityKind::Users, "alice"));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.record(EntityKind::Teams, "red", 3).unwrap();

        let entries: Vec<_> = std::fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("ctfd_storage.json")]);
    }
}
