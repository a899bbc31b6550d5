use super::KeyValueStore;
use crate::error::{NotelyError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const SESSION_FILENAME: &str = "session.json";

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage at `<dir>/session.json`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(SESSION_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(NotelyError::Io)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                // An unreadable file holds nothing usable; callers see empty storage.
                warn!(path = %self.path.display(), error = %err, "discarding unreadable storage file");
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| NotelyError::Storage("storage path has no parent".to_string()))?;
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(NotelyError::Io)?;
        }

        let content = serde_json::to_string_pretty(entries).map_err(NotelyError::Serialization)?;
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, content.as_bytes()).map_err(NotelyError::Io)?;
        fs::rename(&tmp, &self.path).map_err(NotelyError::Io)?;
        Ok(())
    }
}

/// The file holds a bearer token, so only the owner may read it.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()?;
    #[cfg(unix)]
    {
        // mode() only applies on creation; a stale temp file keeps its old bits
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let mut stored = self.load()?;
        for (key, value) in entries {
            stored.insert((*key).to_string(), (*value).to_string());
        }
        self.save(&stored)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut stored = self.load()?;
        for key in keys {
            stored.remove(*key);
        }
        self.save(&stored)
    }
}
