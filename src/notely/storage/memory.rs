use super::KeyValueStore;
use crate::error::{NotelyError, Result};
use std::collections::BTreeMap;

/// In-memory storage for testing.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    simulate_write_error: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with raw entries, bypassing any session logic.
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let mut storage = Self::new();
        for (key, value) in entries {
            storage
                .entries
                .insert((*key).to_string(), (*value).to_string());
        }
        storage
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(NotelyError::Storage("simulated write error".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        self.check_writable()?;
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<()> {
        self.check_writable()?;
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}
