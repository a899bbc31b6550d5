//! # Storage Layer
//!
//! Durable key-value storage for the session. The [`KeyValueStore`] trait is
//! the only thing the session store knows about persistence.
//!
//! ## Implementations
//!
//! - [`fs::FileStorage`]: Production storage, a single JSON object on disk
//!   - All keys live in one file (`session.json`)
//!   - Every write replaces the whole file through a temp file + rename, so a
//!     multi-key write is observed either entirely or not at all
//!
//! - [`memory::MemoryStorage`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate write failures
//!
//! ## Keys
//!
//! ```text
//! userToken  -> opaque token string
//! userData   -> JSON-encoded UserProfile
//! ```

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for durable string storage.
pub trait KeyValueStore {
    /// Read a value; `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries in one step.
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys in one step. Absent keys are not an error.
    fn remove_all(&mut self, keys: &[&str]) -> Result<()>;

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_all(&[(key, value)])
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_all(&[key])
    }
}
