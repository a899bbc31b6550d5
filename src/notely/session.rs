//! # Session Store
//!
//! Holds the signed-in identity and mirrors it to durable storage.
//!
//! The in-memory state is an `Option<Session>`, so a token without a profile
//! (or the reverse) cannot be represented. On disk the two halves live under
//! separate keys and are always written and removed together. Only
//! [`SessionStore::establish`] and [`SessionStore::clear`] change whether a
//! session exists; storage is written first and memory only follows a
//! successful write.

use crate::error::{NotelyError, Result};
use crate::model::{Session, UserProfile};
use crate::storage::KeyValueStore;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "userToken";
pub const USER_KEY: &str = "userData";

pub struct SessionStore<S: KeyValueStore> {
    storage: S,
    current: Option<Session>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// A store with no session. Call [`restore`](Self::restore) to pick up a
    /// persisted one.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Loads the persisted session. Anything short of a complete, parseable
    /// pair wipes both keys and leaves the store signed out.
    ///
    /// Returns whether a session was restored.
    pub fn restore(&mut self) -> Result<bool> {
        self.current = None;

        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;

        match (token, user) {
            (None, None) => Ok(false),
            (Some(token), Some(raw_user)) if !token.trim().is_empty() => {
                match serde_json::from_str::<UserProfile>(&raw_user) {
                    Ok(user) if user.is_well_formed() => {
                        debug!(email = %user.email, "restored session");
                        self.current = Some(Session { token, user });
                        Ok(true)
                    }
                    Ok(_) => {
                        warn!("stored profile is incomplete, clearing session");
                        self.wipe_storage()?;
                        Ok(false)
                    }
                    Err(err) => {
                        warn!(error = %err, "stored profile is unreadable, clearing session");
                        self.wipe_storage()?;
                        Ok(false)
                    }
                }
            }
            _ => {
                warn!("stored session is incomplete, clearing session");
                self.wipe_storage()?;
                Ok(false)
            }
        }
    }

    /// Starts a session after a successful login or signup exchange.
    pub fn establish(&mut self, token: impl Into<String>, user: UserProfile) -> Result<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(NotelyError::Session("token is empty".to_string()));
        }
        if !user.is_well_formed() {
            return Err(NotelyError::Session("profile is incomplete".to_string()));
        }

        let raw_user = serde_json::to_string(&user).map_err(NotelyError::Serialization)?;
        self.storage
            .set_all(&[(TOKEN_KEY, token.as_str()), (USER_KEY, raw_user.as_str())])?;

        debug!(email = %user.email, "session established");
        self.current = Some(Session { token, user });
        Ok(())
    }

    /// Replaces the profile half of an existing session.
    ///
    /// Without a session, or with an incomplete profile, nothing changes and
    /// `false` is returned.
    pub fn update(&mut self, user: UserProfile) -> Result<bool> {
        if self.current.is_none() || !user.is_well_formed() {
            debug!("ignoring profile update");
            return Ok(false);
        }

        let raw_user = serde_json::to_string(&user).map_err(NotelyError::Serialization)?;
        self.storage.set(USER_KEY, &raw_user)?;

        if let Some(session) = self.current.as_mut() {
            session.user = user;
        }
        Ok(true)
    }

    /// Signs out: both halves leave memory and storage.
    pub fn clear(&mut self) -> Result<()> {
        self.wipe_storage()?;
        self.current = None;
        debug!("session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn wipe_storage(&mut self) -> Result<()> {
        self.storage.remove_all(&[TOKEN_KEY, USER_KEY])
    }
}
