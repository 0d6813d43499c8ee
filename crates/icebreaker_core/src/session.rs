//! crates/icebreaker_core/src/session.rs
//!
//! The session store: a single authenticated-user id kept in persistent
//! client storage. Its presence is the only authentication signal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::UserId;
use crate::ports::{PortError, PortResult, SessionStorage};

/// The storage key holding the authenticated user's id.
pub const SESSION_KEY: &str = "user_id";

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Returns the stored user id, treating an empty value as absent.
    pub fn session_user_id(&self) -> PortResult<Option<UserId>> {
        Ok(self
            .storage
            .get(SESSION_KEY)?
            .filter(|id| !id.trim().is_empty())
            .map(UserId::from))
    }

    pub fn set_session_user_id(&self, user_id: &UserId) -> PortResult<()> {
        self.storage.set(SESSION_KEY, user_id.as_str())
    }

    pub fn clear_session(&self) -> PortResult<()> {
        self.storage.remove(SESSION_KEY)
    }

    /// Existence, not validity: a stale id still counts until a call fails.
    pub fn is_authenticated(&self) -> PortResult<bool> {
        Ok(self.session_user_id()?.is_some())
    }
}

/// In-process storage; nothing survives the process.
#[derive(Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemorySessionStorage::new()))
    }

    #[test]
    fn set_then_check_is_authenticated() {
        let store = store();
        assert!(!store.is_authenticated().unwrap());

        store.set_session_user_id(&UserId::new("u-1")).unwrap();
        assert!(store.is_authenticated().unwrap());
        assert_eq!(store.session_user_id().unwrap(), Some(UserId::new("u-1")));
    }

    #[test]
    fn clear_makes_it_anonymous() {
        let store = store();
        store.set_session_user_id(&UserId::new("u-1")).unwrap();
        store.clear_session().unwrap();
        assert!(!store.is_authenticated().unwrap());
        assert_eq!(store.session_user_id().unwrap(), None);
    }

    #[test]
    fn blank_value_counts_as_absent() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage.set(SESSION_KEY, "  ").unwrap();
        let store = SessionStore::new(storage);
        assert!(!store.is_authenticated().unwrap());
    }
}
