//! Session state: bearer token and role, persisted across runs
//!
//! The handle is the single source of truth for "is the user logged in"
//! and is injected into both the gateway and the application. The token
//! and role are always written and cleared together. No client-side
//! expiry tracking: expiry is detected reactively through a 401, which
//! the gateway turns into a [`SessionEvent::Expired`] broadcast.

use serde::{Deserialize, Serialize};
use shared::models::Role;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// In-memory session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub username: Option<String>,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets token, role and username after a successful login.
    pub fn set_login(&mut self, token: String, role: Role, username: String) {
        self.token = Some(token);
        self.role = Some(role);
        self.username = Some(username);
    }

    /// Clears the session on logout or expiry.
    pub fn clear(&mut self) {
        self.token = None;
        self.role = None;
        self.username = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// File-backed session persistence (the durable storage of the client)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `data_dir`; the session lives in
    /// `data_dir/session.json`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let path = data_dir.into().join("session.json");
        Self { path }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Save session state to disk
    pub fn save(&self, data: &SessionData) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)
    }

    /// Load session state, if any was persisted
    pub fn load(&self) -> Option<SessionData> {
        if !self.path.exists() {
            return None;
        }
        let json = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Remove the persisted session
    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Event emitted by the gateway when the backend rejects the credential.
/// The top-level session owner subscribes and performs the navigation;
/// the data layer itself never touches the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Expired,
}

/// Shared, injectable session handle: in-memory state plus its durable
/// store plus the expiry channel.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    data: Arc<RwLock<SessionData>>,
    store: SessionStore,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Create a handle, rehydrating state from the store if present.
    pub fn new(store: SessionStore) -> Self {
        let data = store.load().unwrap_or_default();
        let (events, _) = broadcast::channel(16);
        Self {
            data: Arc::new(RwLock::new(data)),
            store,
            events,
        }
    }

    /// Subscribe to session expiry events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.read().role
    }

    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Store the credential in memory and on disk.
    pub fn login(&self, token: String, role: Role, username: String) {
        let mut data = self.write();
        data.set_login(token, role, username);
        if let Err(e) = self.store.save(&data) {
            tracing::warn!("failed to persist session: {}", e);
        }
    }

    /// Clear the credential in memory and on disk.
    pub fn logout(&self) {
        self.write().clear();
        if let Err(e) = self.store.delete() {
            tracing::warn!("failed to remove persisted session: {}", e);
        }
    }

    /// Forced logout after a 401: clear everything, then notify the
    /// session owner. Safe to call with no subscribers.
    pub(crate) fn expire(&self) {
        tracing::warn!("credential rejected by backend, clearing session");
        self.logout();
        let _ = self.events.send(SessionEvent::Expired);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionData> {
        self.data.read().expect("session lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionData> {
        self.data.write().expect("session lock poisoned")
    }
}
