use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use shared::types::{Role, SessionUser};

// ---------------------------------------------------------------------------
// Session value
// ---------------------------------------------------------------------------

/// The signed-in state: bearer token plus the profile it belongs to.
///
/// Token and user always travel together in one value, which makes the
/// "user present iff token present" invariant structural rather than
/// something callers have to check.
///
/// The serialized shape (`token` and `user` keys) is the persistence-layer
/// contract inherited from the browser client's storage keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Synchronous snapshot handed to route guards and views.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Holds the current session and notifies observers on every change.
///
/// Cheaply cloneable: all clones share one underlying channel, so a
/// `login` through any handle is immediately visible to `current()` on
/// every other handle — there is no eventual-consistency window.  Reads
/// never suspend.  The store itself never fails; persistence IO problems
/// are logged and swallowed because the in-memory state is authoritative.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
    persist_path: Option<PathBuf>,
}

impl SessionStore {
    /// In-memory store, nothing survives the process.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            persist_path: None,
        }
    }

    /// Store backed by a JSON file, restoring any session persisted there
    /// by a previous run.
    pub fn with_persistence(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let initial = Self::restore(&path);
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            persist_path: Some(path),
        }
    }

    fn restore(path: &Path) -> Option<Session> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => {
                info!("Restored session for {}", session.user.username);
                Some(session)
            }
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Open a session.  Observers wake, and the session is written through
    /// to the persist file when one is configured.
    pub fn login(&self, token: impl Into<String>, user: SessionUser) {
        let session = Session {
            token: token.into(),
            user,
        };
        self.persist(&session);
        info!("Session opened for {}", session.user.username);
        self.tx.send_replace(Some(session));
    }

    /// Clear the session and the persist file.
    pub fn logout(&self) {
        if let Some(path) = &self.persist_path {
            if let Err(e) = fs::remove_file(path) {
                debug!("No session file to remove at {}: {}", path.display(), e);
            }
        }
        info!("Session cleared");
        self.tx.send_replace(None);
    }

    /// Mutate the stored profile in place (e.g. after a profile-image
    /// change) while keeping the token.  No-op when signed out.
    pub fn update_profile(&self, update: impl FnOnce(&mut SessionUser)) {
        let changed = self.tx.send_if_modified(|slot| match slot {
            Some(session) => {
                update(&mut session.user);
                true
            }
            None => false,
        });
        if changed {
            if let Some(session) = self.tx.borrow().clone() {
                self.persist(&session);
            }
        }
    }

    /// Current state, read synchronously.
    pub fn current(&self) -> SessionState {
        match self.tx.borrow().as_ref() {
            Some(session) => SessionState {
                authenticated: true,
                user: Some(session.user.clone()),
            },
            None => SessionState {
                authenticated: false,
                user: None,
            },
        }
    }

    /// The bearer token, when signed in.
    pub fn token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    /// The signed-in role, when known.
    pub fn role(&self) -> Option<Role> {
        self.tx.borrow().as_ref().map(|s| s.user.role)
    }

    /// Session-changed notifications: the receiver yields the new value on
    /// every login/logout/profile update.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    fn persist(&self, session: &Session) {
        let Some(path) = &self.persist_path else {
            return;
        };
        match serde_json::to_string_pretty(session) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("Failed to persist session to {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize session: {}", e),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
