//! Session-scoped registries
//!
//! Provides [`PermissionSessions`], the composition root that hands each
//! screen or user session its own [`PermissionRegistry`]. Two sessions never
//! see each other's `load`.

use crate::config::RegistryConfig;
use crate::error::SessionError;
use crate::observer::CheckObserver;
use crate::registry::PermissionRegistry;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry per open session
pub struct PermissionSessions {
    sessions: DashMap<SessionId, Arc<PermissionRegistry>>,
    // Held across the capacity check and the insert in `open`
    admission: Mutex<()>,
    observer: Arc<dyn CheckObserver>,
    max_sessions: usize,
}

impl PermissionSessions {
    /// Create empty session table
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            admission: Mutex::new(()),
            observer: config.observer(),
            max_sessions: config.max_sessions,
        }
    }

    /// Open a session with an empty registry
    ///
    /// # Errors
    /// Returns [`SessionError::CapacityExceeded`] if `max_sessions` are
    /// already open
    pub fn open(&self) -> Result<(SessionId, Arc<PermissionRegistry>), SessionError> {
        let _admission = self.admission.lock();
        if self.sessions.len() >= self.max_sessions {
            tracing::warn!("Session limit reached ({})", self.max_sessions);
            return Err(SessionError::CapacityExceeded {
                max: self.max_sessions,
            });
        }

        let id = SessionId::new();
        let registry = Arc::new(PermissionRegistry::with_shared_observer(Arc::clone(
            &self.observer,
        )));
        self.sessions.insert(id, Arc::clone(&registry));
        tracing::debug!(session = %id, "opened permission session");

        Ok((id, registry))
    }

    /// Registry of an open session
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<Arc<PermissionRegistry>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Close a session, returning whether it was open
    ///
    /// Handles already given out keep working but are no longer tracked.
    pub fn close(&self, id: SessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            tracing::debug!(session = %id, "closed permission session");
        }
        removed
    }

    /// Number of open sessions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no session is open
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for PermissionSessions {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl fmt::Debug for PermissionSessions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionSessions")
            .field("open", &self.sessions.len())
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}
