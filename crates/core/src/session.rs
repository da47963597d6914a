use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    model::{Role, StoreKey, User},
    persistence::SecurePersistentStore,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Session record is malformed: {reason}")]
    Malformed { reason: String },
    #[error("Session record has no token")]
    MissingToken,
    #[error("Failed to encode session: {reason}")]
    Encode { reason: String },
}

/// The logged in user as persisted under [StoreKey::User].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Result<Self, SessionError> {
        match user.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(Self { user }),
            _ => Err(SessionError::MissingToken),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }

    pub fn token(&self) -> &str {
        // checked in `new`
        self.user.token.as_deref().unwrap_or_default()
    }

    /// The raw role string, see [Session::parsed_role].
    pub fn role(&self) -> &str {
        &self.user.role
    }

    pub fn parsed_role(&self) -> Option<Role> {
        self.user.parsed_role()
    }
}

/// What the store currently holds, without collapsing a broken record into
/// "absent" so each caller can decide how to fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Absent,
    Active(Session),
    Malformed(SessionError),
}

impl SessionState {
    pub fn active(&self) -> Option<&Session> {
        match self {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }
}

/// Typed access to the persisted session.
///
/// Shared by the HTTP client and the navigator; every read goes back to the
/// store so a logout or expiry seen by one is seen by the other.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SecurePersistentStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn SecurePersistentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SecurePersistentStore> {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        let Some(bytes) = self.store.get(StoreKey::User.into()) else {
            return SessionState::Absent;
        };

        let user = match serde_json::from_slice::<User>(&bytes) {
            Ok(user) => user,
            Err(e) => {
                warn!("Persisted session could not be parsed: {e}");
                return SessionState::Malformed(SessionError::Malformed {
                    reason: e.to_string(),
                });
            }
        };

        match Session::new(user) {
            Ok(session) => SessionState::Active(session),
            Err(e) => {
                warn!("Persisted session rejected: {e}");
                SessionState::Malformed(e)
            }
        }
    }

    /// `Ok(None)` when nobody is logged in, `Err` when the record is broken.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        match self.state() {
            SessionState::Absent => Ok(None),
            SessionState::Active(session) => Ok(Some(session)),
            SessionState::Malformed(e) => Err(e),
        }
    }

    pub fn establish(&self, user: User) -> Result<Session, SessionError> {
        let session = Session::new(user)?;
        let bytes = serde_json::to_vec(&session).map_err(|e| SessionError::Encode {
            reason: e.to_string(),
        })?;
        self.store.set(StoreKey::User.into(), bytes);
        debug!("Session established for user {}", session.user().user_id);
        Ok(session)
    }

    /// Removes the session. Safe to call when already logged out.
    pub fn clear(&self) {
        self.store.remove_entry(StoreKey::User.into());
        debug!("Session cleared");
    }
}
