use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};
use triage_core::KeyValueStore;
use uuid::Uuid;

/// Storage key holding the active token.
pub const SESSION_KEY: &str = "session_id";

/// Opaque session token. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner of the one active session token.
///
/// `rotate` is the only way to change the token. Each rotation bumps a
/// generation counter so in-flight work can tell which session it belongs to.
pub struct SessionIdentity {
    store: Arc<dyn KeyValueStore>,
    token: SessionToken,
    generation: u64,
}

impl SessionIdentity {
    /// Reuse the persisted token if there is one, otherwise mint and persist a new one.
    pub fn get_or_create(store: Arc<dyn KeyValueStore>) -> Self {
        let persisted = match store.get(SESSION_KEY) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read persisted session token; starting a new session");
                None
            }
        };

        let token = match persisted {
            Some(value) => {
                info!(session_id = %value, "Resuming persisted session");
                SessionToken(value)
            }
            None => {
                let token = SessionToken::generate();
                persist(store.as_ref(), &token);
                info!(session_id = %token, "Created new session");
                token
            }
        };

        Self {
            store,
            token,
            generation: 0,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Number of rotations since this identity was loaded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the token with a fresh one and persist it.
    ///
    /// Returns the retired token. A storage failure is logged; the in-memory
    /// token still rotates so the old one is never reused by this client.
    pub fn rotate(&mut self) -> SessionToken {
        let mut fresh = SessionToken::generate();
        while fresh == self.token {
            fresh = SessionToken::generate();
        }
        persist(self.store.as_ref(), &fresh);
        let retired = std::mem::replace(&mut self.token, fresh);
        self.generation += 1;
        info!(old = %retired, new = %self.token, "Session rotated");
        retired
    }
}

fn persist(store: &dyn KeyValueStore, token: &SessionToken) {
    if let Err(e) = store.set(SESSION_KEY, token.as_str()) {
        warn!(error = %e, "Failed to persist session token");
    }
}
