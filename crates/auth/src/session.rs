//! Session store: the single owner of "who is logged in".
//!
//! The in-memory session and its durable copy move together. Every mutation
//! goes through [`SessionStore::establish`] or [`SessionStore::clear`], and
//! both hold the write lock across the storage call, so no reader ever sees
//! an identity without its credential (or the reverse).

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::storage::{SessionStorage, StorageError};
use crate::{Credential, Identity};

/// Default durable key for the serialized session.
pub const DEFAULT_SESSION_KEY: &str = "storefront.session";

/// Stored in place of a session that could not be deleted.
const TOMBSTONE: &str = "";

/// An identity paired with the credential that proves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    pub credential: Credential,
}

impl Session {
    fn is_well_formed(&self) -> bool {
        !self.credential.expose().trim().is_empty()
            && !self.identity.subject_id().as_str().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct SessionStore {
    key: String,
    storage: Arc<dyn SessionStorage>,
    state: RwLock<Option<Session>>,
    identity_tx: watch::Sender<Option<Identity>>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .field("identity", &self.current())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty store. Call [`SessionStore::restore`] to pick up a
    /// session persisted by a previous run.
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            key: key.into(),
            storage,
            state: RwLock::new(None),
            identity_tx,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rebuild the in-memory session from durable storage.
    ///
    /// Missing, unreadable or malformed data leaves the store empty; malformed
    /// data is also dropped from storage so both copies agree.
    pub fn restore(&self) -> Option<Identity> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let raw = match self.storage.load(&self.key) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to read persisted session");
                None
            }
        };

        let restored = raw.and_then(|raw| match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.is_well_formed() => Some(session),
            Ok(_) | Err(_) => {
                tracing::warn!(key = %self.key, "discarding malformed persisted session");
                if let Err(err) = self.storage.remove(&self.key) {
                    tracing::warn!(key = %self.key, error = %err, "failed to drop malformed session");
                }
                None
            }
        });

        let identity = restored.as_ref().map(|s| s.identity.clone());
        *state = restored;
        self.identity_tx.send_replace(identity.clone());

        if let Some(identity) = &identity {
            tracing::info!(subject = %identity.subject_id(), "session restored");
        }
        identity
    }

    /// Replace the current session (memory and durable copy).
    ///
    /// If the durable write fails, the previous session stays in place.
    pub fn establish(&self, identity: Identity, credential: Credential) -> Result<(), SessionError> {
        let session = Session { identity, credential };
        let encoded = serde_json::to_string(&session)?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.storage.store(&self.key, &encoded)?;

        tracing::info!(subject = %session.identity.subject_id(), role = %session.identity.role(), "session established");
        self.identity_tx.send_replace(Some(session.identity.clone()));
        *state = Some(session);
        Ok(())
    }

    /// Drop the current session. Returns `true` when a session was removed
    /// by this call, `false` when the store was already empty.
    ///
    /// If the durable copy cannot be deleted it is overwritten with an empty
    /// record, which [`SessionStore::restore`] treats as no session. The
    /// in-memory session is dropped regardless.
    pub fn clear(&self) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if let Err(err) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "failed to remove persisted session; writing tombstone");
            if let Err(err) = self.storage.store(&self.key, TOMBSTONE) {
                tracing::error!(key = %self.key, error = %err, "failed to invalidate persisted session");
            }
        }

        match state.take() {
            Some(session) => {
                tracing::info!(subject = %session.identity.subject_id(), "session cleared");
                self.identity_tx.send_replace(None);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<Identity> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.as_ref().map(|s| s.identity.clone())
    }

    pub fn credential(&self) -> Option<Credential> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.as_ref().map(|s| s.credential.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Observe identity changes (login, logout, teardown, restore).
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }
}
