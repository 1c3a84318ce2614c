/// Session persistence and the authentication gate
///
/// The session token is the only thing written to disk. It lives in
/// `session.json` under the user's data directory and is read once at
/// startup; until that read finishes the gate reports `loading`.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data::Author;
use crate::error::{GalleryError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

impl Session {
    /// Identity stamped on comments written by this user
    pub fn author(&self) -> Author {
        Author {
            name: self.user.name.clone(),
            email: self.user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Reads and writes the persisted session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted session. A missing or unreadable file means "not logged in".
    pub async fn load(self) -> Option<Session> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.access_token.is_empty() => Some(session),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed session file");
                None
            }
        }
    }

    pub async fn save(self, session: Session) -> Result<Session> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GalleryError::Session(format!("failed to create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(&session).map_err(|e| GalleryError::Session(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| GalleryError::Session(format!("failed to write {}: {}", self.path.display(), e)))?;
        tracing::debug!(path = %self.path.display(), "session persisted");
        Ok(session)
    }

    /// Remove the persisted session synchronously. A missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GalleryError::Session(format!("failed to remove {}: {}", self.path.display(), e))),
        }
    }
}

/// Authentication state seen by the rest of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGate {
    session: Option<Session>,
    /// True until the persisted session has been checked
    loading: bool,
    /// True while a login request is in flight
    submitting: bool,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
            submitting: false,
        }
    }
}

impl AuthGate {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Startup check finished
    pub fn restored(&mut self, session: Option<Session>) {
        self.session = session;
        self.loading = false;
    }

    /// Returns false if a login is already in flight
    pub fn begin_login(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Record the outcome of a login. On failure nothing but the in-flight flag changes.
    pub fn finish_login(&mut self, result: &Result<Session>) {
        self.submitting = false;
        if let Ok(session) = result {
            self.session = Some(session.clone());
        }
    }

    /// Drop the session, returning it so the caller can notify the backend
    pub fn logout(&mut self) -> Option<Session> {
        self.session.take()
    }
}
