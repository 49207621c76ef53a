use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::SessionConfig;
use crate::error::ClientError;
use crate::models::SessionUser;

pub const SESSION_FILE: &str = "session.json";

/// The persisted `token` + `user` pair and their shared expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authoritative session shared by the guard, the API client and the catalog.
///
/// Cloning is cheap; all clones observe the same session. An expired session
/// reads as absent, the same way a browser drops an expired cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    path: Option<PathBuf>,
    max_age: Duration,
}

impl SessionStore {
    pub fn in_memory(max_age_days: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            path: None,
            max_age: Duration::days(max_age_days),
        }
    }

    /// Open a file-backed store, reading any session already saved at `path`
    pub fn persistent(path: impl Into<PathBuf>, max_age_days: i64) -> Self {
        let path = path.into();
        let existing = read_session_file(&path);
        Self {
            inner: Arc::new(RwLock::new(existing)),
            path: Some(path),
            max_age: Duration::days(max_age_days),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        match &config.dir {
            Some(dir) => Self::persistent(dir.join(SESSION_FILE), config.max_age_days),
            None => Self::in_memory(config.max_age_days),
        }
    }

    /// Store a fresh session expiring `max_age` from now
    pub fn save(&self, token: impl Into<String>, user: SessionUser) -> Result<Session, ClientError> {
        let session = Session {
            token: token.into(),
            user,
            expires_at: Utc::now() + self.max_age,
        };
        self.replace(Some(session.clone()))?;
        tracing::debug!(user_id = session.user.id, expires_at = %session.expires_at, "session saved");
        Ok(session)
    }

    /// Remove both token and user
    pub fn clear(&self) -> Result<(), ClientError> {
        self.replace(None)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|s| !s.is_expired_at(Utc::now()))
            .cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current().map(|s| s.user)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }

    /// Token presence is the only signal; validity is the server's concern
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn replace(&self, session: Option<Session>) -> Result<(), ClientError> {
        if let Some(path) = &self.path {
            match &session {
                Some(s) => write_session_file(path, s)?,
                None => remove_session_file(path)?,
            }
        }
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = session;
        Ok(())
    }
}

fn read_session_file(path: &Path) -> Option<Session> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("ignoring unreadable session file {}: {}", path.display(), e);
            None
        }
    }
}

fn write_session_file(path: &Path, session: &Session) -> Result<(), ClientError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(session)?;
    fs::write(path, content)?;
    Ok(())
}

fn remove_session_file(path: &Path) -> Result<(), ClientError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
