//! Where the signed-in operator's bearer token lives.
//!
//! Lifecycle: populated by a successful admin login, cleared by logout. The
//! store is passed to the API handle and the route guard explicitly so tests
//! can substitute an in-memory one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Session;
use crate::utils::{CryptoError, SessionCipher};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] io::Error),
    #[error("Session encryption error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Session>;
    fn set(&self, session: Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;

    fn token(&self) -> Option<String> {
        self.get()
            .map(|session| session.token)
            .filter(|token| !token.is_empty())
    }

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

fn lock(slot: &Mutex<Option<Session>>) -> MutexGuard<'_, Option<Session>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Session held for the lifetime of the process only
#[derive(Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated admin session
    #[cfg(test)]
    pub fn signed_in(token: &str) -> Self {
        Self {
            current: Mutex::new(Some(Session {
                token: token.to_string(),
                user: crate::models::SessionUser {
                    role: "admin".to_string(),
                    email: None,
                    full_name: None,
                },
            })),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        lock(&self.current).clone()
    }

    fn set(&self, session: Session) -> Result<(), SessionError> {
        *lock(&self.current) = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *lock(&self.current) = None;
        Ok(())
    }
}

/// Session persisted to disk, sealed with AES-256-GCM
///
/// The file is read once on open; an unreadable or tampered file is treated as
/// signed out rather than as a fatal error.
pub struct FileSessionStore {
    path: PathBuf,
    cipher: SessionCipher,
    current: Mutex<Option<Session>>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>, cipher: SessionCipher) -> Result<Self, SessionError> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(sealed) => match Self::decode(&cipher, &sealed) {
                Ok(session) => {
                    debug!("Restored session from {}", path.display());
                    Some(session)
                }
                Err(e) => {
                    warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cipher,
            current: Mutex::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(cipher: &SessionCipher, sealed: &str) -> Result<Session, SessionError> {
        let plaintext = cipher.open(sealed)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        lock(&self.current).clone()
    }

    fn set(&self, session: Session) -> Result<(), SessionError> {
        let sealed = self.cipher.seal(&serde_json::to_vec(&session)?)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, sealed)?;
        *lock(&self.current) = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *lock(&self.current) = None;
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
