//! Credential storage.
//!
//! The access credential is short-lived and scoped to the running process.
//! The refresh credential outlives it: [`PersistentCredentials`] keeps it in a
//! file so the next launch can mint a new access credential without a login.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::warn;

/// The current credential pair. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Pure storage for the credential pair; no validation, no network.
///
/// `set_tokens` must replace both sides in one step: a reader never observes
/// a new access credential next to a stale refresh credential.
pub trait CredentialStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn set_tokens(&self, access: &str, refresh: &str) -> std::io::Result<()>;
    fn clear(&self);
}

/// Both credentials held in memory only. Used in tests and for one-shot
/// commands that should not touch the persisted refresh credential.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    tokens: RwLock<Tokens>,
}

impl MemoryCredentials {
    pub fn new(tokens: Tokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    pub fn snapshot(&self) -> Tokens {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryCredentials {
    fn access_token(&self) -> Option<String> {
        self.snapshot().access
    }

    fn refresh_token(&self) -> Option<String> {
        self.snapshot().refresh
    }

    fn set_tokens(&self, access: &str, refresh: &str) -> std::io::Result<()> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = Tokens {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        };
        Ok(())
    }

    fn clear(&self) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Tokens::default();
    }
}

/// Access credential in memory, refresh credential persisted at `path`.
#[derive(Debug)]
pub struct PersistentCredentials {
    path: PathBuf,
    tokens: RwLock<Tokens>,
}

impl PersistentCredentials {
    /// Open the store, loading a previously persisted refresh credential.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let refresh = match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_string()).filter(|s| !s.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            tokens: RwLock::new(Tokens {
                access: None,
                refresh,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, refresh: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, refresh)?;
        restrict_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl CredentialStore for PersistentCredentials {
    fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .access
            .clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .refresh
            .clone()
    }

    fn set_tokens(&self, access: &str, refresh: &str) -> std::io::Result<()> {
        // Hold the write lock across the file write so readers see either the
        // old pair or the new one.
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(refresh)?;
        *tokens = Tokens {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        };
        Ok(())
    }

    fn clear(&self) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *tokens = Tokens::default();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove {}: {e}", self.path.display()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
