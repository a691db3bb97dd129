//! Credential caching and token lifecycle management.
//!
//! Verkada API tokens are short-lived and cannot be refreshed server-side, so
//! the [`TokenManager`] acquires a new one whenever the cached credential is
//! missing or past its assumed lifetime. The credential is persisted to a
//! local file so a token survives process restarts within its lifetime.
//!
//! All mutating entry points take `&mut self`, so at most one refresh can be
//! in flight per manager.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::endpoints;
use crate::error::{ClientError, Result};

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A cached API token and the time it was obtained.
#[derive(Debug, Clone)]
pub struct Credential {
    value: SecretString,
    obtained_at: u64,
}

/// On-disk form of [`Credential`]. The assumed lifetime is configuration,
/// not state, so it is not persisted.
#[derive(Serialize, Deserialize)]
struct PersistedCredential {
    token: String,
    obtained_at: u64,
}

impl Credential {
    pub fn new(token: String, obtained_at: u64) -> Self {
        Self {
            value: SecretString::new(token.into()),
            obtained_at,
        }
    }

    /// The token value, for use in request headers.
    pub fn token(&self) -> &str {
        self.value.expose_secret()
    }

    /// When the token was obtained, in Unix seconds.
    pub fn obtained_at(&self) -> u64 {
        self.obtained_at
    }

    /// A credential is valid iff `now < obtained_at + lifetime`.
    pub fn is_valid(&self, now: u64, lifetime: Duration) -> bool {
        now < self.obtained_at.saturating_add(lifetime.as_secs())
    }
}

/// File-backed credential cache.
///
/// Absence or corruption of the file is treated as "no cached credential".
/// Writes go through a temp file and an atomic rename so a crashed run can
/// never leave a truncated file behind.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> ClientError {
        ClientError::CredentialStore {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Load the cached credential, if a readable one exists.
    pub fn load(&self) -> Option<Credential> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "could not read credential file");
                return None;
            }
        };

        match serde_json::from_str::<PersistedCredential>(&raw) {
            Ok(persisted) => Some(Credential::new(persisted.token, persisted.obtained_at)),
            Err(e) => {
                debug!(
                    path = %self.path.display(),
                    error = %e,
                    "credential file unparsable, treating as absent"
                );
                None
            }
        }
    }

    /// Persist the credential, overwriting any previous one.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let persisted = PersistedCredential {
            token: credential.token().to_string(),
            obtained_at: credential.obtained_at,
        };
        let body = serde_json::to_string(&persisted)
            .map_err(|e| ClientError::InvalidResponse(format!("credential encoding: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, body).map_err(|e| self.io_err(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_err(e))?;
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_err(e))
    }
}

/// Owns the cached credential and refreshes it when needed.
#[derive(Debug)]
pub struct TokenManager {
    api_key: SecretString,
    lifetime: Duration,
    store: CredentialStore,
    credential: Option<Credential>,
    loaded: bool,
}

impl TokenManager {
    pub fn new(api_key: SecretString, lifetime: Duration, store: CredentialStore) -> Self {
        Self {
            api_key,
            lifetime,
            store,
            credential: None,
            loaded: false,
        }
    }

    /// Return a usable token, acquiring a new one if the cached credential is
    /// missing or expired.
    pub async fn ensure_valid_token(
        &mut self,
        http: &reqwest::Client,
        base_url: &str,
        max_retries: usize,
    ) -> Result<String> {
        if !self.loaded {
            self.credential = self.store.load();
            self.loaded = true;
        }

        if let Some(credential) = &self.credential
            && credential.is_valid(unix_now(), self.lifetime)
        {
            return Ok(credential.token().to_string());
        }

        self.refresh(http, base_url, max_retries).await
    }

    /// Drop the cached credential and acquire a fresh one.
    ///
    /// Used when a data endpoint rejects a token that the client still
    /// considered valid.
    pub async fn force_refresh(
        &mut self,
        http: &reqwest::Client,
        base_url: &str,
        max_retries: usize,
    ) -> Result<String> {
        info!("server rejected cached token, forcing refresh");
        self.credential = None;
        self.loaded = true;
        self.refresh(http, base_url, max_retries).await
    }

    async fn refresh(
        &mut self,
        http: &reqwest::Client,
        base_url: &str,
        max_retries: usize,
    ) -> Result<String> {
        let token = endpoints::get_token(http, base_url, &self.api_key, max_retries).await?;
        let credential = Credential::new(token, unix_now());

        // A failed cache write must not abort the run; the token is still
        // usable, the next run just has to re-acquire one.
        if let Err(e) = self.store.save(&credential) {
            warn!(error = %e, "failed to persist credential");
        }

        let token = credential.token().to_string();
        self.credential = Some(credential);
        Ok(token)
    }
}
