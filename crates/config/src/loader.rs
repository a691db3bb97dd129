//! Configuration loader for environment variables and files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files and environment variables.
//! - Provide a builder-pattern `ConfigLoader` for merging env values with
//!   explicit overrides (CLI flags win over environment).
//! - Enforce the `DOTENV_DISABLED` gate to prevent accidental dotenv loading
//!   in tests.
//!
//! Does NOT handle:
//! - Credential persistence (owned by the client crate).
//! - Command-line parsing (owned by the CLI crate).
//!
//! Invariants / Assumptions:
//! - Explicit overrides take precedence over environment variables.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    CREDENTIAL_FILE_NAME, DEFAULT_BASE_URL, DEFAULT_INTERESTED_EVENT_TYPES,
    DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_LIFETIME_SECS, MAX_MAX_RETRIES, MAX_PAGE_SIZE,
    MAX_TIMEOUT_SECS, MAX_TOKEN_LIFETIME_SECS,
};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("API key is required (set VERKADA_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("Unable to determine cache directory: {0}")]
    CacheDirUnavailable(String),
}

/// Resolved configuration for a poller run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Top-level Verkada API key used to acquire short-lived tokens.
    pub api_key: SecretString,
    /// Base URL of the Verkada API.
    pub base_url: String,
    /// Number of items requested per page.
    pub page_size: u64,
    /// Client-side assumed token lifetime.
    pub token_lifetime: Duration,
    /// Maximum retries for transient request failures.
    pub max_retries: usize,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Scheduling interval; also the width of the computed time window.
    pub poll_interval: Duration,
    /// Audit-log event types retained after filtering.
    pub interested_event_types: Vec<String>,
    /// Path of the cached credential file.
    pub credential_path: PathBuf,
}

/// Read an environment variable, returning None if unset, empty, or
/// whitespace-only. Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env_u64(var: &str) -> Result<Option<u64>, ConfigError> {
    env_var_or_none(var)
        .map(|raw| {
            raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                message: "must be a non-negative integer".to_string(),
            })
        })
        .transpose()
}

/// Configuration loader that builds a [`Config`] from environment variables
/// and explicit overrides.
#[derive(Default)]
pub struct ConfigLoader {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    page_size: Option<u64>,
    token_lifetime: Option<Duration>,
    max_retries: Option<usize>,
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    interested_event_types: Option<Vec<String>>,
    credential_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load environment variables from a `.env` file if present.
    ///
    /// If the `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the `.env` file will not be loaded (useful for testing).
    pub fn load_dotenv(self) -> Self {
        let disabled = std::env::var("DOTENV_DISABLED").ok();
        if disabled.as_deref() != Some("true")
            && disabled.as_deref() != Some("1")
            && let Ok(path) = dotenvy::dotenv()
        {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        self
    }

    /// Apply `VERKADA_*` environment variables to the loader.
    ///
    /// Explicit overrides set later win over values read here.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if let Some(key) = env_var_or_none("VERKADA_API_KEY") {
            self.api_key = Some(SecretString::new(key.into()));
        }
        if let Some(url) = env_var_or_none("VERKADA_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(size) = parse_env_u64("VERKADA_PAGE_SIZE")? {
            self.page_size = Some(size);
        }
        if let Some(secs) = parse_env_u64("VERKADA_TOKEN_LIFETIME")? {
            self.token_lifetime = Some(Duration::from_secs(secs));
        }
        if let Some(retries) = parse_env_u64("VERKADA_MAX_RETRIES")? {
            self.max_retries = Some(retries as usize);
        }
        if let Some(secs) = parse_env_u64("VERKADA_TIMEOUT")? {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_env_u64("VERKADA_POLL_INTERVAL")? {
            self.poll_interval = Some(Duration::from_secs(secs));
        }
        if let Some(types) = env_var_or_none("VERKADA_EVENT_TYPES") {
            self.interested_event_types = Some(
                types
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
            );
        }
        if let Some(path) = env_var_or_none("VERKADA_CREDENTIAL_PATH") {
            self.credential_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Override the API key.
    pub fn with_api_key(mut self, key: Option<SecretString>) -> Self {
        if key.is_some() {
            self.api_key = key;
        }
        self
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.base_url = url;
        }
        self
    }

    /// Override the page size.
    pub fn with_page_size(mut self, size: Option<u64>) -> Self {
        if size.is_some() {
            self.page_size = size;
        }
        self
    }

    /// Override the retry count.
    pub fn with_max_retries(mut self, retries: Option<usize>) -> Self {
        if retries.is_some() {
            self.max_retries = retries;
        }
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    /// Override the credential file path.
    pub fn with_credential_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.credential_path = path;
        }
        self
    }

    /// Build the final configuration, validating bounds and applying defaults.
    pub fn build(self) -> Result<Config, ConfigError> {
        let api_key = self.api_key.ok_or(ConfigError::MissingApiKey)?;

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                var: "VERKADA_PAGE_SIZE".to_string(),
                message: format!("must be between 1 and {} (got {})", MAX_PAGE_SIZE, page_size),
            });
        }

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidValue {
                var: "VERKADA_MAX_RETRIES".to_string(),
                message: format!("must be between 0 and {} (got {})", MAX_MAX_RETRIES, max_retries),
            });
        }

        let token_lifetime = self
            .token_lifetime
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS));
        if token_lifetime.is_zero() || token_lifetime.as_secs() > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::InvalidValue {
                var: "VERKADA_TOKEN_LIFETIME".to_string(),
                message: format!(
                    "must be between 1 and {} seconds",
                    MAX_TOKEN_LIFETIME_SECS
                ),
            });
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() || timeout.as_secs() > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                var: "VERKADA_TIMEOUT".to_string(),
                message: format!("must be between 1 and {} seconds", MAX_TIMEOUT_SECS),
            });
        }

        let poll_interval = self
            .poll_interval
            .unwrap_or(Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
        if poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                var: "VERKADA_POLL_INTERVAL".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        let credential_path = match self.credential_path {
            Some(path) => path,
            None => default_credential_path()?,
        };

        Ok(Config {
            api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page_size,
            token_lifetime,
            max_retries,
            timeout,
            poll_interval,
            interested_event_types: self.interested_event_types.unwrap_or_else(|| {
                DEFAULT_INTERESTED_EVENT_TYPES
                    .iter()
                    .map(|t| t.to_string())
                    .collect()
            }),
            credential_path,
        })
    }
}

/// Default location of the cached credential file.
pub fn default_credential_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("", "", "verkada-poller")
        .ok_or_else(|| ConfigError::CacheDirUnavailable("no home directory".to_string()))?;
    Ok(dirs.cache_dir().join(CREDENTIAL_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    fn loader_with_key() -> ConfigLoader {
        ConfigLoader::new().with_api_key(Some(SecretString::new("test-key".to_string().into())))
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        temp_env::with_vars_unset(
            [
                "VERKADA_BASE_URL",
                "VERKADA_PAGE_SIZE",
                "VERKADA_MAX_RETRIES",
                "VERKADA_EVENT_TYPES",
            ],
            || {
                let config = loader_with_key()
                    .with_credential_path(Some(PathBuf::from("/tmp/cred.json")))
                    .build()
                    .unwrap();
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
                assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
                assert_eq!(config.token_lifetime.as_secs(), DEFAULT_TOKEN_LIFETIME_SECS);
                assert_eq!(config.poll_interval.as_secs(), DEFAULT_POLL_INTERVAL_SECS);
                assert_eq!(
                    config.interested_event_types,
                    vec!["archive_footage".to_string(), "view_stream".to_string()]
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_missing_api_key_rejected() {
        temp_env::with_var_unset("VERKADA_API_KEY", || {
            let result = ConfigLoader::new().from_env().unwrap().build();
            assert!(matches!(result, Err(ConfigError::MissingApiKey)));
        });
    }

    #[test]
    #[serial]
    fn test_env_values_applied() {
        temp_env::with_vars(
            [
                ("VERKADA_API_KEY", Some("env-key")),
                ("VERKADA_BASE_URL", Some("https://api.verkada.com")),
                ("VERKADA_PAGE_SIZE", Some("50")),
                ("VERKADA_EVENT_TYPES", Some("view_stream, delete_archive")),
            ],
            || {
                let config = ConfigLoader::new()
                    .from_env()
                    .unwrap()
                    .with_credential_path(Some(PathBuf::from("/tmp/cred.json")))
                    .build()
                    .unwrap();
                assert_eq!(config.api_key.expose_secret(), "env-key");
                assert_eq!(config.base_url, "https://api.verkada.com");
                assert_eq!(config.page_size, 50);
                assert_eq!(
                    config.interested_event_types,
                    vec!["view_stream".to_string(), "delete_archive".to_string()]
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_explicit_overrides_win_over_env() {
        temp_env::with_var("VERKADA_MAX_RETRIES", Some("5"), || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .with_api_key(Some(SecretString::new("k".to_string().into())))
                .with_max_retries(Some(1))
                .with_credential_path(Some(PathBuf::from("/tmp/cred.json")))
                .build()
                .unwrap();
            assert_eq!(config.max_retries, 1);
        });
    }

    #[test]
    #[serial]
    fn test_invalid_page_size_rejected() {
        temp_env::with_var_unset("VERKADA_PAGE_SIZE", || {
            let result = loader_with_key().with_page_size(Some(500)).build();
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

            let result = loader_with_key().with_page_size(Some(0)).build();
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        });
    }

    #[test]
    #[serial]
    fn test_invalid_numeric_env_rejected() {
        temp_env::with_var("VERKADA_PAGE_SIZE", Some("lots"), || {
            let result = ConfigLoader::new().from_env();
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        });
    }

    #[test]
    #[serial]
    fn test_env_var_or_none_trims_and_filters_empty() {
        temp_env::with_vars(
            [
                ("VERKADA_TEST_EMPTY", Some("   ")),
                ("VERKADA_TEST_PADDED", Some("  value  ")),
            ],
            || {
                assert_eq!(env_var_or_none("VERKADA_TEST_EMPTY"), None);
                assert_eq!(
                    env_var_or_none("VERKADA_TEST_PADDED"),
                    Some("value".to_string())
                );
                assert_eq!(env_var_or_none("VERKADA_TEST_UNSET"), None);
            },
        );
    }
}
