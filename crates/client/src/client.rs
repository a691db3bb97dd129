//! Main Verkada API client.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use verkada_config::Config;
use verkada_config::constants::{
    DEFAULT_BASE_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_LIFETIME_SECS,
};

use crate::auth::{CredentialStore, TokenManager};
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{AuditLogEvent, AuditLogPage, Notification, NotificationPage, TimeWindow};

/// Builder for creating a new [`VerkadaClient`].
pub struct VerkadaClientBuilder {
    base_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
    max_retries: usize,
    page_size: u64,
    token_lifetime: Duration,
    credential_path: Option<PathBuf>,
}

impl Default for VerkadaClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            page_size: DEFAULT_PAGE_SIZE,
            token_lifetime: Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS),
            credential_path: None,
        }
    }
}

impl VerkadaClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the builder from a resolved [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: Some(config.api_key.clone()),
            timeout: config.timeout,
            max_retries: config.max_retries,
            page_size: config.page_size,
            token_lifetime: config.token_lifetime,
            credential_path: Some(config.credential_path.clone()),
        }
    }

    /// Set the base URL of the Verkada API.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Set the API key used to acquire tokens.
    pub fn api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for transient failures.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the page size for paginated fetches.
    pub fn page_size(mut self, size: u64) -> Self {
        self.page_size = size;
        self
    }

    /// Set the assumed token lifetime.
    pub fn token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Set the credential cache file path.
    pub fn credential_path(mut self, path: PathBuf) -> Self {
        self.credential_path = Some(path);
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    ///
    /// This prevents double slashes when concatenating with endpoint paths.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the client.
    pub fn build(self) -> Result<VerkadaClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| ClientError::AuthFailed("api_key is required".to_string()))?;
        let base_url = Self::normalize_base_url(self.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(base_url));
        }

        let credential_path = match self.credential_path {
            Some(path) => path,
            None => verkada_config::default_credential_path().map_err(|e| {
                ClientError::CredentialStore {
                    path: "<default>".to_string(),
                    source: std::io::Error::other(e.to_string()),
                }
            })?,
        };

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .build()?;

        let store = CredentialStore::new(credential_path);

        Ok(VerkadaClient {
            http,
            base_url,
            token_manager: TokenManager::new(api_key, self.token_lifetime, store),
            max_retries: self.max_retries,
            page_size: self.page_size,
        })
    }
}

/// Verkada REST API client.
///
/// Handles token acquisition, caching, and refresh transparently; data
/// fetches paginate until the server stops returning a continuation token.
#[derive(Debug)]
pub struct VerkadaClient {
    http: reqwest::Client,
    base_url: String,
    token_manager: TokenManager,
    max_retries: usize,
    page_size: u64,
}

impl VerkadaClient {
    /// Create a new client builder.
    pub fn builder() -> VerkadaClientBuilder {
        VerkadaClientBuilder::new()
    }

    /// Create a client from a resolved [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        VerkadaClientBuilder::from_config(config).build()
    }

    /// Return a valid API token, acquiring or refreshing one if needed.
    pub async fn ensure_valid_token(&mut self) -> Result<String> {
        self.token_manager
            .ensure_valid_token(&self.http, &self.base_url, self.max_retries)
            .await
    }

    /// Fetch all audit log entries in the window, in server order.
    ///
    /// A fatal error on any page aborts the whole fetch; partial results are
    /// discarded since the next scheduled run re-fetches the same window.
    pub async fn list_audit_logs(&mut self, window: TimeWindow) -> Result<Vec<AuditLogEvent>> {
        let mut events = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.audit_logs_page(window, cursor.as_deref()).await?;
            events.extend(page.audit_logs);
            match page.next_page_token {
                Some(token) if !token.is_empty() => cursor = Some(token),
                _ => break,
            }
        }

        Ok(events)
    }

    /// Fetch all camera notifications in the window, in server order.
    pub async fn list_notifications(&mut self, window: TimeWindow) -> Result<Vec<Notification>> {
        let mut notifications = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.notifications_page(window, cursor.as_deref()).await?;
            notifications.extend(page.notifications);
            match page.next_page_token {
                Some(token) if !token.is_empty() => cursor = Some(token),
                _ => break,
            }
        }

        Ok(notifications)
    }

    async fn audit_logs_page(
        &mut self,
        window: TimeWindow,
        cursor: Option<&str>,
    ) -> Result<AuditLogPage> {
        let token = self.ensure_valid_token().await?;

        let result = endpoints::get_audit_logs_page(
            &self.http,
            &self.base_url,
            &token,
            window,
            self.page_size,
            cursor,
            self.max_retries,
        )
        .await;

        match result {
            Err(ClientError::TokenExpired { .. }) => {
                info!("token rejected by audit log endpoint, refreshing and retrying once");
                let token = self
                    .token_manager
                    .force_refresh(&self.http, &self.base_url, self.max_retries)
                    .await?;
                endpoints::get_audit_logs_page(
                    &self.http,
                    &self.base_url,
                    &token,
                    window,
                    self.page_size,
                    cursor,
                    self.max_retries,
                )
                .await
            }
            other => other,
        }
    }

    async fn notifications_page(
        &mut self,
        window: TimeWindow,
        cursor: Option<&str>,
    ) -> Result<NotificationPage> {
        let token = self.ensure_valid_token().await?;

        let result = endpoints::get_notifications_page(
            &self.http,
            &self.base_url,
            &token,
            window,
            self.page_size,
            cursor,
            self.max_retries,
        )
        .await;

        match result {
            Err(ClientError::TokenExpired { .. }) => {
                info!("token rejected by notification endpoint, refreshing and retrying once");
                let token = self
                    .token_manager
                    .force_refresh(&self.http, &self.base_url, self.max_retries)
                    .await?;
                endpoints::get_notifications_page(
                    &self.http,
                    &self.base_url,
                    &token,
                    window,
                    self.page_size,
                    cursor,
                    self.max_retries,
                )
                .await
            }
            other => other,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SecretString {
        SecretString::new("test-key".to_string().into())
    }

    #[test]
    fn test_builder_requires_api_key() {
        let client = VerkadaClient::builder()
            .credential_path(PathBuf::from("/tmp/credential.json"))
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::AuthFailed(_)));
    }

    #[test]
    fn test_builder_rejects_non_http_url() {
        let client = VerkadaClient::builder()
            .api_key(test_key())
            .base_url("ftp://api.example.com".to_string())
            .credential_path(PathBuf::from("/tmp/credential.json"))
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_normalizes_base_url() {
        let client = VerkadaClient::builder()
            .api_key(test_key())
            .base_url("https://api.au.verkada.com//".to_string())
            .credential_path(PathBuf::from("/tmp/credential.json"))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://api.au.verkada.com");
    }
}
