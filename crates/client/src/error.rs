//! Error types for the Verkada client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during Verkada client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authentication failed: the API key was rejected by the token endpoint.
    /// This is a fatal, non-transient condition and is never retried.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The API token was rejected by a data endpoint. Recoverable: the client
    /// forces exactly one token refresh and retries the request once.
    #[error("Token expired at {url}: {message}")]
    TokenExpired { url: String, message: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success API response that is neither retryable nor an auth failure.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// Invalid response format from the API.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Transient-retry budget exhausted; carries the last underlying failure.
    #[error("Maximum retries exceeded ({0} attempts): {1}")]
    MaxRetriesExceeded(usize, Box<ClientError>),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid time window (start must be strictly before end).
    #[error("Invalid time window: start {start} is not before end {end}")]
    InvalidWindow { start: u64, end: u64 },

    /// Failed to read or write the cached credential file.
    #[error("Credential store error at {path}: {source}")]
    CredentialStore {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Check if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_connect() || e.is_timeout(),
            Self::ApiError { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests (rate limiting)
    /// - 502: Bad Gateway (transient server error)
    /// - 503: Service Unavailable (transient server error)
    /// - 504: Gateway Timeout (transient server error)
    ///
    /// Non-retryable status codes (fail immediately):
    /// - 400, 403, 404: client errors
    /// - 401: token expiry, handled by the one-shot refresh path instead
    /// - 500, 501: server errors that typically indicate a bug, not load
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthFailed(_) | Self::TokenExpired { .. })
    }
}
