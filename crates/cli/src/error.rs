//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that cron wrappers and scripts can use to
//!   distinguish error types.
//! - Map ClientError variants to appropriate exit codes.
//!
//! Invariants:
//! - Exit codes 1-8 are reserved for specific error categories.

use verkada_client::ClientError;

/// Structured exit codes for verkada-cli.
///
/// These codes enable scripts to distinguish between different failure modes
/// and take appropriate action (retry, rotate credentials, fail fast, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success: both result sets were fetched and emitted.
    Success = 0,

    /// General error: unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure: the API key was rejected, or a refreshed
    /// token was rejected again. Scripts should rotate credentials rather
    /// than retry.
    AuthenticationFailed = 2,

    /// Connection error: network or timeout failure that survived the retry
    /// budget. Scripts may retry on the next scheduled run.
    ConnectionError = 3,

    /// Validation error: bad window or parameters. Fix the input, do not
    /// retry the same invocation.
    ValidationError = 5,

    /// Rate limited even after backoff. Scripts should widen the schedule.
    RateLimited = 7,

    /// Service unavailable (502/503/504 after retries).
    ServiceUnavailable = 8,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::AuthFailed(_) => ExitCode::AuthenticationFailed,
            // A TokenExpired that reaches the CLI means the one-shot refresh
            // already happened and the new token was rejected too.
            ClientError::TokenExpired { .. } => ExitCode::AuthenticationFailed,

            ClientError::InvalidUrl(_) => ExitCode::ConnectionError,
            ClientError::InvalidWindow { .. } => ExitCode::ValidationError,
            ClientError::InvalidResponse(_) => ExitCode::ValidationError,
            ClientError::CredentialStore { .. } => ExitCode::GeneralError,

            ClientError::ApiError { status: 429, .. } => ExitCode::RateLimited,
            ClientError::ApiError {
                status: 502 | 503 | 504,
                ..
            } => ExitCode::ServiceUnavailable,
            ClientError::ApiError { status: 400, .. } => ExitCode::ValidationError,
            ClientError::ApiError { .. } => ExitCode::GeneralError,

            // Check the underlying error recursively.
            ClientError::MaxRetriesExceeded(_, inner) => Self::from(inner.as_ref()),

            ClientError::HttpError(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no ClientError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
        }
        ExitCode::GeneralError
    }
}
