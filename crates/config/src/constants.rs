//! Centralized constants for the Verkada poller workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default Verkada API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.au.verkada.com";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for transient request failures.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed retry count.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Token Lifetime
// =============================================================================

/// Assumed API token lifetime in seconds (25 minutes).
///
/// Verkada API tokens are valid for 30 minutes server-side and cannot be
/// refreshed. The client treats a token as expired 5 minutes early so it
/// never presents a token that dies mid-request.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 1500;

/// Maximum allowed assumed token lifetime in seconds (the server-side TTL).
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 1800;

// =============================================================================
// Pagination & Polling Defaults
// =============================================================================

/// Default page size for paginated event fetches.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Maximum page size accepted by the Verkada API.
pub const MAX_PAGE_SIZE: u64 = 200;

/// Default polling interval in seconds (15 minutes).
///
/// Scheduled runs fetch the most recently completed interval aligned to this
/// boundary, so consecutive runs tile the timeline without gaps or overlaps.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;

// =============================================================================
// Event Filtering Defaults
// =============================================================================

/// Default audit-log event types retained after filtering.
pub const DEFAULT_INTERESTED_EVENT_TYPES: &[&str] = &["archive_footage", "view_stream"];

// =============================================================================
// Credential Persistence
// =============================================================================

/// File name of the cached credential inside the application cache directory.
pub const CREDENTIAL_FILE_NAME: &str = "credential.json";
