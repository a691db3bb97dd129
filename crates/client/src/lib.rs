//! Verkada REST API client.
//!
//! This crate provides a client for the Verkada platform's audit log and
//! notification endpoints. It manages the short-lived API token lifecycle
//! (acquire, cache to disk, expire, refresh) and wraps every request in a
//! bounded retry loop with exponential backoff.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod filter;
pub mod models;

pub use auth::{Credential, CredentialStore, TokenManager};
pub use client::{VerkadaClient, VerkadaClientBuilder};
pub use error::{ClientError, Result};
pub use filter::filter_audit_logs;
pub use models::{AuditLogEvent, Notification, TimeWindow};
