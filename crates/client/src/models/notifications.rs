//! Camera notification models.
//!
//! Notifications are camera-generated event records (motion, tamper,
//! person-of-interest). Unlike audit logs they are not filtered by type, so
//! the whole payload is passed through.

use serde::{Deserialize, Serialize};

/// A single camera notification.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    /// Notification category, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<String>,
    /// Unix timestamp of the notification in seconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Remaining payload fields, preserved verbatim.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// One page of the notification listing response.
#[derive(Debug, Deserialize, Clone)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Continuation token; absent or empty when the listing is exhausted.
    #[serde(default)]
    pub next_page_token: Option<String>,
}
