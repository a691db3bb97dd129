//! Audit log event models.
//!
//! Audit log entries record security-relevant actions taken in the Verkada
//! platform (archiving footage, viewing a stream, changing settings). Only
//! `event_type` and `timestamp` are interpreted client-side; everything else
//! in the payload is carried through untouched.

use serde::{Deserialize, Serialize};

/// A single audit log entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuditLogEvent {
    /// Action type (e.g., "archive_footage", "view_stream"). Used for
    /// filtering against the configured interested types.
    #[serde(default)]
    pub event_type: String,
    /// Unix timestamp of the event in seconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Remaining payload fields, preserved verbatim.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// One page of the audit log listing response.
#[derive(Debug, Deserialize, Clone)]
pub struct AuditLogPage {
    #[serde(default)]
    pub audit_logs: Vec<AuditLogEvent>,
    /// Continuation token; absent or empty when the listing is exhausted.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_audit_log_event_with_extra_fields() {
        let json = r#"{
            "event_type": "archive_footage",
            "timestamp": 1706900100,
            "user_email": "admin@example.com",
            "camera_id": "abc-123"
        }"#;

        let event: AuditLogEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "archive_footage");
        assert_eq!(event.timestamp, Some(1706900100));
        assert_eq!(
            event.details.get("user_email").and_then(|v| v.as_str()),
            Some("admin@example.com")
        );
    }

    #[test]
    fn test_serialize_round_trips_payload_fields() {
        let json = r#"{"event_type":"view_stream","timestamp":1706900200,"site":"hq"}"#;
        let event: AuditLogEvent = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(out["site"], "hq");
        assert_eq!(out["event_type"], "view_stream");
    }

    #[test]
    fn test_deserialize_page_without_next_token() {
        let json = r#"{"audit_logs": [{"event_type": "view_stream"}]}"#;
        let page: AuditLogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.audit_logs.len(), 1);
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_deserialize_empty_page() {
        let page: AuditLogPage = serde_json::from_str("{}").unwrap();
        assert!(page.audit_logs.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
