//! Audit log event filtering.

use std::collections::HashSet;

use crate::models::AuditLogEvent;

/// Keep only events whose type is in the interested set.
///
/// Pure and order-preserving; filtering an already-filtered sequence with the
/// same set is a no-op. Notifications never pass through here.
pub fn filter_audit_logs(
    events: Vec<AuditLogEvent>,
    interested_types: &[String],
) -> Vec<AuditLogEvent> {
    let interested: HashSet<&str> = interested_types.iter().map(String::as_str).collect();
    events
        .into_iter()
        .filter(|event| interested.contains(event.event_type.as_str()))
        .collect()
}
