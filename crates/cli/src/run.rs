//! Run driver: compute the time window, fetch both event sets, filter audit
//! logs, and emit the report.
//!
//! A fatal error at any stage aborts the run before anything is written to
//! stdout, so a consumer never sees partial output from a failed run.

use anyhow::Context;
use chrono::DateTime;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use verkada_client::{
    AuditLogEvent, Notification, TimeWindow, VerkadaClient, filter_audit_logs,
};
use verkada_config::Config;

/// The structured output of one run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub window: TimeWindow,
    pub audit_logs: Vec<AuditLogEvent>,
    pub notifications: Vec<Notification>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn rfc3339(ts: u64) -> String {
    DateTime::from_timestamp(ts as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

/// Fetch and filter both event sets for the window.
pub async fn execute(config: &Config, window: Option<TimeWindow>) -> anyhow::Result<Report> {
    let window = match window {
        Some(explicit) => explicit,
        None => TimeWindow::latest_completed(unix_now(), config.poll_interval),
    };
    info!(
        start = %rfc3339(window.start),
        end = %rfc3339(window.end),
        "starting poll run"
    );

    let mut client = VerkadaClient::from_config(config).context("failed to build client")?;

    client
        .ensure_valid_token()
        .await
        .context("failed to obtain API token")?;

    let audit_logs = client
        .list_audit_logs(window)
        .await
        .context("failed to fetch audit logs")?;
    let audit_logs = filter_audit_logs(audit_logs, &config.interested_event_types);

    let notifications = client
        .list_notifications(window)
        .await
        .context("failed to fetch notifications")?;

    info!(
        audit_logs = audit_logs.len(),
        notifications = notifications.len(),
        "poll run complete"
    );

    Ok(Report {
        window,
        audit_logs,
        notifications,
    })
}

/// Run end to end and emit the report as JSON on stdout.
pub async fn run(config: &Config, window: Option<TimeWindow>, pretty: bool) -> anyhow::Result<()> {
    let report = execute(config, window).await?;

    let stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(stdout, &report).context("failed to emit report")?;
    } else {
        serde_json::to_writer(stdout, &report).context("failed to emit report")?;
    }
    println!();
    Ok(())
}
