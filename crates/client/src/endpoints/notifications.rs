//! Camera notification retrieval endpoint.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::send_request_with_retry;
use crate::error::Result;
use crate::models::{NotificationPage, TimeWindow};

/// Fetch one page of camera notifications for the given window.
pub async fn get_notifications_page(
    http: &Client,
    base_url: &str,
    token: &str,
    window: TimeWindow,
    page_size: u64,
    page_token: Option<&str>,
    max_retries: usize,
) -> Result<NotificationPage> {
    let url = format!("{}/cameras/v1/alerts", base_url);

    let mut query_params: Vec<(&str, String)> = vec![
        ("start_time", window.start.to_string()),
        ("end_time", window.end.to_string()),
        ("page_size", page_size.to_string()),
    ];
    if let Some(cursor) = page_token {
        query_params.push(("page_token", cursor.to_string()));
    }

    debug!(
        start = window.start,
        end = window.end,
        cursor = page_token.is_some(),
        "fetching notification page"
    );

    let builder = http
        .get(&url)
        .header("x-verkada-auth", token)
        .query(&query_params);
    let response = send_request_with_retry(builder, max_retries, "/cameras/v1/alerts").await?;

    Ok(response.json().await?)
}
