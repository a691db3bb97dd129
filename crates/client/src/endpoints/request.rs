//! Retry helper for HTTP requests with exponential backoff.
//!
//! Every outbound call goes through [`send_request_with_retry`], which:
//! - retries transient failures (connect/timeout errors, HTTP 429, and the
//!   502/503/504 gateway statuses) with exponential backoff (1s, 2s, 4s);
//! - maps HTTP 401 to [`ClientError::TokenExpired`] WITHOUT retrying, so the
//!   caller can perform its one-shot token refresh outside the transient
//!   budget;
//! - surfaces any other non-success status immediately as
//!   [`ClientError::ApiError`];
//! - returns [`ClientError::MaxRetriesExceeded`] carrying the last underlying
//!   failure once the budget is exhausted.

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Error body returned by the Verkada API, e.g.
/// `{"id": "0e2d", "message": "Token expired", "data": null}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends an HTTP request, retrying transient failures up to `max_retries`
/// times beyond the initial attempt.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
) -> Result<Response> {
    let mut last_err: Option<ClientError> = None;

    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                // Streaming bodies cannot be replayed; fall back to a single
                // attempt on the original builder.
                if attempt == 0 {
                    debug!(endpoint, "request builder cannot be cloned, single attempt only");
                    let response = builder.send().await?;
                    return into_result(response).await;
                }
                return Err(ClientError::MaxRetriesExceeded(
                    attempt,
                    Box::new(last_err.take().unwrap_or(ClientError::InvalidResponse(
                        "request builder not clonable for retry".to_string(),
                    ))),
                ));
            }
        };

        let outcome = match attempt_builder.send().await {
            Ok(response) => into_result(response).await,
            Err(e) => Err(ClientError::from(e)),
        };

        match outcome {
            Ok(response) => {
                if attempt > 0 {
                    debug!(endpoint, attempt = attempt + 1, "request succeeded after retry");
                }
                return Ok(response);
            }
            Err(err) if err.is_retryable() => {
                if attempt < max_retries {
                    let backoff_secs = 2u64.pow(attempt as u32);
                    debug!(
                        endpoint,
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        backoff_secs,
                        error = %err,
                        "transient failure, retrying with exponential backoff"
                    );
                    tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
                    last_err = Some(err);
                } else {
                    debug!(
                        endpoint,
                        attempts = max_retries + 1,
                        "retry budget exhausted"
                    );
                    return Err(ClientError::MaxRetriesExceeded(
                        max_retries + 1,
                        Box::new(err),
                    ));
                }
            }
            Err(err) => return Err(err),
        }
    }

    Err(ClientError::MaxRetriesExceeded(
        max_retries + 1,
        Box::new(last_err.unwrap_or(ClientError::InvalidResponse(
            "retry loop ended without an error".to_string(),
        ))),
    ))
}

/// Map a non-success response to the client error taxonomy.
async fn into_result(response: Response) -> Result<Response> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "could not read error response body".to_string());
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    };

    if status == 401 {
        return Err(ClientError::TokenExpired { url, message });
    }

    Err(ClientError::ApiError {
        status,
        url,
        message,
    })
}
