//! Token acquisition endpoint.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::models::TokenResponse;

/// Exchange the top-level API key for a short-lived API token.
///
/// A 401 or 403 here means the key itself was rejected, which is fatal and
/// never retried. Transient failures still go through the shared retry loop.
pub async fn get_token(
    http: &Client,
    base_url: &str,
    api_key: &SecretString,
    max_retries: usize,
) -> Result<String> {
    let url = format!("{}/token", base_url);
    debug!("acquiring API token");

    let builder = http
        .post(&url)
        .header("x-api-key", api_key.expose_secret())
        .header("Content-Type", "application/json");

    let response = match send_request_with_retry(builder, max_retries, "/token").await {
        Ok(response) => response,
        Err(ClientError::TokenExpired { message, .. }) => {
            return Err(ClientError::AuthFailed(message));
        }
        Err(ClientError::ApiError {
            status: 403,
            message,
            ..
        }) => {
            return Err(ClientError::AuthFailed(message));
        }
        Err(e) => return Err(e),
    };

    let resp: TokenResponse = response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("token response: {}", e)))?;
    Ok(resp.token)
}
