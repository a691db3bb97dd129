//! Common test utilities for integration tests.

use secrecy::SecretString;
use std::time::Duration;

use verkada_client::VerkadaClient;

#[allow(unused_imports)]
pub use wiremock::matchers::{header, method, path, query_param};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a client against a mock server, caching credentials in `dir`.
pub fn client_for(server: &MockServer, dir: &tempfile::TempDir, max_retries: usize) -> VerkadaClient {
    VerkadaClient::builder()
        .base_url(server.uri())
        .api_key(SecretString::new("test-api-key".to_string().into()))
        .max_retries(max_retries)
        .timeout(Duration::from_secs(5))
        .credential_path(dir.path().join("credential.json"))
        .build()
        .expect("client should build")
}

/// Mount the token endpoint returning a fixed token.
#[allow(dead_code)]
pub async fn mount_token_endpoint(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("x-api-key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": token
        })))
        .mount(server)
        .await;
}
