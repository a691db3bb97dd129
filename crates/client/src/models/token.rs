//! Token endpoint response model.

use serde::Deserialize;

/// Response from `POST /token`.
///
/// The server also reports its own expiry, but the client applies a fixed
/// assumed lifetime instead of trusting it (see the config crate constants).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
