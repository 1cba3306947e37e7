//! HTTP client for the paylink gateway.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod shop;

pub use shop::ShopClient;

use crate::objects::FailureResponse;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway reported a logical failure (`status: "false"`).
    #[error("api error: {0}")]
    Api(String),

    /// The response signature did not verify against the shop's API key.
    #[error("response signature verification failed")]
    BadResponseSignature,

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<FailureResponse> for ClientError {
    fn from(failure: FailureResponse) -> Self {
        ClientError::Api(failure.error)
    }
}
