//! Shop client (merchant backend → paylink gateway).
//!
//! Signs outbound requests with the shop API key and verifies the
//! signature on every response before handing it back.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use url::Url;

use super::ClientError;
use crate::objects::{CheckStatusRequest, CheckStatusResponse, CreateLinkRequest, CreateLinkResponse, FailureResponse};
use crate::signature::SignedFields;

/// Typed HTTP client for a single shop.
///
/// Every request body carries a `sign` field computed over the flow's
/// signed field set with the shop's API key.
#[derive(Debug, Clone)]
pub struct ShopClient {
    http: Client,
    base_url: Url,
    shop_id: String,
    api_key: String,
}

impl ShopClient {
    /// Create a new `ShopClient`.
    ///
    /// * `base_url` – root URL of the gateway (e.g. `https://pay.example.com`).
    /// * `shop_id` / `api_key` – the shop's credentials.
    pub fn new(base_url: Url, shop_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            shop_id: shop_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /v1/create` – issue a payment link for an order.
    pub async fn create_link(
        &self,
        amount: Decimal,
        order_id: impl Into<String>,
        shop_currency: i32,
    ) -> Result<CreateLinkResponse, ClientError> {
        let mut body = CreateLinkRequest {
            amount,
            order_id: order_id.into(),
            shop_currency,
            shop_id: self.shop_id.clone(),
            sign: String::new(),
        };
        body.sign = body.sign_with(&self.api_key);

        let resp: CreateLinkResponse = self.post("/v1/create", &body).await?;
        if !resp.verify_with(&self.api_key, &resp.sign) {
            return Err(ClientError::BadResponseSignature);
        }
        Ok(resp)
    }

    /// `POST /v1/check` – look up the status of an existing payment.
    pub async fn check_status(
        &self,
        order_id: impl Into<String>,
    ) -> Result<CheckStatusResponse, ClientError> {
        let mut body = CheckStatusRequest {
            now: OffsetDateTime::now_utc().unix_timestamp().to_string(),
            shop_id: self.shop_id.clone(),
            order_id: order_id.into(),
            sign: String::new(),
        };
        body.sign = body.sign_with(&self.api_key);

        let resp: CheckStatusResponse = self.post("/v1/check", &body).await?;
        if !resp.verify_with(&self.api_key, &resp.sign) {
            return Err(ClientError::BadResponseSignature);
        }
        Ok(resp)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.base_url.join(path)?;
        let resp = self.http.post(url).json(body).send().await?;
        let bytes = resp.bytes().await?;

        // Logical failures come back with HTTP 200 and status: "false",
        // so sniff the body before the typed parse.
        if let Ok(failure) = serde_json::from_slice::<FailureResponse>(&bytes) {
            if failure.status == "false" {
                return Err(failure.into());
            }
        }
        serde_json::from_slice(&bytes).map_err(ClientError::Json)
    }
}
