//! Bodies for `POST /v1/create` — payment-link issuance.

use crate::objects::decimal_text;
use crate::signature::SignedFields;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request payload for creating a payment link.
///
/// Sent by the shop backend. The signature covers
/// `{amount, order_id, shop_currency, shop_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(with = "crate::objects::decimal_number")]
    pub amount: Decimal,
    pub order_id: String,
    pub shop_currency: i32,
    pub shop_id: String,
    pub sign: String,
}

impl SignedFields for CreateLinkRequest {
    fn signed_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("amount", decimal_text(&self.amount)),
            ("order_id", self.order_id.clone()),
            ("shop_currency", self.shop_currency.to_string()),
            ("shop_id", self.shop_id.clone()),
        ]
    }
}

/// Successful response for a created payment link.
///
/// The signature covers every field except `sign` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    /// Always `"true"`.
    pub status: String,
    pub payment_link: String,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub created_at: String,
    pub order_id: String,
    pub shop_currency: i32,
    #[serde(with = "crate::objects::decimal_number")]
    pub exchange_rate: Decimal,
    #[serde(with = "crate::objects::decimal_number")]
    pub amount_usdt: Decimal,
    pub sign: String,
}

impl SignedFields for CreateLinkResponse {
    fn signed_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("amount_usdt", decimal_text(&self.amount_usdt)),
            ("created_at", self.created_at.clone()),
            ("exchange_rate", decimal_text(&self.exchange_rate)),
            ("order_id", self.order_id.clone()),
            ("payment_link", self.payment_link.clone()),
            ("shop_currency", self.shop_currency.to_string()),
            ("status", self.status.clone()),
        ]
    }
}
