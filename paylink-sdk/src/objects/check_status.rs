//! Bodies for `POST /v1/check` — payment status lookup.

use crate::objects::{PaymentStatus, decimal_text};
use crate::signature::SignedFields;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request payload for checking a payment's status.
///
/// The signature covers `{now, order_id, shop_id}`. `now` is an opaque
/// caller-supplied nonce (string or numeric timestamp); it is signed but
/// not otherwise interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStatusRequest {
    pub now: String,
    pub shop_id: String,
    pub order_id: String,
    pub sign: String,
}

impl SignedFields for CheckStatusRequest {
    fn signed_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("now", self.now.clone()),
            ("order_id", self.order_id.clone()),
            ("shop_id", self.shop_id.clone()),
        ]
    }
}

/// Response payload for a found payment.
///
/// `amount_usdt`, `created_at`, and `processed_at` are present only when
/// `status == success`. The signed set follows the same rule:
/// `{shop_id, status, order_id}` plus the three extra fields for a
/// successful payment. `message` is never part of the signed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckStatusResponse {
    pub shop_id: String,
    pub status: PaymentStatus,
    /// Always `"ok"`; excluded from signing.
    pub message: String,
    pub order_id: String,
    #[serde(
        default,
        with = "crate::objects::decimal_number_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_usdt: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Absent for non-success; for a successful payment the field is
    /// always emitted, as `null` when settlement has not stamped it yet.
    /// An unstamped value signs as the empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<Option<String>>,
    pub sign: String,
}

impl SignedFields for CheckStatusResponse {
    fn signed_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("shop_id", self.shop_id.clone()),
            ("status", self.status.as_str().to_string()),
            ("order_id", self.order_id.clone()),
        ];
        if self.status == PaymentStatus::Success {
            fields.push((
                "amount_usdt",
                self.amount_usdt.as_ref().map(decimal_text).unwrap_or_default(),
            ));
            fields.push(("created_at", self.created_at.clone().unwrap_or_default()));
            fields.push((
                "processed_at",
                self.processed_at.clone().flatten().unwrap_or_default(),
            ));
        }
        fields
    }
}
