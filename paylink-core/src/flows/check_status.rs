//! Check flow: return a payment's stored status, signed.
//!
//! Linear with early exits: validate structure → look up shop →
//! verify signature → fetch payment record → build and sign the
//! response. Read-only; no mutation, no retry.
//!
//! Unlike the create flow, there is no active-status gate here. The
//! asymmetry is inherited from the system this one replaces and is
//! preserved on purpose.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::{FlowError, format_timestamp, require_fields};
use crate::store::{PaymentLinkStore, ShopDirectory};
use paylink_sdk::objects::{CheckStatusResponse, PaymentStatus};
use paylink_sdk::signature::{self, SignedFields};

const REQUIRED_FIELDS: [&str; 4] = ["now", "order_id", "shop_id", "sign"];
const SIGNED_FIELDS: [&str; 3] = ["now", "order_id", "shop_id"];

/// Orchestrates payment status checks against injected collaborators.
pub struct CheckStatusFlow {
    pub shops: Arc<dyn ShopDirectory>,
    pub links: Arc<dyn PaymentLinkStore>,
}

impl CheckStatusFlow {
    /// Run the check flow over a raw JSON object.
    pub async fn handle(&self, raw: &Map<String, Value>) -> Result<CheckStatusResponse, FlowError> {
        let fields = require_fields(raw, &REQUIRED_FIELDS)?;

        let shop_id = &fields["shop_id"];
        let order_id = &fields["order_id"];

        let shop = self
            .shops
            .shop(shop_id)
            .await?
            .ok_or(FlowError::UnknownShop)?;

        let signed = SIGNED_FIELDS.map(|name| (name, fields[name].clone()));
        if !signature::verify(signed, &shop.api_key, &fields["sign"]) {
            return Err(FlowError::BadSignature);
        }

        let link = self
            .links
            .find(shop_id, order_id)
            .await?
            .ok_or(FlowError::PaymentNotFound)?;

        let status: PaymentStatus = link.status.into();
        let mut response = CheckStatusResponse {
            shop_id: shop_id.clone(),
            status,
            message: "ok".to_string(),
            order_id: order_id.clone(),
            amount_usdt: None,
            created_at: None,
            processed_at: None,
            sign: String::new(),
        };

        if status == PaymentStatus::Success {
            response.amount_usdt = Some(link.amount_usdt);
            response.created_at = Some(format_timestamp(link.created_at));
            // Emitted as null until settlement stamps it; signs as "".
            response.processed_at = Some(link.processed_at.map(format_timestamp));
        }

        response.sign = response.sign_with(&shop.api_key);
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::PaymentStatus as DbStatus;
    use crate::entities::payment_links::PaymentLink;
    use crate::flows::testing::{FixtureLinks, FixtureShops, shop};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn flow(links: Arc<FixtureLinks>) -> CheckStatusFlow {
        CheckStatusFlow {
            shops: Arc::new(FixtureShops::with(vec![
                shop("S1", "secret", "active"),
                shop("S2", "secret2", "inactive"),
            ])),
            links,
        }
    }

    fn stored_link(shop_id: &str, order_id: &str, status: DbStatus) -> PaymentLink {
        PaymentLink {
            uuid: Uuid::new_v4(),
            order_id: order_id.to_string(),
            shop_id: shop_id.to_string(),
            amount: dec!(1000),
            amount_usdt: dec!(10.00),
            exchange_rate: dec!(100),
            currency_code: "RUB".to_string(),
            created_at: datetime!(2026-01-02 03:04:05),
            status,
            processed_at: match status {
                DbStatus::Success => Some(datetime!(2026-01-02 04:00:00)),
                _ => None,
            },
        }
    }

    fn signed_request(order_id: &str, shop_id: &str, key: &str) -> Map<String, Value> {
        let sign = signature::sign(
            vec![
                ("now", "1767315845".to_string()),
                ("order_id", order_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
            key,
        );
        json!({
            "now": "1767315845",
            "shop_id": shop_id,
            "order_id": order_id,
            "sign": sign,
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[tokio::test]
    async fn pending_payment_returns_short_signed_response() {
        let links = Arc::new(FixtureLinks::default());
        links.push(stored_link("S1", "A1", DbStatus::Pending));
        let resp = flow(links)
            .handle(&signed_request("A1", "S1", "secret"))
            .await
            .unwrap();

        assert_eq!(resp.status, PaymentStatus::Pending);
        assert_eq!(resp.message, "ok");
        assert!(resp.amount_usdt.is_none());
        assert!(resp.created_at.is_none());
        assert!(resp.processed_at.is_none());

        // Signed over exactly {order_id, shop_id, status}; message is not
        // part of the signed set.
        let expected = signature::sign(
            vec![
                ("order_id", "A1".to_string()),
                ("shop_id", "S1".to_string()),
                ("status", "pending".to_string()),
            ],
            "secret",
        );
        assert_eq!(resp.sign, expected);
    }

    #[tokio::test]
    async fn successful_payment_includes_settlement_fields_in_signature() {
        let links = Arc::new(FixtureLinks::default());
        links.push(stored_link("S1", "A1", DbStatus::Success));
        let resp = flow(links)
            .handle(&signed_request("A1", "S1", "secret"))
            .await
            .unwrap();

        assert_eq!(resp.status, PaymentStatus::Success);
        assert_eq!(resp.amount_usdt, Some(dec!(10.00)));
        assert_eq!(resp.created_at.as_deref(), Some("2026-01-02 03:04:05"));
        assert_eq!(
            resp.processed_at,
            Some(Some("2026-01-02 04:00:00".to_string()))
        );

        let expected = signature::sign(
            vec![
                ("amount_usdt", "10".to_string()),
                ("created_at", "2026-01-02 03:04:05".to_string()),
                ("order_id", "A1".to_string()),
                ("processed_at", "2026-01-02 04:00:00".to_string()),
                ("shop_id", "S1".to_string()),
                ("status", "success".to_string()),
            ],
            "secret",
        );
        assert_eq!(resp.sign, expected);
    }

    #[tokio::test]
    async fn unstamped_success_emits_null_processed_at() {
        let links = Arc::new(FixtureLinks::default());
        let mut link = stored_link("S1", "A1", DbStatus::Success);
        link.processed_at = None;
        links.push(link);
        let resp = flow(links)
            .handle(&signed_request("A1", "S1", "secret"))
            .await
            .unwrap();

        assert_eq!(resp.processed_at, Some(None));
        let body = serde_json::to_value(&resp).unwrap();
        assert!(body["processed_at"].is_null());

        let expected = signature::sign(
            vec![
                ("amount_usdt", "10".to_string()),
                ("created_at", "2026-01-02 03:04:05".to_string()),
                ("order_id", "A1".to_string()),
                ("processed_at", String::new()),
                ("shop_id", "S1".to_string()),
                ("status", "success".to_string()),
            ],
            "secret",
        );
        assert_eq!(resp.sign, expected);
    }

    #[tokio::test]
    async fn failed_payment_uses_short_signed_set() {
        let links = Arc::new(FixtureLinks::default());
        links.push(stored_link("S1", "A1", DbStatus::Failed));
        let resp = flow(links)
            .handle(&signed_request("A1", "S1", "secret"))
            .await
            .unwrap();
        assert_eq!(resp.status, PaymentStatus::Failed);
        assert!(resp.amount_usdt.is_none());
    }

    #[tokio::test]
    async fn missing_payment_is_not_found() {
        let err = flow(Arc::new(FixtureLinks::default()))
            .handle(&signed_request("A1", "S1", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::PaymentNotFound));
    }

    #[tokio::test]
    async fn unknown_shop_is_rejected() {
        let err = flow(Arc::new(FixtureLinks::default()))
            .handle(&signed_request("A1", "S9", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::UnknownShop));
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_record_fetch() {
        let links = Arc::new(FixtureLinks::default());
        links.push(stored_link("S1", "A1", DbStatus::Pending));
        let mut raw = signed_request("A1", "S1", "secret");
        raw.insert("now".to_string(), json!("1767315846"));
        let err = flow(links).handle(&raw).await.unwrap_err();
        assert!(matches!(err, FlowError::BadSignature));
    }

    #[tokio::test]
    async fn inactive_shop_is_still_served() {
        // The create flow gates on shop status; the check flow does not.
        let links = Arc::new(FixtureLinks::default());
        links.push(stored_link("S2", "A1", DbStatus::Pending));
        let resp = flow(links)
            .handle(&signed_request("A1", "S2", "secret2"))
            .await
            .unwrap();
        assert_eq!(resp.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn numeric_now_field_is_accepted() {
        let links = Arc::new(FixtureLinks::default());
        links.push(stored_link("S1", "A1", DbStatus::Pending));
        let sign = signature::sign(
            vec![
                ("now", "1767315845".to_string()),
                ("order_id", "A1".to_string()),
                ("shop_id", "S1".to_string()),
            ],
            "secret",
        );
        let raw = json!({
            "now": 1767315845u64,
            "shop_id": "S1",
            "order_id": "A1",
            "sign": sign,
        });
        let resp = flow(links).handle(raw.as_object().unwrap()).await.unwrap();
        assert_eq!(resp.status, PaymentStatus::Pending);
    }
}
