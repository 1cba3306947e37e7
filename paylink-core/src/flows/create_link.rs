//! Create flow: issue a signed payment link for an order.
//!
//! Linear state machine with early exits:
//! validate structure → look up shop → check active → verify signature →
//! reject duplicate order → resolve currency code → fetch exchange rate →
//! compute stablecoin amount → generate identifier → persist → build and
//! sign the response.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use super::{FlowError, format_timestamp, now_utc, require_fields};
use crate::entities::payment_links::InsertPaymentLink;
use crate::rates::RateSource;
use crate::store::{CurrencyDirectory, InsertError, PaymentLinkStore, ShopDirectory};
use paylink_sdk::objects::CreateLinkResponse;
use paylink_sdk::signature::{self, SignedFields};

const REQUIRED_FIELDS: [&str; 5] = ["amount", "order_id", "shop_currency", "shop_id", "sign"];
const SIGNED_FIELDS: [&str; 4] = ["amount", "order_id", "shop_currency", "shop_id"];

/// Construction-time configuration for the create flow.
#[derive(Debug, Clone)]
pub struct CreateLinkConfig {
    /// Base URL the payment page is served from; links are
    /// `<link_base>/pay/<uuid>`.
    pub link_base: Url,
}

/// Orchestrates payment-link issuance against injected collaborators.
pub struct CreateLinkFlow {
    pub shops: Arc<dyn ShopDirectory>,
    pub currencies: Arc<dyn CurrencyDirectory>,
    pub links: Arc<dyn PaymentLinkStore>,
    pub rates: Arc<dyn RateSource>,
    pub config: CreateLinkConfig,
}

impl CreateLinkFlow {
    /// Run the create flow over a raw JSON object.
    ///
    /// The inbound signature is computed over the literal text of the
    /// JSON scalars as received, so validation and verification happen
    /// before any typed conversion.
    pub async fn handle(&self, raw: &Map<String, Value>) -> Result<CreateLinkResponse, FlowError> {
        let fields = require_fields(raw, &REQUIRED_FIELDS)?;

        let shop_id = &fields["shop_id"];
        let order_id = &fields["order_id"];

        let shop = self
            .shops
            .shop(shop_id)
            .await?
            .ok_or(FlowError::UnknownShop)?;

        // Inactive shops are rejected before the signature is even looked
        // at; the check flow deliberately has no such gate.
        if !shop.is_active() {
            return Err(FlowError::InactiveShop);
        }

        let signed = SIGNED_FIELDS.map(|name| (name, fields[name].clone()));
        if !signature::verify(signed, &shop.api_key, &fields["sign"]) {
            return Err(FlowError::BadSignature);
        }

        if self.links.exists(shop_id, order_id).await? {
            return Err(FlowError::DuplicateOrder);
        }

        let shop_currency: i32 = fields["shop_currency"]
            .parse()
            .map_err(|_| FlowError::InvalidStructure)?;
        let amount = parse_amount(&fields["amount"])?;

        let currency_code = self
            .currencies
            .code_for(shop_currency)
            .await?
            .ok_or(FlowError::UnknownCurrency)?;

        let exchange_rate = self
            .rates
            .rate(&currency_code)
            .await
            .ok_or(FlowError::RateUnavailable)?;

        // Documented rounding contract: two decimal places, half away
        // from zero.
        let amount_usdt =
            (amount / exchange_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let uuid = Uuid::new_v4();
        let created_at = now_utc();

        self.links
            .insert(InsertPaymentLink {
                uuid,
                order_id: order_id.clone(),
                shop_id: shop_id.clone(),
                amount,
                amount_usdt,
                exchange_rate,
                currency_code,
                created_at,
            })
            .await
            .map_err(|e| match e {
                InsertError::Duplicate => FlowError::DuplicateOrder,
                InsertError::Store(s) => FlowError::Internal(s),
            })?;

        let mut response = CreateLinkResponse {
            status: "true".to_string(),
            payment_link: self.payment_link(uuid),
            created_at: format_timestamp(created_at),
            order_id: order_id.clone(),
            shop_currency,
            exchange_rate,
            amount_usdt,
            sign: String::new(),
        };
        response.sign = response.sign_with(&shop.api_key);
        Ok(response)
    }

    fn payment_link(&self, uuid: Uuid) -> String {
        let mut url = self.config.link_base.clone();
        url.set_path(&format!("/pay/{uuid}"));
        url.to_string()
    }
}

fn parse_amount(text: &str) -> Result<Decimal, FlowError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| FlowError::InvalidStructure)
}
