//! Flow orchestrators for the two API operations.
//!
//! Both flows run a fixed sequence of checks; the first failing check
//! terminates the flow with exactly one [`FlowError`], whose `Display`
//! text is the wire-visible error message. There is no retry, rollback,
//! or multi-error aggregation.

pub mod check_status;
pub mod create_link;

pub use check_status::CheckStatusFlow;
pub use create_link::{CreateLinkConfig, CreateLinkFlow};

use crate::store::StoreError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Terminal outcomes of a flow. `Display` is the exact error string
/// returned to the caller; internal detail stays in the log.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid request structure")]
    InvalidStructure,

    #[error("Invalid shop_id")]
    UnknownShop,

    #[error("Shop is not active")]
    InactiveShop,

    #[error("Invalid signature")]
    BadSignature,

    #[error("Payment link for this order has already been generated")]
    DuplicateOrder,

    #[error("Invalid currency number")]
    UnknownCurrency,

    #[error("Failed to obtain exchange rate")]
    RateUnavailable,

    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Internal error")]
    Internal(#[from] StoreError),
}

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Render a stored timestamp as `YYYY-MM-DD HH:MM:SS` (UTC, no suffix).
pub fn format_timestamp(dt: PrimitiveDateTime) -> String {
    // Infallible for this format description.
    dt.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

/// Current UTC time as a naive timestamp, matching the store column.
pub(crate) fn now_utc() -> PrimitiveDateTime {
    let now = time::OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// The literal text a JSON scalar contributes to the canonical signing
/// string: strings as-is, numbers via [`number_text`], booleans via their
/// JSON rendering.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Signing text for a JSON number. Callers stringify numbers the way
/// their runtimes do, where `1000.00` renders as `"1000"`, so an
/// integral float drops its fractional suffix here.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Falsy per the legacy validation: absent, null, `false`, `0`, `""`.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Structural validation: every named field must be present, truthy, and
/// scalar. Runs before any signature, store, or network work.
pub(crate) fn require_fields(
    raw: &Map<String, Value>,
    names: &[&'static str],
) -> Result<BTreeMap<&'static str, String>, FlowError> {
    let mut fields = BTreeMap::new();
    for name in names {
        let value = raw.get(*name).ok_or(FlowError::InvalidStructure)?;
        if is_falsy(value) {
            return Err(FlowError::InvalidStructure);
        }
        let text = scalar_text(value).ok_or(FlowError::InvalidStructure)?;
        fields.insert(*name, text);
    }
    Ok(fields)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    //! In-memory collaborator fixtures shared by the flow tests.

    use crate::entities::PaymentStatus;
    use crate::entities::payment_links::{InsertPaymentLink, PaymentLink};
    use crate::entities::shops::Shop;
    use crate::rates::RateSource;
    use crate::store::{
        CurrencyDirectory, InsertError, PaymentLinkStore, ShopDirectory, StoreError,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub fn shop(shop_id: &str, api_key: &str, status: &str) -> Shop {
        Shop {
            shop_id: shop_id.to_string(),
            api_key: api_key.to_string(),
            status: status.to_string(),
        }
    }

    pub struct FixtureShops(HashMap<String, Shop>);

    impl FixtureShops {
        pub fn with(shops: Vec<Shop>) -> Self {
            Self(shops.into_iter().map(|s| (s.shop_id.clone(), s)).collect())
        }
    }

    #[async_trait]
    impl ShopDirectory for FixtureShops {
        async fn shop(&self, shop_id: &str) -> Result<Option<Shop>, StoreError> {
            Ok(self.0.get(shop_id).cloned())
        }
    }

    pub struct FixtureCurrencies(HashMap<i32, String>);

    impl FixtureCurrencies {
        pub fn with(codes: Vec<(i32, &str)>) -> Self {
            Self(codes.into_iter().map(|(n, c)| (n, c.to_string())).collect())
        }
    }

    #[async_trait]
    impl CurrencyDirectory for FixtureCurrencies {
        async fn code_for(&self, num: i32) -> Result<Option<String>, StoreError> {
            Ok(self.0.get(&num).cloned())
        }
    }

    #[derive(Default)]
    pub struct FixtureLinks {
        rows: Mutex<Vec<PaymentLink>>,
        // When set, exists() lies and reports false, so the insert-time
        // duplicate path can be exercised.
        hide_exists: bool,
    }

    impl FixtureLinks {
        pub fn hide_from_exists(mut self) -> Self {
            self.hide_exists = true;
            self
        }

        pub fn rows(&self) -> Vec<PaymentLink> {
            self.rows.lock().unwrap().clone()
        }

        pub fn push(&self, link: PaymentLink) {
            self.rows.lock().unwrap().push(link);
        }
    }

    #[async_trait]
    impl PaymentLinkStore for FixtureLinks {
        async fn find(
            &self,
            shop_id: &str,
            order_id: &str,
        ) -> Result<Option<PaymentLink>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.shop_id == shop_id && l.order_id == order_id)
                .cloned())
        }

        async fn exists(&self, shop_id: &str, order_id: &str) -> Result<bool, StoreError> {
            if self.hide_exists {
                return Ok(false);
            }
            Ok(self.find(shop_id, order_id).await?.is_some())
        }

        async fn insert(&self, link: InsertPaymentLink) -> Result<(), InsertError> {
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|l| l.shop_id == link.shop_id && l.order_id == link.order_id)
            {
                return Err(InsertError::Duplicate);
            }
            rows.push(PaymentLink {
                uuid: link.uuid,
                order_id: link.order_id,
                shop_id: link.shop_id,
                amount: link.amount,
                amount_usdt: link.amount_usdt,
                exchange_rate: link.exchange_rate,
                currency_code: link.currency_code,
                created_at: link.created_at,
                status: PaymentStatus::Pending,
                processed_at: None,
            });
            Ok(())
        }
    }

    pub struct FixedRate(pub Option<Decimal>);

    #[async_trait]
    impl RateSource for FixedRate {
        async fn rate(&self, _currency_code: &str) -> Option<Decimal> {
            self.0
        }
    }
}
