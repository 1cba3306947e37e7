//! Collaborator boundaries for the flow orchestrators.
//!
//! The flows depend on these traits rather than on the database directly,
//! so tests can substitute in-memory fixtures and the production wiring
//! stays a construction-time decision. `PgStore` is the Postgres-backed
//! implementation, delegating to the `kanau` processors in `entities`.

use async_trait::async_trait;
use kanau::processor::Processor;
use sqlx::PgPool;

use crate::entities::payment_links::{
    GetPaymentLink, InsertLinkError, InsertPaymentLink, PaymentLink, PaymentLinkExists,
};
use crate::entities::shop_currency::GetCurrencyCode;
use crate::entities::shops::{GetShop, Shop};
use crate::framework::DatabaseProcessor;

/// Errors from the backing store, opaque to callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors from inserting a payment link through the store boundary.
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// A link already exists for this `(shop_id, order_id)` pair.
    #[error("duplicate payment link")]
    Duplicate,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shop lookup: API key and status.
#[async_trait]
pub trait ShopDirectory: Send + Sync {
    async fn shop(&self, shop_id: &str) -> Result<Option<Shop>, StoreError>;
}

/// Numeric currency code to canonical code resolution.
#[async_trait]
pub trait CurrencyDirectory: Send + Sync {
    async fn code_for(&self, num: i32) -> Result<Option<String>, StoreError>;
}

/// Payment link persistence: find, existence pre-check, insert.
#[async_trait]
pub trait PaymentLinkStore: Send + Sync {
    async fn find(&self, shop_id: &str, order_id: &str) -> Result<Option<PaymentLink>, StoreError>;

    async fn exists(&self, shop_id: &str, order_id: &str) -> Result<bool, StoreError>;

    /// Insert a new link. Must report [`InsertError::Duplicate`] when the
    /// `(shop_id, order_id)` uniqueness invariant is violated, so the
    /// create flow can close its check-then-act race.
    async fn insert(&self, link: InsertPaymentLink) -> Result<(), InsertError>;
}

/// Postgres-backed implementation of all three store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn processor(&self) -> DatabaseProcessor {
        DatabaseProcessor {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait]
impl ShopDirectory for PgStore {
    async fn shop(&self, shop_id: &str) -> Result<Option<Shop>, StoreError> {
        let shop = self
            .processor()
            .process(GetShop {
                shop_id: shop_id.to_string(),
            })
            .await?;
        Ok(shop)
    }
}

#[async_trait]
impl CurrencyDirectory for PgStore {
    async fn code_for(&self, num: i32) -> Result<Option<String>, StoreError> {
        let code = self.processor().process(GetCurrencyCode { num }).await?;
        Ok(code)
    }
}

#[async_trait]
impl PaymentLinkStore for PgStore {
    async fn find(&self, shop_id: &str, order_id: &str) -> Result<Option<PaymentLink>, StoreError> {
        let link = self
            .processor()
            .process(GetPaymentLink {
                shop_id: shop_id.to_string(),
                order_id: order_id.to_string(),
            })
            .await?;
        Ok(link)
    }

    async fn exists(&self, shop_id: &str, order_id: &str) -> Result<bool, StoreError> {
        let exists = self
            .processor()
            .process(PaymentLinkExists {
                shop_id: shop_id.to_string(),
                order_id: order_id.to_string(),
            })
            .await?;
        Ok(exists)
    }

    async fn insert(&self, link: InsertPaymentLink) -> Result<(), InsertError> {
        match self.processor().process(link).await {
            Ok(()) => Ok(()),
            Err(InsertLinkError::Duplicate) => Err(InsertError::Duplicate),
            Err(InsertLinkError::Database(e)) => Err(InsertError::Store(StoreError::Database(e))),
        }
    }
}
