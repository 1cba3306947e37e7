use crate::entities::PaymentStatus;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use uuid::Uuid;

/// One issued payment link. Rows are created by the create flow and
/// mutated only out-of-band (settlement marks `success`/`failed` and
/// fills `processed_at`).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaymentLink {
    pub uuid: Uuid,
    pub order_id: String,
    pub shop_id: String,
    pub amount: rust_decimal::Decimal,
    pub amount_usdt: rust_decimal::Decimal,
    pub exchange_rate: rust_decimal::Decimal,
    pub currency_code: String,
    pub created_at: time::PrimitiveDateTime,
    pub status: PaymentStatus,
    pub processed_at: Option<time::PrimitiveDateTime>,
}

/// Fetch a payment link by its `(shop_id, order_id)` pair.
#[derive(Debug, Clone)]
pub struct GetPaymentLink {
    pub shop_id: String,
    pub order_id: String,
}

impl Processor<GetPaymentLink> for DatabaseProcessor {
    type Output = Option<PaymentLink>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPaymentLink")]
    async fn process(&self, query: GetPaymentLink) -> Result<Option<PaymentLink>, sqlx::Error> {
        sqlx::query_as::<_, PaymentLink>(
            r#"
            SELECT uuid, order_id, shop_id, amount, amount_usdt, exchange_rate,
                   currency_code, created_at, status, processed_at
            FROM payment_links
            WHERE shop_id = $1 AND order_id = $2
            "#,
        )
        .bind(query.shop_id)
        .bind(query.order_id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Check whether a link already exists for `(shop_id, order_id)`.
#[derive(Debug, Clone)]
pub struct PaymentLinkExists {
    pub shop_id: String,
    pub order_id: String,
}

impl Processor<PaymentLinkExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:PaymentLinkExists")]
    async fn process(&self, query: PaymentLinkExists) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM payment_links
            WHERE shop_id = $1 AND order_id = $2
            "#,
        )
        .bind(query.shop_id)
        .bind(query.order_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}

/// Errors from inserting a payment link.
#[derive(Debug, thiserror::Error)]
pub enum InsertLinkError {
    /// The `(shop_id, order_id)` uniqueness constraint fired. Two
    /// concurrent create requests can both pass the existence pre-check;
    /// the constraint is what actually serializes them.
    #[error("payment link already exists for this order")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert a freshly issued payment link with status `pending`.
#[derive(Debug, Clone)]
pub struct InsertPaymentLink {
    pub uuid: Uuid,
    pub order_id: String,
    pub shop_id: String,
    pub amount: rust_decimal::Decimal,
    pub amount_usdt: rust_decimal::Decimal,
    pub exchange_rate: rust_decimal::Decimal,
    pub currency_code: String,
    pub created_at: time::PrimitiveDateTime,
}

impl Processor<InsertPaymentLink> for DatabaseProcessor {
    type Output = ();
    type Error = InsertLinkError;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertPaymentLink")]
    async fn process(&self, insert: InsertPaymentLink) -> Result<(), InsertLinkError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payment_links
                (uuid, order_id, shop_id, amount, amount_usdt, exchange_rate,
                 currency_code, created_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            "#,
        )
        .bind(insert.uuid)
        .bind(insert.order_id)
        .bind(insert.shop_id)
        .bind(insert.amount)
        .bind(insert.amount_usdt)
        .bind(insert.exchange_rate)
        .bind(insert.currency_code)
        .bind(insert.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(InsertLinkError::Duplicate)
            }
            Err(e) => Err(InsertLinkError::Database(e)),
        }
    }
}
