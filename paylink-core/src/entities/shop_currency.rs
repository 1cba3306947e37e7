use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// Resolve a shop-scoped numeric currency code (e.g. `643`) to the
/// canonical currency code used for rate lookups (e.g. `RUB`).
#[derive(Debug, Clone, Copy)]
pub struct GetCurrencyCode {
    pub num: i32,
}

impl Processor<GetCurrencyCode> for DatabaseProcessor {
    type Output = Option<String>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCurrencyCode")]
    async fn process(&self, query: GetCurrencyCode) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT code
            FROM shop_currency
            WHERE num = $1
            "#,
        )
        .bind(query.num)
        .fetch_optional(&self.pool)
        .await
    }
}
