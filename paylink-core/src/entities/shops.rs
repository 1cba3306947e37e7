use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// A merchant account holding the shared signing secret.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Shop {
    pub shop_id: String,
    pub api_key: String,
    pub status: String,
}

impl Shop {
    /// The legacy store keeps status as free text; matching is
    /// case-insensitive against `active`.
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Look up a shop by its identifier.
#[derive(Debug, Clone)]
pub struct GetShop {
    pub shop_id: String,
}

impl Processor<GetShop> for DatabaseProcessor {
    type Output = Option<Shop>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetShop")]
    async fn process(&self, query: GetShop) -> Result<Option<Shop>, sqlx::Error> {
        sqlx::query_as::<_, Shop>(
            r#"
            SELECT shop_id, api_key, status
            FROM shops
            WHERE shop_id = $1
            "#,
        )
        .bind(query.shop_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_status_is_case_insensitive() {
        let mut shop = Shop {
            shop_id: "S1".to_string(),
            api_key: "secret".to_string(),
            status: "Active".to_string(),
        };
        assert!(shop.is_active());
        shop.status = "inactive".to_string();
        assert!(!shop.is_active());
        shop.status = "ACTIVE".to_string();
        assert!(shop.is_active());
    }
}
