//! Exchange rate lookup for the create flow.
//!
//! The production source is the CoinGecko simple-price endpoint, queried
//! for the USDT price in the target currency. Every failure mode —
//! transport error, timeout, missing currency, zero or negative rate —
//! collapses to "unavailable"; the flow never retries.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Live exchange rate source.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Rate of one USDT in the given currency, or `None` if unavailable.
    async fn rate(&self, currency_code: &str) -> Option<Decimal>;
}

/// CoinGecko-backed [`RateSource`].
pub struct CoinGeckoRates {
    http: reqwest::Client,
    endpoint: Url,
}

impl CoinGeckoRates {
    /// Build a rate source against the given simple-price endpoint, with
    /// a hard timeout on each lookup.
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint,
        }
    }

    async fn fetch(&self, currency_code: &str) -> Result<Option<Decimal>, reqwest::Error> {
        let vs = currency_code.to_lowercase();
        let body: HashMap<String, HashMap<String, f64>> = self
            .http
            .get(self.endpoint.clone())
            .query(&[("ids", "tether"), ("vs_currencies", vs.as_str())])
            .send()
            .await?
            .json()
            .await?;

        let rate = body
            .get("tether")
            .and_then(|prices| prices.get(&vs))
            .copied()
            .and_then(Decimal::from_f64_retain);
        Ok(rate)
    }
}

#[async_trait]
impl RateSource for CoinGeckoRates {
    async fn rate(&self, currency_code: &str) -> Option<Decimal> {
        let rate = match self.fetch(currency_code).await {
            Ok(rate) => rate,
            Err(e) => {
                tracing::warn!(error = %e, currency = currency_code, "Exchange rate lookup failed");
                None
            }
        };
        // A zero or negative rate is as unusable as no rate at all.
        rate.filter(|r| r.is_sign_positive() && !r.is_zero())
    }
}
