//! Application state shared across all request handlers.

use crate::config::file::FileConfig;
use paylink_core::flows::{CheckStatusFlow, CreateLinkConfig, CreateLinkFlow};
use paylink_core::rates::CoinGeckoRates;
use paylink_core::store::PgStore;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Configuration is consumed at construction time; nothing here reads
/// ambient process state.
#[derive(Clone)]
pub struct AppState {
    /// Create-flow orchestrator.
    pub create_flow: Arc<CreateLinkFlow>,
    /// Check-flow orchestrator.
    pub check_flow: Arc<CheckStatusFlow>,
}

impl AppState {
    /// Wire the flows to their production collaborators.
    pub fn new(db: PgPool, config: &FileConfig) -> Self {
        let store = Arc::new(PgStore::new(db));
        let rates = Arc::new(CoinGeckoRates::new(
            config.rates.endpoint.clone(),
            Duration::from_secs(config.rates.timeout_secs),
        ));

        let create_flow = Arc::new(CreateLinkFlow {
            shops: store.clone(),
            currencies: store.clone(),
            links: store.clone(),
            rates,
            config: CreateLinkConfig {
                link_base: config.payment.link_base.clone(),
            },
        });
        let check_flow = Arc::new(CheckStatusFlow {
            shops: store.clone(),
            links: store,
        });

        Self {
            create_flow,
            check_flow,
        }
    }
}
