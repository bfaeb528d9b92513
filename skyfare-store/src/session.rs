use chrono::Duration;
use skyfare_catalog::DemandPricingConfig;
use skyfare_order::BookingDesk;
use skyfare_shared::Amount;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use crate::app_config::Config;

pub const ANONYMOUS_SESSION: &str = "anonymous";

pub type SessionHandle = Arc<Mutex<BookingDesk>>;

/// Per-user booking state, created lazily on first use.
///
/// Everything one user does runs under that user's desk mutex; the registry lock is
/// only held for lookup and insert.
pub struct SessionRegistry {
    initial_balance: Amount,
    pricing: DemandPricingConfig,
    offer_ttl: Duration,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(initial_balance: Amount, pricing: DemandPricingConfig, offer_ttl: Duration) -> Self {
        Self {
            initial_balance,
            pricing,
            offer_ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.wallet.initial_balance,
            config.pricing.clone(),
            Duration::seconds(config.catalog.offer_ttl_seconds),
        )
    }

    /// Blank keys share the anonymous session.
    pub async fn get_or_create(&self, key: &str) -> SessionHandle {
        let key = normalize_key(key);

        if let Some(handle) = self.sessions.read().await.get(key) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key.to_string())
            .or_insert_with(|| {
                tracing::debug!("Opening session {}", key);
                Arc::new(Mutex::new(BookingDesk::new(
                    self.initial_balance,
                    self.pricing.clone(),
                    self.offer_ttl,
                )))
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn normalize_key(key: &str) -> &str {
    let key = key.trim();
    if key.is_empty() {
        ANONYMOUS_SESSION
    } else {
        key
    }
}
