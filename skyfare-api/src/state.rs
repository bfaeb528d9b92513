use std::sync::Arc;
use axum::http::HeaderMap;
use skyfare_catalog::SyntheticCatalog;
use skyfare_core::FlightCatalog;
use skyfare_store::{Config, SessionHandle, SessionRegistry, ANONYMOUS_SESSION};

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub catalog: Arc<dyn FlightCatalog>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::from_config(config)),
            catalog: Arc::new(SyntheticCatalog::new(config.catalog.batch_size)),
        }
    }

    /// Desk of the caller named by the session header, or the anonymous one.
    pub async fn session(&self, headers: &HeaderMap) -> SessionHandle {
        let key = headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(ANONYMOUS_SESSION);
        self.sessions.get_or_create(key).await
    }
}
