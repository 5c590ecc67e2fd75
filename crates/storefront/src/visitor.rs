//! Per-visitor state.
//!
//! Each browser session owns its own [`ProductStore`] and [`OrderBook`].
//! The session cookie carries only a visitor id; the state itself lives in
//! an in-memory registry and is evicted after a period of inactivity.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use moka::future::Cache;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::debug;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;
use crate::store::ProductStore;
use crate::tracking::OrderBook;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "emberline_vid";

/// Upper bound on live visitors held in memory.
const MAX_VISITORS: u64 = 10_000;

/// State owned by one visitor.
#[derive(Clone)]
pub struct Visitor {
    pub id: Uuid,
    pub products: Arc<ProductStore>,
    pub orders: Arc<OrderBook>,
}

impl Visitor {
    fn new(id: Uuid, client: &ApiClient) -> Self {
        Self {
            id,
            products: Arc::new(ProductStore::new(client.clone())),
            orders: Arc::new(OrderBook::new(client.clone())),
        }
    }
}

/// Registry of live visitors.
#[derive(Clone)]
pub struct VisitorRegistry {
    client: ApiClient,
    visitors: Cache<Uuid, Visitor>,
}

impl VisitorRegistry {
    /// Create a registry that drops visitors idle for longer than `idle`.
    #[must_use]
    pub fn new(client: ApiClient, idle: Duration) -> Self {
        let visitors = Cache::builder()
            .max_capacity(MAX_VISITORS)
            .time_to_idle(idle)
            .build();

        Self { client, visitors }
    }

    /// State for `id`, created on first use.
    pub async fn get_or_create(&self, id: Uuid) -> Visitor {
        self.visitors
            .get_with(id, async {
                debug!(visitor_id = %id, "New visitor");
                Visitor::new(id, &self.client)
            })
            .await
    }

    /// Number of visitors currently held.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.visitors.entry_count()
    }

    /// Whether no visitors are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Create the session layer that issues visitor cookies.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let idle = time::Duration::seconds(
        i64::try_from(config.visitor_idle.as_secs()).unwrap_or(i64::MAX),
    );

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(idle))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor for the current visitor's state.
///
/// Assigns a fresh visitor id to sessions that do not have one yet.
pub struct CurrentVisitor(pub Visitor);

impl<S> FromRequestParts<S> for CurrentVisitor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let stored: Option<Uuid> = session
            .get(session_keys::VISITOR_ID)
            .await
            .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?;

        let id = match stored {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session
                    .insert(session_keys::VISITOR_ID, id)
                    .await
                    .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
                id
            }
        };

        tracing::Span::current().record("visitor_id", tracing::field::display(id));

        Ok(Self(state.visitors().get_or_create(id).await))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::config::ApiConfig;

    fn registry() -> VisitorRegistry {
        let client = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9/api").unwrap(),
            timeout: None,
            cache_ttl: Duration::from_secs(60),
        })
        .unwrap();
        VisitorRegistry::new(client, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_same_id_shares_state() {
        let registry = registry();
        let id = Uuid::new_v4();

        let a = registry.get_or_create(id).await;
        let b = registry.get_or_create(id).await;

        assert!(Arc::ptr_eq(&a.products, &b.products));
        assert!(Arc::ptr_eq(&a.orders, &b.orders));
    }

    #[tokio::test]
    async fn test_visitors_are_isolated() {
        let registry = registry();

        let a = registry.get_or_create(Uuid::new_v4()).await;
        let b = registry.get_or_create(Uuid::new_v4()).await;

        assert_ne!(a.id, b.id);
        assert!(!Arc::ptr_eq(&a.products, &b.products));
    }
}
