//! Product listing store.
//!
//! Holds the last fetched product list together with the filters it was
//! fetched with. A store is an ordinary owned value: the server keeps one
//! per visitor (see [`crate::visitor`]) and tests build their own.
//!
//! # Ordering
//!
//! Fetches are not de-duplicated or cancelled. Each call takes a generation
//! number and a [`ScopeToken`]; when the response arrives it is applied only
//! if no newer fetch has started and the view that asked for it is still
//! alive. Everything else is dropped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, instrument, warn};

use crate::api::types::{Product, ProductPage};
use crate::api::{ApiClient, ApiError};
use crate::catalog::ProductFilters;

/// Shown when the backend could not be reached.
pub const TRANSPORT_ERROR_MESSAGE: &str = "We couldn't reach the store right now. Please try again.";

/// Shown when the backend answered but the listing could not be used.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load products.";

// =============================================================================
// View Scopes
// =============================================================================

/// Lifetime guard for a view that consumes store results.
///
/// Dropping the scope marks every [`ScopeToken`] taken from it as dead.
#[derive(Debug)]
pub struct ViewScope {
    alive: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Token to hand to a fetch started on behalf of this view.
    #[must_use]
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            alive: Arc::clone(&self.alive),
        }
    }

    /// End the scope early.
    pub fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cheap handle checked before results are applied.
#[derive(Debug, Clone)]
pub struct ScopeToken {
    alive: Arc<AtomicBool>,
}

impl ScopeToken {
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Point-in-time copy of the store for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
    /// Filters the held products were fetched with.
    pub filters: ProductFilters,
    /// Total listing pages, when the backend reports it.
    pub total_pages: Option<u32>,
}

/// What happened to a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the held list.
    Applied { count: usize },
    /// The fetch failed; the held list was kept and the error recorded.
    Failed { message: String },
    /// A newer fetch started first; the response was dropped.
    Superseded,
    /// The requesting view was gone; the response was dropped.
    ScopeClosed,
}

/// A finished fetch and the listing its caller should render.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub outcome: FetchOutcome,
    /// For applied and failed fetches, the store as this fetch left it.
    /// For dropped fetches, the fetched page itself, which the store never
    /// saw.
    pub view: StoreSnapshot,
}

/// Store holding the current product listing.
pub struct ProductStore {
    client: ApiClient,
    generation: AtomicU64,
    state: RwLock<StoreSnapshot>,
}

impl ProductStore {
    /// Create an empty store backed by `client`.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
            state: RwLock::new(StoreSnapshot::default()),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch the listing for `filters` and replace the held products.
    ///
    /// On failure the previous products stay in place and an error message
    /// is recorded. Responses from superseded fetches or closed scopes are
    /// discarded without touching the store's products.
    #[instrument(skip(self, scope))]
    pub async fn fetch_products(&self, filters: ProductFilters, scope: &ScopeToken) -> Fetched {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.loading = true;
            state.error = None;
        }

        let result = self.client.fetch_products(&filters.to_query()).await;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let latest = self.generation.load(Ordering::SeqCst);

        if !scope.is_live() {
            debug!(generation, "Dropping product response for closed view");
            if generation == latest {
                state.loading = false;
            }
            return Fetched {
                outcome: FetchOutcome::ScopeClosed,
                view: detached_view(filters, result),
            };
        }

        if generation != latest {
            debug!(generation, latest, "Dropping superseded product response");
            return Fetched {
                outcome: FetchOutcome::Superseded,
                view: detached_view(filters, result),
            };
        }

        state.loading = false;

        let outcome = match result {
            Ok(page) => {
                let count = page.products.len();
                state.products = page.products;
                state.total_pages = page.total_pages;
                state.filters = filters;
                state.error = None;
                debug!(count, "Product list replaced");
                FetchOutcome::Applied { count }
            }
            Err(err) => {
                let message = failure_message(&err);
                warn!(error = %err, "Failed to fetch products");
                state.error = Some(message.clone());
                FetchOutcome::Failed { message }
            }
        };

        Fetched {
            outcome,
            view: state.clone(),
        }
    }
}

/// Listing built from a response the store dropped.
fn detached_view(filters: ProductFilters, result: Result<ProductPage, ApiError>) -> StoreSnapshot {
    match result {
        Ok(page) => StoreSnapshot {
            products: page.products,
            total_pages: page.total_pages,
            filters,
            ..StoreSnapshot::default()
        },
        Err(err) => StoreSnapshot {
            error: Some(failure_message(&err)),
            filters,
            ..StoreSnapshot::default()
        },
    }
}

/// Customer-facing message for a failed listing fetch.
#[must_use]
pub fn failure_message(err: &ApiError) -> String {
    match err {
        e if e.is_transport() => TRANSPORT_ERROR_MESSAGE.to_string(),
        ApiError::Rejected(Some(message)) if !message.is_empty() => message.clone(),
        _ => LOAD_ERROR_MESSAGE.to_string(),
    }
}
