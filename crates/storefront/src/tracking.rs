//! Order tracking lookup.
//!
//! A signed-in customer's orders are fetched once when the tracking page is
//! opened and every search afterwards is answered from that list.

use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use emberline_core::UserId;

use crate::api::{ApiClient, ApiError, Order};

/// Shown when the search box is submitted empty.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter an order ID or tracking number.";

/// Shown when no order matches the search.
pub const NOT_FOUND_MESSAGE: &str = "No order found with that ID or tracking number.";

/// Shown when the order list could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "We couldn't load your orders. Please try again.";

/// View-only projection of a matched order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingResult {
    pub order_id: String,
    pub tracking_number: String,
    /// Display label for the order's lifecycle state.
    pub status: String,
}

impl From<&Order> for TrackingResult {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            tracking_number: order.tracking_no.clone(),
            status: order.state.label().to_string(),
        }
    }
}

/// Result of matching one search against the order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingOutcome {
    Found(TrackingResult),
    NotFound,
    /// The input was empty after trimming; nothing was searched.
    Invalid,
}

/// Find the order whose human id or tracking number equals `input`.
///
/// The input is trimmed; the comparison is otherwise exact and
/// case-sensitive. When several orders match, the first in list order wins.
#[must_use]
pub fn lookup(orders: &[Order], input: &str) -> TrackingOutcome {
    let needle = input.trim();
    if needle.is_empty() {
        return TrackingOutcome::Invalid;
    }

    orders
        .iter()
        .find(|order| order.order_id == needle || order.tracking_no == needle)
        .map_or(TrackingOutcome::NotFound, |order| {
            TrackingOutcome::Found(TrackingResult::from(order))
        })
}

// =============================================================================
// Order Book
// =============================================================================

/// Order list loading state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// State of the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
    Found,
    NotFound,
    Invalid,
}

impl SearchState {
    /// Inline message for this state, if any.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some(NOT_FOUND_MESSAGE),
            Self::Invalid => Some(EMPTY_INPUT_MESSAGE),
            Self::Idle | Self::Searching | Self::Found => None,
        }
    }
}

/// What the tracking page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingView {
    pub load: LoadState,
    pub search: SearchState,
    /// Last successful match. Cleared by a search that finds nothing.
    pub result: Option<TrackingResult>,
    /// Raw input of the last search.
    pub query: String,
    pub order_count: usize,
}

#[derive(Default)]
struct BookState {
    user: Option<UserId>,
    orders: Vec<Order>,
    view: TrackingView,
}

/// One visitor's orders plus the state of the tracking page.
pub struct OrderBook {
    client: ApiClient,
    state: Mutex<BookState>,
}

impl OrderBook {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(BookState::default()),
        }
    }

    /// Open the tracking page: always refetch the user's orders and reset
    /// the search.
    #[instrument(skip(self, token), fields(user_id = %user))]
    pub async fn mount(&self, user: &UserId, token: &SecretString) -> TrackingView {
        let mut state = self.state.lock().await;
        state.view = TrackingView::default();
        self.load(&mut state, user, token).await;
        state.view.clone()
    }

    /// Make sure orders for `user` are loaded, fetching only when nothing is
    /// held yet, the last load failed, or a different user signed in.
    #[instrument(skip(self, token), fields(user_id = %user))]
    pub async fn ensure_loaded(&self, user: &UserId, token: &SecretString) -> LoadState {
        let mut state = self.state.lock().await;

        let same_user = state.user.as_ref() == Some(user);
        if !same_user || state.view.load != LoadState::Ready {
            if !same_user {
                state.view = TrackingView::default();
            }
            self.load(&mut state, user, token).await;
        }

        state.view.load.clone()
    }

    /// Answer a search from the loaded orders.
    #[instrument(skip(self))]
    pub async fn search(&self, input: &str) -> TrackingView {
        let mut state = self.state.lock().await;
        state.view.query = input.to_string();
        state.view.search = SearchState::Searching;

        match lookup(&state.orders, input) {
            TrackingOutcome::Found(result) => {
                debug!(order_id = %result.order_id, "Order found");
                state.view.search = SearchState::Found;
                state.view.result = Some(result);
            }
            TrackingOutcome::NotFound => {
                state.view.search = SearchState::NotFound;
                state.view.result = None;
            }
            TrackingOutcome::Invalid => {
                state.view.search = SearchState::Invalid;
            }
        }

        state.view.clone()
    }

    /// Copy of the page state.
    pub async fn view(&self) -> TrackingView {
        self.state.lock().await.view.clone()
    }

    async fn load(&self, state: &mut BookState, user: &UserId, token: &SecretString) {
        state.user = Some(user.clone());
        state.view.load = LoadState::Loading;

        match self.client.user_orders(user, token).await {
            Ok(orders) => {
                debug!(count = orders.len(), "Orders loaded");
                state.view.order_count = orders.len();
                state.orders = orders;
                state.view.load = LoadState::Ready;
            }
            Err(err) => {
                warn!(error = %err, "Failed to load orders");
                state.orders.clear();
                state.view.order_count = 0;
                state.view.load = LoadState::Failed(load_failure_message(&err));
            }
        }
    }
}

fn load_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Rejected(Some(message)) if !message.is_empty() => message.clone(),
        _ => LOAD_FAILED_MESSAGE.to_string(),
    }
}
