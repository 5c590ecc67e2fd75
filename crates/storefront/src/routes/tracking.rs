//! Order tracking page.
//!
//! `GET /track-order` opens the page and reloads the customer's orders.
//! `GET /track-order?q=...` answers a search from the loaded orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireCustomer;
use crate::tracking::{LoadState, TrackingResult, TrackingView};
use crate::visitor::CurrentVisitor;

/// Tracking search query.
#[derive(Debug, Default, Deserialize)]
pub struct TrackQuery {
    pub q: Option<String>,
}

/// Order tracking page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/track.html")]
pub struct TrackOrderTemplate {
    pub query: String,
    pub load_error: Option<String>,
    pub message: Option<&'static str>,
    pub result: Option<TrackingResult>,
    pub order_count: usize,
}

impl From<TrackingView> for TrackOrderTemplate {
    fn from(view: TrackingView) -> Self {
        let load_error = match view.load {
            LoadState::Failed(message) => Some(message),
            LoadState::Idle | LoadState::Loading | LoadState::Ready => None,
        };

        Self {
            message: view.search.message(),
            query: view.query,
            load_error,
            result: view.result,
            order_count: view.order_count,
        }
    }
}

/// Display the tracking page, optionally answering a search.
#[instrument(skip_all, fields(user_id = %customer.user_id))]
pub async fn track(
    RequireCustomer(customer): RequireCustomer,
    CurrentVisitor(visitor): CurrentVisitor,
    Query(query): Query<TrackQuery>,
) -> impl IntoResponse {
    let orders = &visitor.orders;

    let view = match query.q {
        None => orders.mount(&customer.user_id, &customer.token).await,
        Some(input) => {
            orders
                .ensure_loaded(&customer.user_id, &customer.token)
                .await;
            orders.search(&input).await
        }
    };

    TrackOrderTemplate::from(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{EMPTY_INPUT_MESSAGE, SearchState};

    #[test]
    fn test_template_from_failed_load() {
        let template = TrackOrderTemplate::from(TrackingView {
            load: LoadState::Failed("We couldn't load your orders.".to_string()),
            ..TrackingView::default()
        });

        assert_eq!(
            template.load_error.as_deref(),
            Some("We couldn't load your orders.")
        );
        assert!(template.message.is_none());
    }

    #[test]
    fn test_template_keeps_result_with_message() {
        let template = TrackOrderTemplate::from(TrackingView {
            load: LoadState::Ready,
            search: SearchState::Invalid,
            result: Some(TrackingResult {
                order_id: "A1".to_string(),
                tracking_number: "T1".to_string(),
                status: "Shipped".to_string(),
            }),
            query: "  ".to_string(),
            order_count: 1,
        });

        assert_eq!(template.message, Some(EMPTY_INPUT_MESSAGE));
        assert!(template.result.is_some());
    }
}
