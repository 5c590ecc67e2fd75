//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::ProductPage;
use crate::catalog::QueryParams;
use crate::filters;
use crate::routes::products::ProductCard;
use crate::state::AppState;

/// Number of products to show per home page section.
const PRODUCTS_PER_SECTION: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Best sellers grid.
    pub best_sellers: Vec<ProductCard>,
    /// New arrivals grid.
    pub new_arrivals: Vec<ProductCard>,
}

fn flagged(flag: &'static str) -> QueryParams {
    let mut query = QueryParams::default();
    query.set(flag, "true".to_string());
    query
}

fn cards(page: ProductPage) -> Vec<ProductCard> {
    page.products
        .iter()
        .take(PRODUCTS_PER_SECTION)
        .map(ProductCard::from)
        .collect()
}

/// Display the home page.
///
/// Sections that fail to load are left empty.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let best_query = flagged("best");
    let new_query = flagged("new");
    let (best, new) = tokio::join!(
        state.api().fetch_products(&best_query),
        state.api().fetch_products(&new_query),
    );

    let best_sellers = best.map_or_else(
        |e| {
            tracing::error!("Failed to fetch best sellers: {e}");
            Vec::new()
        },
        cards,
    );

    let new_arrivals = new.map_or_else(
        |e| {
            tracing::error!("Failed to fetch new arrivals: {e}");
            Vec::new()
        },
        cards,
    );

    HomeTemplate {
        best_sellers,
        new_arrivals,
    }
}
