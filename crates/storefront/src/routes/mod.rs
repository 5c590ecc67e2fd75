//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (best sellers, new arrivals)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachable)
//!
//! # Products
//! GET  /products               - Product listing with filters
//! GET  /products/{id}-{slug}   - Product detail (redirects to canonical slug)
//! GET  /products/slug/{slug}   - Slug lookup, redirects to canonical URL
//!
//! # Blog
//! GET  /blog                   - Blog listing, five posts per page
//! GET  /blog/{id}              - Blog post
//!
//! # Orders (requires auth cookie)
//! GET  /track-order            - Tracking page, reloads orders
//! GET  /track-order?q=...      - Tracking search
//! ```

pub mod blog;
pub mod home;
pub mod products;
pub mod tracking;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", products::router())
        .nest("/blog", blog::router())
        .route("/track-order", get(tracking::track))
}
