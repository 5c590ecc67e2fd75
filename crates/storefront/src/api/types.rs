//! Domain types for the catalog, blog and order services.
//!
//! These types are the canonical shapes the rest of the storefront works
//! with. Raw backend JSON is mapped into them by [`super::conversions`],
//! which guarantees that every field holds a defined value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use emberline_core::OrderState;

// =============================================================================
// Product Types
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend object id (empty when the backend omitted it).
    pub id: String,
    /// URL slug used in canonical product paths.
    pub slug: String,
    /// Brand name.
    pub brand: String,
    /// Display name.
    pub name: String,
    /// Primary image URL.
    pub image: String,
    /// Pre-discount price derived from `price` and `discount`.
    pub original_price: Decimal,
    /// Price currently charged.
    pub current_price: Decimal,
    /// Base price.
    pub price: Decimal,
    pub best_seller: bool,
    pub is_new: bool,
    pub in_stock: bool,
    pub category: String,
    pub sub_category: String,
    /// Free-text feature bullet points.
    pub features: Vec<String>,
    pub description: String,
    /// Discount percentage (0-100).
    pub discount: Decimal,
    /// Average review rating.
    pub rating: Decimal,
    /// Units available.
    pub quantity: i64,
    pub colors: Vec<String>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: String::new(),
            slug: String::new(),
            brand: String::new(),
            name: String::new(),
            image: String::new(),
            original_price: Decimal::ZERO,
            current_price: Decimal::ZERO,
            price: Decimal::ZERO,
            best_seller: false,
            is_new: false,
            in_stock: true,
            category: String::new(),
            sub_category: String::new(),
            features: Vec::new(),
            description: String::new(),
            discount: Decimal::ZERO,
            rating: Decimal::ZERO,
            quantity: 0,
            colors: Vec::new(),
        }
    }
}

impl Product {
    /// Whether the product is sold below its original price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount > Decimal::ZERO && self.original_price > self.current_price
    }
}

/// One page of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products in backend order.
    pub products: Vec<Product>,
    /// Total number of pages, when the backend reports it.
    pub total_pages: Option<u32>,
}

// =============================================================================
// Blog Types
// =============================================================================

/// A blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Short summary shown on the listing page.
    pub excerpt: String,
    /// Full body as plain text.
    pub content: String,
    pub image: String,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// All blog posts, as returned by the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogList {
    pub blogs: Vec<Blog>,
    /// Count reported by the backend (falls back to the list length).
    pub count: usize,
}

// =============================================================================
// Order Types
// =============================================================================

/// An order placed by a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Backend object id.
    pub id: String,
    /// Human-readable order number.
    pub order_id: String,
    /// Carrier tracking number.
    pub tracking_no: String,
    /// Lifecycle state, owned by the order service.
    pub state: OrderState,
    /// Owning user id.
    pub user: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
