//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tracing::{debug, instrument, warn};

use emberline_core::{ProductId, display_amount};

use crate::api::{ApiError, Product};
use crate::catalog::{
    FacetCount, ProductFilters, ProductPath, QueryParams, facets, page_window, product_path,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;
use crate::store::{Fetched, ViewScope};
use crate::visitor::CurrentVisitor;

/// Related products shown under a product.
const RELATED_PRODUCTS_COUNT: usize = 4;

/// Sort keys offered on the listing page.
const SORT_OPTIONS: [(&str, &str); 5] = [
    ("", "Featured"),
    ("newest", "Newest"),
    ("price-asc", "Price: low to high"),
    ("price-desc", "Price: high to low"),
    ("rating", "Top rated"),
];

// =============================================================================
// Views
// =============================================================================

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub url: String,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub price: String,
    /// Struck-through price, when discounted.
    pub original_price: Option<String>,
    pub discount_label: Option<String>,
    pub best_seller: bool,
    pub is_new: bool,
    pub in_stock: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let discounted = product.is_discounted();
        Self {
            url: product_path(&product.id, &product.slug),
            name: product.name.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            price: display_amount(product.current_price),
            original_price: discounted.then(|| display_amount(product.original_price)),
            discount_label: discounted.then(|| format!("-{}%", product.discount.normalize())),
            best_seller: product.best_seller,
            is_new: product.is_new,
            in_stock: product.in_stock,
        }
    }
}

/// Full product data for the detail page.
pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub category: String,
    pub category_url: String,
    pub sub_category: String,
    pub features: Vec<String>,
    pub colors: Vec<String>,
    pub rating: String,
    pub quantity: i64,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            card: ProductCard::from(product),
            description: product.description.clone(),
            category: product.category.clone(),
            category_url: listing_url(&ProductFilters {
                category: Some(product.category.clone()),
                ..ProductFilters::default()
            }),
            sub_category: product.sub_category.clone(),
            features: product.features.clone(),
            colors: product.colors.clone(),
            rating: product.rating.round_dp(1).normalize().to_string(),
            quantity: product.quantity,
        }
    }
}

/// A facet link in the listing sidebar.
pub struct FacetLink {
    pub label: String,
    pub count: usize,
    pub url: String,
    pub active: bool,
}

/// A sort option in the listing toolbar.
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// A numeric page button.
pub struct PageLink {
    pub number: u32,
    pub url: String,
    pub current: bool,
}

/// Listing page controls.
#[derive(Default)]
pub struct ListingPager {
    pub pages: Vec<PageLink>,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl ListingPager {
    /// Build the pager for `filters`.
    ///
    /// When the backend did not report a page count, only the neighbours of
    /// the current page are linked: "next" while the page had products.
    fn new(filters: &ProductFilters, total_pages: Option<u32>, page_had_products: bool) -> Self {
        let current = filters.current_page();
        let link = |page: u32| listing_url(&filters.with_page(page));

        let previous_url = (current > 1).then(|| link(current - 1));

        let Some(total) = total_pages else {
            return Self {
                pages: Vec::new(),
                previous_url,
                next_url: current
                    .checked_add(1)
                    .filter(|_| page_had_products)
                    .map(link),
            };
        };

        Self {
            pages: page_window(current, total)
                .into_iter()
                .map(|number| PageLink {
                    number,
                    url: link(number),
                    current: number == current,
                })
                .collect(),
            previous_url,
            next_url: (current < total).then(|| link(current + 1)),
        }
    }
}

fn listing_url(filters: &ProductFilters) -> String {
    let query = filters.to_query_string();
    if query.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{query}")
    }
}

fn facet_links(
    counts: Vec<FacetCount>,
    selected: Option<&str>,
    select: impl Fn(ProductFilters, String) -> ProductFilters,
) -> Vec<FacetLink> {
    counts
        .into_iter()
        .map(|facet| FacetLink {
            url: listing_url(&select(ProductFilters::default(), facet.value.clone())),
            active: selected == Some(facet.value.as_str()),
            label: facet.value,
            count: facet.count,
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCard>,
    pub error: Option<String>,
    pub search: String,
    pub sort_options: Vec<SortOption>,
    pub categories: Vec<FacetLink>,
    pub sub_categories: Vec<FacetLink>,
    pub brands: Vec<FacetLink>,
    pub pager: ListingPager,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetail,
    pub related_products: Vec<ProductCard>,
    pub canonical_url: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create the product routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id_slug}", get(show))
        .route("/slug/{slug}", get(by_slug))
}

/// Display the product listing for the requested filters.
///
/// Fetch failures keep the visitor's previous products on screen alongside
/// the error message. The page is always built from one listing together
/// with the filters that produced it, so an overlapping request from the
/// same visitor cannot swap in its products.
#[instrument(skip(visitor))]
pub async fn index(
    CurrentVisitor(visitor): CurrentVisitor,
    Query(requested): Query<ProductFilters>,
) -> impl IntoResponse {
    let scope = ViewScope::new();
    let Fetched { outcome, view } = visitor
        .products
        .fetch_products(requested, &scope.token())
        .await;
    debug!(?outcome, "Listing fetched");

    let filters = &view.filters;
    let counts = facets(&view.products);

    let current_category = filters.category.as_deref().or(filters.sub.as_deref());
    let current_sort = filters.sort.as_deref().unwrap_or("");

    ProductsIndexTemplate {
        products: view.products.iter().map(ProductCard::from).collect(),
        search: filters.search.clone().unwrap_or_default(),
        sort_options: SORT_OPTIONS
            .iter()
            .map(|&(value, label)| SortOption {
                value,
                label,
                selected: value == current_sort,
            })
            .collect(),
        categories: facet_links(counts.categories, current_category, |f, v| ProductFilters {
            category: Some(v),
            ..f
        }),
        sub_categories: facet_links(
            counts.sub_categories,
            filters.sub_category.as_deref(),
            |f, v| ProductFilters {
                sub_category: Some(v),
                ..f
            },
        ),
        brands: facet_links(counts.brands, filters.brand.as_deref(), |f, v| {
            ProductFilters {
                brand: Some(v),
                ..f
            }
        }),
        pager: ListingPager::new(filters, view.total_pages, !view.products.is_empty()),
        error: view.error,
    }
}

/// Display a product, redirecting to its canonical URL when the slug differs.
///
/// # Errors
///
/// Returns 404 if the id is malformed or the product cannot be loaded.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id_slug): Path<String>) -> Result<Response> {
    let path = ProductPath::parse(&id_slug)
        .map_err(|e| AppError::NotFound(format!("product {id_slug}: {e}")))?;

    let product = state
        .api()
        .product_by_id(&path.id)
        .await
        .map_err(|e| not_found(&id_slug, &e))?;

    if !path.is_canonical(&product.slug) {
        let canonical = product_path(path.id.as_str(), &product.slug);
        return Ok(Redirect::permanent(&canonical).into_response());
    }

    let related_products = related(&state, &product).await;
    let canonical_url = state
        .config()
        .base_url
        .join(&product_path(path.id.as_str(), &product.slug))
        .map(String::from)
        .unwrap_or_default();

    Ok(ProductShowTemplate {
        product: ProductDetail::from(&product),
        related_products,
        canonical_url,
    }
    .into_response())
}

/// Resolve a product by slug and redirect to its canonical URL.
///
/// # Errors
///
/// Returns 404 if no product has this slug.
#[instrument(skip(state))]
pub async fn by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Redirect> {
    let product = state
        .api()
        .product_by_slug(&slug)
        .await
        .map_err(|e| not_found(&slug, &e))?;

    let id = ProductId::parse(&product.id)
        .map_err(|e| AppError::NotFound(format!("product {slug} has invalid id: {e}")))?;

    Ok(Redirect::permanent(&product_path(id.as_str(), &product.slug)))
}

/// Products from the same category. Failures only cost the section.
async fn related(state: &AppState, product: &Product) -> Vec<ProductCard> {
    if product.category.is_empty() {
        return Vec::new();
    }

    let mut query = QueryParams::default();
    query.set("category", product.category.clone());

    match state.api().fetch_products(&query).await {
        Ok(page) => page
            .products
            .iter()
            .filter(|p| p.id != product.id)
            .take(RELATED_PRODUCTS_COUNT)
            .map(ProductCard::from)
            .collect(),
        Err(err) => {
            warn!(error = %err, "Failed to load related products");
            Vec::new()
        }
    }
}

/// Product lookups that fail for any reason render as not found.
fn not_found(what: &str, err: &ApiError) -> AppError {
    if !matches!(err, ApiError::NotFound(_)) {
        warn!(error = %err, product = %what, "Product lookup failed");
    }
    AppError::NotFound(format!("product {what}"))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_card_for_discounted_product() {
        let product = Product {
            id: "65f1c2a9e4b0a1b2c3d4e5f6".to_string(),
            slug: "padron-1964".to_string(),
            price: Decimal::from(20),
            current_price: Decimal::from(20),
            discount: Decimal::from(80),
            original_price: Decimal::from(25),
            ..Product::default()
        };

        let card = ProductCard::from(&product);

        assert_eq!(card.url, "/products/65f1c2a9e4b0a1b2c3d4e5f6-padron-1964");
        assert_eq!(card.price, "$20.00");
        assert_eq!(card.original_price.as_deref(), Some("$25.00"));
        assert_eq!(card.discount_label.as_deref(), Some("-80%"));
    }

    #[test]
    fn test_card_without_discount() {
        let product = Product {
            current_price: Decimal::new(1250, 2),
            ..Product::default()
        };

        let card = ProductCard::from(&product);
        assert_eq!(card.price, "$12.50");
        assert!(card.original_price.is_none());
        assert!(card.in_stock);
    }

    #[test]
    fn test_pager_with_known_total() {
        let filters = ProductFilters {
            category: Some("cigars".to_string()),
            page: Some(3),
            ..ProductFilters::default()
        };

        let pager = ListingPager::new(&filters, Some(10), true);

        let numbers: Vec<u32> = pager.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5]);
        assert!(pager.pages[1].current);
        assert_eq!(
            pager.previous_url.as_deref(),
            Some("/products?category=cigars&page=2")
        );
        assert_eq!(
            pager.next_url.as_deref(),
            Some("/products?category=cigars&page=4")
        );
    }

    #[test]
    fn test_pager_disabled_at_edges() {
        let first = ListingPager::new(&ProductFilters::default(), Some(1), true);
        assert!(first.previous_url.is_none());
        assert!(first.next_url.is_none());
        assert_eq!(first.pages.len(), 1);
    }

    #[test]
    fn test_pager_without_total() {
        let filters = ProductFilters::default().with_page(2);

        let pager = ListingPager::new(&filters, None, true);
        assert!(pager.pages.is_empty());
        assert_eq!(pager.previous_url.as_deref(), Some("/products?page=1"));
        assert_eq!(pager.next_url.as_deref(), Some("/products?page=3"));

        let empty = ListingPager::new(&filters, None, false);
        assert!(empty.next_url.is_none());
    }

    #[test]
    fn test_pager_at_last_representable_page() {
        let filters = ProductFilters::default().with_page(u32::MAX);

        let pager = ListingPager::new(&filters, None, true);
        assert!(pager.next_url.is_none());
        assert_eq!(
            pager.previous_url,
            Some(format!("/products?page={}", u32::MAX - 1))
        );

        let pager = ListingPager::new(&filters, Some(3), true);
        assert!(pager.next_url.is_none());
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(listing_url(&ProductFilters::default()), "/products");
        assert_eq!(
            listing_url(&ProductFilters {
                brand: Some("Al Fakher".to_string()),
                ..ProductFilters::default()
            }),
            "/products?brand=Al+Fakher"
        );
    }
}
