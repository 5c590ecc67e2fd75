//! Backend REST client implementation.
//!
//! Uses `reqwest` for HTTP and `moka` for caching single-document lookups
//! (TTL from configuration).

use std::sync::Arc;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use emberline_core::{BlogId, ProductId, UserId};

use super::ApiError;
use super::cache::{self, CacheValue};
use super::conversions::{convert_blog, convert_order, convert_product};
use super::types::{Blog, BlogList, Order, Product, ProductPage};
use crate::catalog::QueryParams;
use crate::config::ApiConfig;

/// Maximum number of characters of a response body to include in logs.
const LOG_BODY_CHARS: usize = 500;

/// Decoded `{ success, data }` envelope.
#[derive(Debug)]
struct Envelope {
    data: Value,
    count: Option<u64>,
    total_pages: Option<u32>,
}

impl Envelope {
    /// Take the payload as an array.
    fn into_array(self, what: &str) -> Result<Vec<Value>, ApiError> {
        match self.data {
            Value::Array(items) => Ok(items),
            other => Err(ApiError::Malformed(format!(
                "expected {what} array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Take the payload as a single document.
    fn into_object(self, what: &str) -> Result<Value, ApiError> {
        if self.data.is_object() {
            Ok(self.data)
        } else {
            Err(ApiError::Malformed(format!(
                "expected {what} object, got {}",
                json_kind(&self.data)
            )))
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the `message` field from an error body, if it is JSON.
fn body_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn truncated(text: &str) -> String {
    text.chars().take(LOG_BODY_CHARS).collect()
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the catalog, blog and order services.
///
/// Cheap to clone; all clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments and query parameters.
    fn endpoint(&self, segments: &[&str], query: Option<&QueryParams>) -> Url {
        let mut url = self.inner.base_url.clone();

        // Base URLs are validated as http(s) at config load, so they always
        // have path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        url
    }

    /// Execute a GET request and decode the response envelope.
    async fn get(&self, url: Url, bearer: Option<&SecretString>) -> Result<Envelope, ApiError> {
        let mut request = self.inner.client.get(url.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(body_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());

            if status == reqwest::StatusCode::NOT_FOUND {
                debug!(url = %url, "Backend returned 404");
                return Err(ApiError::NotFound(message));
            }

            tracing::error!(
                status = %status,
                url = %url,
                body = %truncated(&text),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let Some(body) = body else {
            let err = serde_json::from_str::<Value>(&text)
                .err()
                .map_or_else(|| ApiError::Malformed("empty body".to_string()), ApiError::Parse);
            tracing::error!(
                error = %err,
                body = %truncated(&text),
                "Failed to parse backend response"
            );
            return Err(err);
        };

        if body.get("success").and_then(Value::as_bool) != Some(true) {
            let message = body_message(&body);
            debug!(url = %url, message = ?message, "Backend reported failure");
            return Err(ApiError::Rejected(message));
        }

        let count = body.get("count").and_then(Value::as_u64);
        let total_pages = body
            .get("totalPages")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok());

        match body.get("data") {
            Some(data) if !data.is_null() => Ok(Envelope {
                data: data.clone(),
                count,
                total_pages,
            }),
            _ => {
                tracing::error!(
                    url = %url,
                    body = %truncated(&text),
                    "Backend response has no data"
                );
                Err(ApiError::Malformed("response has no data".to_string()))
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch one page of the product listing.
    ///
    /// Never cached: the listing reflects live stock and filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend reports failure or
    /// the payload is not an array.
    #[instrument(skip(self), fields(params = query.len()))]
    pub async fn fetch_products(&self, query: &QueryParams) -> Result<ProductPage, ApiError> {
        let url = self.endpoint(&["product", "getAllProduct"], Some(query));
        let envelope = self.get(url, None).await?;
        let total_pages = envelope.total_pages;

        let products = envelope
            .into_array("product")?
            .iter()
            .map(convert_product)
            .collect();

        Ok(ProductPage {
            products,
            total_pages,
        })
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product_by_id(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = cache::product_by_id(id.as_str());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["product", "getProductById", id.as_str()], None);
        let product = convert_product(&self.get(url, None).await?.into_object("product")?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = cache::product_by_slug(slug);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["product", "getProductBySlug", slug], None);
        let product = convert_product(&self.get(url, None).await?.into_object("product")?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Blog Methods
    // =========================================================================

    /// Get all blog posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not an array.
    #[instrument(skip(self))]
    pub async fn blogs(&self) -> Result<BlogList, ApiError> {
        if let Some(CacheValue::Blogs(list)) = self.inner.cache.get(cache::BLOGS).await {
            debug!("Cache hit for blogs");
            return Ok(list);
        }

        let url = self.endpoint(&["blog", "getAllBlogs"], None);
        let envelope = self.get(url, None).await?;
        let reported = envelope.count;

        let blogs: Vec<Blog> = envelope
            .into_array("blog")?
            .iter()
            .map(convert_blog)
            .collect();
        let count = reported
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(blogs.len());

        let list = BlogList { blogs, count };

        self.inner
            .cache
            .insert(cache::BLOGS.to_string(), CacheValue::Blogs(list.clone()))
            .await;

        Ok(list)
    }

    /// Get a single blog post.
    ///
    /// # Errors
    ///
    /// Returns an error if the post is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn blog_by_id(&self, id: &BlogId) -> Result<Blog, ApiError> {
        let cache_key = cache::blog_by_id(id.as_str());

        if let Some(CacheValue::Blog(blog)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for blog");
            return Ok(*blog);
        }

        let url = self.endpoint(&["blog", "getBlogById", id.as_str()], None);
        let blog = convert_blog(&self.get(url, None).await?.into_object("blog")?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Blog(Box::new(blog.clone())))
            .await;

        Ok(blog)
    }

    // =========================================================================
    // Order Methods (not cached - per-user data)
    // =========================================================================

    /// Get all orders placed by a user.
    ///
    /// The customer's auth token is forwarded as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not an array.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn user_orders(
        &self,
        user_id: &UserId,
        token: &SecretString,
    ) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["order", "userOrder", user_id.as_str()], None);
        let envelope = self.get(url, Some(token)).await?;

        Ok(envelope
            .into_array("order")?
            .iter()
            .map(convert_order)
            .collect())
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check that the backend answers HTTP at all.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTTP response could be obtained.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await?;
        Ok(())
    }
}
