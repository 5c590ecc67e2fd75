//! Cache types for backend responses.
//!
//! Only single-document lookups and the blog list are cached. Product
//! listings always go to the backend.

use super::types::{Blog, BlogList, Product};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Blog(Box<Blog>),
    Blogs(BlogList),
}

/// Cache key for a product looked up by id.
pub fn product_by_id(id: &str) -> String {
    format!("product:id:{id}")
}

/// Cache key for a product looked up by slug.
pub fn product_by_slug(slug: &str) -> String {
    format!("product:slug:{slug}")
}

/// Cache key for a single blog post.
pub fn blog_by_id(id: &str) -> String {
    format!("blog:{id}")
}

/// Cache key for the blog list.
pub const BLOGS: &str = "blogs";
