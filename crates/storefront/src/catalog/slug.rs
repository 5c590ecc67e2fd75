//! Canonical product detail paths (`/products/{id}-{slug}`).

use emberline_core::{ObjectIdError, ProductId};

/// A parsed `{id}-{slug}` path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPath {
    pub id: ProductId,
    /// Slug as requested; empty when the segment had none.
    pub slug: String,
}

impl ProductPath {
    /// Parse a product path segment.
    ///
    /// The id is everything before the first `-`; the rest is the slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the id part is not a 24-hex object id.
    pub fn parse(segment: &str) -> Result<Self, ObjectIdError> {
        let (id, slug) = segment.split_once('-').unwrap_or((segment, ""));

        Ok(Self {
            id: ProductId::parse(id)?,
            slug: slug.to_string(),
        })
    }

    /// Whether the requested slug matches the backend's canonical slug.
    #[must_use]
    pub fn is_canonical(&self, canonical_slug: &str) -> bool {
        self.slug == canonical_slug
    }
}

/// Canonical storefront path for a product.
#[must_use]
pub fn product_path(id: &str, slug: &str) -> String {
    if slug.is_empty() {
        format!("/products/{id}")
    } else {
        format!("/products/{id}-{slug}")
    }
}
