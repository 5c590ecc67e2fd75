//! Catalog filtering, pagination and facets.
//!
//! Everything here is pure: the backend does the actual filtering and this
//! module only shapes requests and windows responses for rendering.

pub mod facets;
pub mod filters;
pub mod pagination;
pub mod slug;

pub use facets::{FacetCount, Facets, facets};
pub use filters::{ProductFilters, QueryParams};
pub use pagination::{BLOG_PAGE_SIZE, PageSlice, page_window, paginate};
pub use slug::{ProductPath, product_path};
