//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, visitor id cookie)
//!
//! The auth cookie is read per handler by the [`RequireCustomer`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, RequireCustomer};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
