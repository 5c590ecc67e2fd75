//! Request-scoped models for the storefront.

pub mod customer;
pub mod session;

pub use customer::{ClaimsError, CurrentCustomer};
pub use session::keys as session_keys;
