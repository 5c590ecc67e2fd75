//! Session-related types.
//!
//! The session only carries the visitor id. Everything else a visitor owns
//! lives in the in-memory visitor registry.

/// Session keys.
pub mod keys {
    /// Key for the visitor's registry id.
    pub const VISITOR_ID: &str = "visitor_id";
}
