//! Emberline Core - Shared domain types.
//!
//! This crate provides the types shared by the Emberline storefront:
//! - Object identifiers issued by the catalog backend
//! - Price derivation rules for discounted products
//! - Order lifecycle states and their display labels
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype identifiers, prices and order states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
