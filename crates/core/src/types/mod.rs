//! Core types for Emberline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{display_amount, original_price};
pub use status::OrderState;
