//! Order lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an order, as reported by the order service.
///
/// The storefront only ever reads this value. An order without a reported
/// state is [`OrderState::Unknown`]; states outside the known vocabulary are
/// preserved verbatim in [`OrderState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Pending,
    #[default]
    Unknown,
    /// A state this storefront does not know about.
    Other(String),
}

impl OrderState {
    /// The wire value of this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }

    /// Customer-facing label.
    ///
    /// Unknown states pass through unchanged.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Pending => "Pending",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "pending" => Self::Pending,
            "unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for OrderState {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<OrderState> for String {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
