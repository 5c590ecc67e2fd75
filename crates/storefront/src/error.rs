//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::filters;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Visitor is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Not found page.
#[derive(Template)]
#[template(path = "error/not_found.html")]
pub struct NotFoundTemplate {
    pub message: String,
}

impl AppError {
    /// Whether this error is the server's fault and worth reporting.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Api(err) => !matches!(err, ApiError::NotFound(_)),
            Self::Internal(_) => true,
            Self::NotFound(_) | Self::Unauthorized(_) | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(ApiError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        if status == StatusCode::NOT_FOUND {
            let page = NotFoundTemplate {
                message: "We couldn't find the page you were looking for.".to_string(),
            };
            return match page.render() {
                Ok(html) => (status, Html(html)).into_response(),
                Err(err) => {
                    tracing::error!(error = %err, "Failed to render not found page");
                    (status, "Not found").into_response()
                }
            };
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Api(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in customer.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
