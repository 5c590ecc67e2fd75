//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` when it looks sane, otherwise assigns a
//! UUID v4. The id is recorded on the request span and the Sentry scope,
//! stored in request extensions and echoed in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// The id assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Take the upstream id if acceptable, otherwise generate one.
    fn from_upstream(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| is_acceptable(id))
            .map_or_else(|| Self(Uuid::new_v4().to_string()), |id| Self(id.to_string()))
    }
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_upstream(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.0.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id.0);
    });

    let header = HeaderValue::from_str(&request_id.0).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_kept() {
        let value = HeaderValue::from_static("cf-8a1b2c3d.edge_01");
        assert_eq!(
            RequestId::from_upstream(Some(&value)),
            RequestId("cf-8a1b2c3d.edge_01".to_string())
        );
    }

    #[test]
    fn test_generated_when_missing() {
        let id = RequestId::from_upstream(None);
        assert!(Uuid::parse_str(&id.0).is_ok());
    }

    #[test]
    fn test_generated_when_unacceptable() {
        let spaced = HeaderValue::from_static("has spaces inside");
        assert!(Uuid::parse_str(&RequestId::from_upstream(Some(&spaced)).0).is_ok());

        let long = HeaderValue::from_str(&"a".repeat(200)).unwrap_or(spaced);
        assert!(Uuid::parse_str(&RequestId::from_upstream(Some(&long)).0).is_ok());
    }
}
