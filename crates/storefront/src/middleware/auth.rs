//! Authentication extractor.
//!
//! The storefront never issues auth tokens. The customer signs in elsewhere
//! and the login flow leaves a JWT in a cookie, which this extractor reads.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::cookie::Cookie;
use tracing::debug;

use crate::error::set_sentry_user;
use crate::models::CurrentCustomer;
use crate::state::AppState;

/// Extractor that requires a signed-in customer.
///
/// If the auth cookie is missing or unreadable, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireCustomer(customer): RequireCustomer,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", customer.user_id)
/// }
/// ```
pub struct RequireCustomer(pub CurrentCustomer);

/// Rejection returned when no customer is signed in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the configured login page.
    RedirectToLogin(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(url) => Redirect::to(&url).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let auth = &state.config().auth;
        let redirect = || AuthRejection::RedirectToLogin(auth.login_url.clone());

        let token = cookie_value(&parts.headers, &auth.cookie_name).ok_or_else(redirect)?;

        let customer = CurrentCustomer::from_token(&token).map_err(|err| {
            debug!(error = %err, "Ignoring unreadable auth token");
            redirect()
        })?;

        set_sentry_user(&customer.user_id);

        Ok(Self(customer))
    }
}

/// Value of the named cookie, if present and non-empty.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookies: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_static(cookie));
        }
        headers
    }

    #[test]
    fn test_cookie_value_found() {
        let headers = headers(&["emberline_vid=abc; token=a.b.c"]);
        assert_eq!(cookie_value(&headers, "token").as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let headers = headers(&["theme=dark", "token=x.y.z"]);
        assert_eq!(cookie_value(&headers, "token").as_deref(), Some("x.y.z"));
    }

    #[test]
    fn test_cookie_value_missing_or_empty() {
        assert_eq!(cookie_value(&headers(&[]), "token"), None);
        assert_eq!(cookie_value(&headers(&["other=1"]), "token"), None);
        assert_eq!(cookie_value(&headers(&["token="]), "token"), None);
    }
}
