//! The signed-in customer, as read from the auth token cookie.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;

use emberline_core::{ObjectIdError, UserId};

/// Claims that may carry the user id, in lookup order.
const USER_ID_CLAIMS: [&str; 4] = ["id", "_id", "userId", "sub"];

/// Why an auth token could not be read.
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token is not a JWT")]
    NotAJwt,

    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token carries no user id")]
    MissingUserId,

    #[error("token user id is invalid: {0}")]
    InvalidUserId(#[from] ObjectIdError),
}

/// The customer behind the auth token cookie.
///
/// The token's signature is checked by the order service, not here; the
/// storefront only reads the user id from it and forwards the token.
#[derive(Debug, Clone)]
pub struct CurrentCustomer {
    pub user_id: UserId,
    pub token: SecretString,
}

impl CurrentCustomer {
    /// Read the customer from a raw JWT.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a JWT or has no valid user id.
    pub fn from_token(token: &str) -> Result<Self, ClaimsError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => return Err(ClaimsError::NotAJwt),
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let claims: Value = serde_json::from_slice(&bytes)?;

        let raw = USER_ID_CLAIMS
            .iter()
            .find_map(|claim| claims.get(claim).and_then(Value::as_str))
            .ok_or(ClaimsError::MissingUserId)?;

        Ok(Self {
            user_id: UserId::parse(raw)?,
            token: SecretString::from(token),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const USER: &str = "65f1c2a9e4b0a1b2c3d4e5f6";

    fn jwt(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_reads_id_claim() {
        let token = jwt(&serde_json::json!({ "id": USER, "iat": 1_700_000_000 }));
        let customer = CurrentCustomer::from_token(&token).unwrap();

        assert_eq!(customer.user_id.as_str(), USER);
        assert_eq!(customer.token.expose_secret(), token);
    }

    #[test]
    fn test_claim_fallbacks() {
        for claim in ["_id", "userId", "sub"] {
            let mut claims = serde_json::Map::new();
            claims.insert(claim.to_string(), Value::from(USER));
            let token = jwt(&Value::Object(claims));
            let customer = CurrentCustomer::from_token(&token).unwrap();
            assert_eq!(customer.user_id.as_str(), USER, "claim {claim}");
        }
    }

    #[test]
    fn test_rejects_non_jwt() {
        assert!(matches!(
            CurrentCustomer::from_token("opaque-session-token"),
            Err(ClaimsError::NotAJwt)
        ));
        assert!(matches!(
            CurrentCustomer::from_token("a..c"),
            Err(ClaimsError::NotAJwt)
        ));
        assert!(matches!(
            CurrentCustomer::from_token("a.b.c.d"),
            Err(ClaimsError::NotAJwt)
        ));
    }

    #[test]
    fn test_rejects_bad_payload() {
        assert!(matches!(
            CurrentCustomer::from_token("a.!!!.c"),
            Err(ClaimsError::Encoding(_))
        ));

        let not_json = URL_SAFE_NO_PAD.encode("not json");
        assert!(matches!(
            CurrentCustomer::from_token(&format!("a.{not_json}.c")),
            Err(ClaimsError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_missing_or_invalid_user() {
        let token = jwt(&serde_json::json!({ "email": "ada@example.com" }));
        assert!(matches!(
            CurrentCustomer::from_token(&token),
            Err(ClaimsError::MissingUserId)
        ));

        let token = jwt(&serde_json::json!({ "id": "42" }));
        assert!(matches!(
            CurrentCustomer::from_token(&token),
            Err(ClaimsError::InvalidUserId(_))
        ));
    }
}
