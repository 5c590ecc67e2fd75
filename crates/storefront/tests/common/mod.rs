//! Shared fixtures for storefront integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

use emberline_storefront::api::ApiClient;
use emberline_storefront::config::{ApiConfig, StorefrontConfig};
use emberline_storefront::state::AppState;

pub const PRODUCT_ID: &str = "65f1c2a9e4b0a1b2c3d4e5f6";
pub const USER_ID: &str = "64b7f0c2d1e3a4b5c6d7e8f9";

/// Backend base URL on the mock server.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: Url::parse(&api_url(server)).unwrap(),
        timeout: Some(Duration::from_secs(5)),
        cache_ttl: Duration::from_secs(60),
    }
}

pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&api_config(server)).unwrap()
}

pub fn app_state(server: &MockServer) -> AppState {
    let vars: HashMap<&str, String> = HashMap::from([
        ("STOREFRONT_API_URL", api_url(server)),
        ("STOREFRONT_BASE_URL", "http://localhost:3000".to_string()),
    ]);
    let config = StorefrontConfig::from_vars(|key| vars.get(key).cloned()).unwrap();
    AppState::new(config).unwrap()
}

pub fn product(id: &str, slug: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "slug": slug,
        "name": name,
        "brand": "Padron",
        "price": 20,
        "discount": 0,
        "category": "cigars"
    })
}

pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn order(order_id: &str, tracking_no: &str, state: &str) -> Value {
    json!({
        "_id": "6600000000000000000000aa",
        "orderid": order_id,
        "trackingNo": tracking_no,
        "state": state,
        "user": USER_ID
    })
}

/// An unsigned JWT carrying `user_id`.
pub fn token_for(user_id: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "id": user_id }).to_string());
    format!("{header}.{payload}.sig")
}
