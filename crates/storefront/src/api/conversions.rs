//! Conversions from raw backend JSON into domain types.
//!
//! Every record is mapped independently. A field that is missing or has an
//! unexpected shape falls back to its default instead of failing the whole
//! response, so one bad document never blanks a listing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use emberline_core::{OrderState, original_price};

use super::types::{Blog, Order, Product};

/// Accessor over a JSON object that tolerates non-object input.
struct Fields<'a>(Option<&'a Map<String, Value>>);

impl<'a> Fields<'a> {
    fn new(value: &'a Value) -> Self {
        Self(value.as_object())
    }

    /// First present, non-null value among `keys`.
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        let map = self.0?;
        keys.iter()
            .filter_map(|key| map.get(*key))
            .find(|value| !value.is_null())
    }

    fn string(&self, keys: &[&str]) -> String {
        self.get(keys).map(text).unwrap_or_default()
    }

    fn decimal(&self, keys: &[&str]) -> Option<Decimal> {
        self.get(keys).and_then(decimal)
    }

    fn boolean(&self, keys: &[&str], default: bool) -> bool {
        self.get(keys).and_then(boolean).unwrap_or(default)
    }

    fn integer(&self, keys: &[&str]) -> i64 {
        self.get(keys).and_then(integer).unwrap_or_default()
    }

    fn list(&self, keys: &[&str]) -> Vec<String> {
        self.get(keys).map(string_list).unwrap_or_default()
    }

    fn timestamp(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        self.get(keys).and_then(timestamp)
    }
}

// =============================================================================
// Scalar Helpers
// =============================================================================

/// Read a value as display text.
///
/// Objects are read through their `name` field, which is how the backend
/// embeds populated brand and category references.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => map.get("name").map(text).unwrap_or_default(),
        Value::Null | Value::Array(_) => String::new(),
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        #[allow(clippy::cast_possible_truncation)] // Quantities are small whole numbers
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// First image URL from an `image` string or an `images` array.
fn first_image(fields: &Fields<'_>) -> String {
    let image = fields.string(&["image"]);
    if !image.is_empty() {
        return image;
    }

    fields
        .list(&["images"])
        .into_iter()
        .next()
        .unwrap_or_default()
}

// =============================================================================
// Record Conversions
// =============================================================================

/// Convert a raw product document.
///
/// `current_price` falls back to `price`; `original_price` is always
/// derived from `price` and `discount`.
pub fn convert_product(value: &Value) -> Product {
    let fields = Fields::new(value);

    let price = fields.decimal(&["price"]).unwrap_or_default();
    let discount = fields.decimal(&["discount"]).unwrap_or_default();
    let current_price = fields.decimal(&["currentPrice"]).unwrap_or(price);

    Product {
        id: fields.string(&["_id", "id"]),
        slug: fields.string(&["slug"]),
        brand: fields.string(&["brand", "brandName"]),
        name: fields.string(&["name", "title"]),
        image: first_image(&fields),
        original_price: original_price(price, discount),
        current_price,
        price,
        best_seller: fields.boolean(&["bestSeller", "isBestSeller", "best"], false),
        is_new: fields.boolean(&["new", "isNew"], false),
        in_stock: fields.boolean(&["inStock"], true),
        category: fields.string(&["category"]),
        sub_category: fields.string(&["subCategory"]),
        features: fields.list(&["features"]),
        description: fields.string(&["description"]),
        discount,
        rating: fields.decimal(&["rating"]).unwrap_or_default(),
        quantity: fields.integer(&["quantity", "stock"]),
        colors: fields.list(&["colors", "color"]),
    }
}

/// Convert a raw blog document.
pub fn convert_blog(value: &Value) -> Blog {
    let fields = Fields::new(value);

    Blog {
        id: fields.string(&["_id", "id"]),
        title: fields.string(&["title"]),
        slug: fields.string(&["slug"]),
        excerpt: fields.string(&["excerpt", "shortDescription", "summary"]),
        content: fields.string(&["content", "description", "body"]),
        image: first_image(&fields),
        author: fields.string(&["author"]),
        created_at: fields.timestamp(&["createdAt"]),
    }
}

/// Convert a raw order document.
pub fn convert_order(value: &Value) -> Order {
    let fields = Fields::new(value);

    let state = fields.string(&["state", "status"]);

    Order {
        id: fields.string(&["_id", "id"]),
        order_id: fields.string(&["orderid", "orderId"]),
        tracking_no: fields.string(&["trackingNo", "trackingNumber"]),
        state: if state.is_empty() {
            OrderState::Unknown
        } else {
            OrderState::from(state)
        },
        user: fields.string(&["user", "userId"]),
        created_at: fields.timestamp(&["createdAt"]),
        updated_at: fields.timestamp(&["updatedAt"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_full_record() {
        let product = convert_product(&json!({
            "_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "slug": "padron-1964",
            "brand": "Padron",
            "name": "1964 Anniversary",
            "image": "https://cdn.example.com/p.jpg",
            "price": 50,
            "currentPrice": 40,
            "discount": 20,
            "bestSeller": true,
            "new": false,
            "inStock": false,
            "category": "cigars",
            "subCategory": "maduro",
            "features": ["Box-pressed", "Nicaraguan"],
            "description": "Rich and earthy.",
            "rating": 4.5,
            "quantity": 12,
            "colors": ["brown"]
        }));

        assert_eq!(product.id, "65f1c2a9e4b0a1b2c3d4e5f6");
        assert_eq!(product.brand, "Padron");
        assert_eq!(product.price, Decimal::from(50));
        assert_eq!(product.current_price, Decimal::from(40));
        assert_eq!(product.original_price, Decimal::from(250));
        assert!(product.best_seller);
        assert!(!product.in_stock);
        assert_eq!(product.features.len(), 2);
        assert_eq!(product.rating, Decimal::new(45, 1));
        assert_eq!(product.quantity, 12);
    }

    #[test]
    fn test_product_defaults_for_missing_fields() {
        let product = convert_product(&json!({ "_id": "abc" }));

        assert_eq!(product.id, "abc");
        assert_eq!(product.name, "");
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.current_price, Decimal::ZERO);
        assert_eq!(product.original_price, Decimal::ZERO);
        assert_eq!(product.discount, Decimal::ZERO);
        assert_eq!(product.rating, Decimal::ZERO);
        assert_eq!(product.quantity, 0);
        assert!(product.features.is_empty());
        assert!(product.colors.is_empty());
        assert!(product.in_stock);
        assert!(!product.best_seller);
        assert!(!product.is_new);
    }

    #[test]
    fn test_current_price_defaults_to_price() {
        let product = convert_product(&json!({ "price": "19.99" }));
        assert_eq!(product.current_price, Decimal::new(1999, 2));
    }

    #[test]
    fn test_original_price_zero_without_discount() {
        let product = convert_product(&json!({ "price": 80, "discount": 0 }));
        assert_eq!(product.original_price, Decimal::ZERO);
    }

    #[test]
    fn test_non_object_becomes_default_record() {
        assert_eq!(convert_product(&json!("garbage")), Product::default());
        assert_eq!(convert_product(&json!(null)), Product::default());
        assert_eq!(convert_product(&json!([1, 2])), Product::default());
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let product = convert_product(&json!({
            "name": "Hookah Base",
            "price": "not a number",
            "inStock": "maybe",
            "features": "single feature",
            "quantity": 3.7,
            "brand": { "name": "Khalil Mamoon" },
            "images": ["first.jpg", "second.jpg"]
        }));

        assert_eq!(product.name, "Hookah Base");
        assert_eq!(product.price, Decimal::ZERO);
        assert!(product.in_stock);
        assert_eq!(product.features, vec!["single feature".to_string()]);
        assert_eq!(product.quantity, 3);
        assert_eq!(product.brand, "Khalil Mamoon");
        assert_eq!(product.image, "first.jpg");
    }

    #[test]
    fn test_convert_order() {
        let order = convert_order(&json!({
            "_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "orderid": "A1",
            "trackingNo": "T1",
            "state": "shipped",
            "user": "65f1c2a9e4b0a1b2c3d4e5f7",
            "createdAt": "2024-03-01T12:00:00.000Z"
        }));

        assert_eq!(order.order_id, "A1");
        assert_eq!(order.tracking_no, "T1");
        assert_eq!(order.state, OrderState::Shipped);
        assert!(order.created_at.is_some());
        assert!(order.updated_at.is_none());
    }

    #[test]
    fn test_convert_order_unknown_state() {
        let order = convert_order(&json!({ "orderid": "A2", "state": "returned" }));
        assert_eq!(order.state.label(), "returned");
    }

    #[test]
    fn test_convert_order_missing_state() {
        let order = convert_order(&json!({ "orderid": "A1" }));
        assert_eq!(order.state, OrderState::Unknown);
        assert_eq!(order.state.label(), "unknown");
    }

    #[test]
    fn test_product_with_extreme_discount() {
        let product = convert_product(&json!({
            "price": 100,
            "discount": "0.0000000000000000000000000001"
        }));
        assert_eq!(product.original_price, Decimal::ZERO);
        assert_eq!(product.current_price, Decimal::from(100));
    }

    #[test]
    fn test_convert_blog() {
        let blog = convert_blog(&json!({
            "_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "title": "Pairing cigars with coffee",
            "description": "Start with a medium roast.",
            "images": ["blog.jpg"]
        }));

        assert_eq!(blog.title, "Pairing cigars with coffee");
        assert_eq!(blog.content, "Start with a medium roast.");
        assert_eq!(blog.image, "blog.jpg");
        assert!(blog.created_at.is_none());
    }
}
