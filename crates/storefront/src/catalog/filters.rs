//! Product filter selections and backend query parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize empty strings as None for optional numeric fields.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A product filter selection, as submitted by the listing page.
///
/// Every field is optional. Field names follow the query string used by
/// the storefront's own URLs, which mirrors the backend's parameters plus
/// two generic aliases (`sub` and `subPro`) used by navigation menus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Alias for `category`.
    pub sub: Option<String>,
    /// Alias for `subCategory`.
    pub sub_pro: Option<String>,
    pub sub_category: Option<String>,
    pub new: Option<String>,
    pub discount: Option<String>,
    pub best: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
}

impl ProductFilters {
    /// Build the backend query parameters for this selection.
    ///
    /// Only present fields are copied; empty strings count as absent.
    /// Aliases are assigned before their direct counterparts, so a direct
    /// field overwrites its alias when both are present.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::default();

        params.set_opt("category", self.sub.as_deref());
        params.set_opt("category", self.category.as_deref());
        params.set_opt("brand", self.brand.as_deref());
        params.set_opt("subCategory", self.sub_pro.as_deref());
        params.set_opt("subCategory", self.sub_category.as_deref());
        params.set_opt("new", self.new.as_deref());
        params.set_opt("discount", self.discount.as_deref());
        params.set_opt("best", self.best.as_deref());
        if let Some(page) = self.page {
            params.set("page", page.to_string());
        }
        params.set_opt("sort", self.sort.as_deref());
        params.set_opt("search", self.search.as_deref());

        params
    }

    /// The requested page, defaulting to the first.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Copy of this selection pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// Storefront URL query string for this selection (without `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let fields = [
            ("category", self.category.as_deref()),
            ("brand", self.brand.as_deref()),
            ("sub", self.sub.as_deref()),
            ("subPro", self.sub_pro.as_deref()),
            ("subCategory", self.sub_category.as_deref()),
            ("new", self.new.as_deref()),
            ("discount", self.discount.as_deref()),
            ("best", self.best.as_deref()),
            ("search", self.search.as_deref()),
            ("sort", self.sort.as_deref()),
        ];
        for (key, value) in fields {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
            }
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        serializer.finish()
    }
}

/// Query parameters sent to the product listing endpoint.
///
/// Keys are unique; assigning an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<&'static str, String>);

impl QueryParams {
    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, key: &'static str, value: String) {
        self.0.insert(key, value);
    }

    fn set_opt(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.set(key, value.to_string());
        }
    }

    /// Value of a parameter, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }
}
