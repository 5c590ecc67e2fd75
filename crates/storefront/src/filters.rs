//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a star rating out of five, e.g. `4.5 / 5`.
///
/// Usage in templates: `{{ product.rating|rating }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn rating(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{value} / 5"))
}
