//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

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

/// Formats a storage capacity in gigabytes.
///
/// Usage in templates: `{{ memory|gigabytes }}`
#[askama::filter_fn]
pub fn gigabytes(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{value} GB"))
}
