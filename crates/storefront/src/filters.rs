//! Template filters, available to every template of this crate as `filters::*`.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Footer copyright year. The input is ignored: `{{ ""|current_year }}`.
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Datelike::year(&chrono::Utc::now()))
}

/// First word of a full name, for greetings.
///
/// Usage in templates: `{{ user_name|first_name }}`
#[askama::filter_fn]
pub fn first_name(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let full = value.to_string();
    Ok(full.split_whitespace().next().unwrap_or_default().to_string())
}
