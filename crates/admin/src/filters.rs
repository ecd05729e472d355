//! Template filters, available to every template of this crate as `filters::*`.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Footer copyright year. The input is ignored: `{{ ""|current_year }}`.
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Datelike::year(&chrono::Utc::now()))
}

/// Up to two uppercase initials, for the header avatar.
///
/// Usage in templates: `{{ layout.admin_name|initials }}`
#[askama::filter_fn]
pub fn initials(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(initials_of(&value.to_string()))
}

fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
