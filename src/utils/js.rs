//! JavaScript literal rendering for generated PAC scripts
//!
//! Everything interpolated into a script goes through these helpers so rule
//! content can never break out of its literal.

use serde::Serialize;

use crate::models::RuleRegex;

/// Serialize a value as JSON that is also a valid JavaScript expression.
///
/// JSON allows the raw line and paragraph separators inside strings, but
/// older script engines treat them as line terminators.
pub fn js_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let encoded = serde_json::to_string(value)?;
    Ok(encoded
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

/// Render a string as a double-quoted JavaScript string literal.
pub fn js_string(value: &str) -> String {
    // serializing a &str cannot fail
    js_json(value).unwrap_or_else(|_| String::from("\"\""))
}

pub fn js_optional_string(value: Option<&str>) -> String {
    match value {
        Some(value) => js_string(value),
        None => String::from("null"),
    }
}

/// Render a regex as a `RegExp` construction from its source and flags.
pub fn js_regex(regex: &RuleRegex) -> String {
    format!(
        "new RegExp({}, {})",
        js_string(regex.source()),
        js_string(regex.flags())
    )
}
