pub mod js;
pub mod regex_dialect;
pub mod url;

// Re-export common utilities
pub use js::{js_json, js_optional_string, js_regex, js_string};
pub use regex_dialect::to_rust_dialect;
pub use url::{extract_host_from_invalid_url, host_from_url, remove_schema_from_url};
