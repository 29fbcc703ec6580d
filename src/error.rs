//! Error types shared across the crate

use thiserror::Error;

/// A single rule could not be compiled. The rule is dropped, the rest of
/// the list still compiles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Regex '{pattern}' uses syntax the PAC runtime cannot evaluate: {construct}")]
    UnportableRegex { pattern: String, construct: String },

    #[error("Invalid match pattern '{0}'")]
    InvalidMatchPattern(String),

    #[error("Empty pattern")]
    EmptyPattern,
}

/// Raised while evaluating one rule for one request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Rule of type {0:?} has no search term")]
    MissingSearch(crate::models::CompiledRuleType),

    #[error("Rule of type {0:?} has no regex")]
    MissingRegex(crate::models::CompiledRuleType),
}

/// The host refused a proxy configuration.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Host rejected proxy configuration: {0}")]
    Rejected(String),

    #[error("Failed to serialize proxy configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to render PAC script: {0}")]
    Render(#[from] minijinja::Error),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
