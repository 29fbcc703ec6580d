//! Pattern compiler
//!
//! Turns user rules into [`CompiledRule`](crate::models::CompiledRule)s with
//! a classification tag and either a search term or a prebuilt regex.

pub mod match_pattern;
pub mod rules;

pub use match_pattern::{compile_host_pattern, compile_url_pattern};
pub use rules::{compile, compile_rule, CompileOutcome};
