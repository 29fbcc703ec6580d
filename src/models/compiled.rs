//! Compiled rule representation
//!
//! A [`CompiledRuleSet`] is a pure projection of the user rule list. It is
//! rebuilt as a whole whenever the rules change and never edited in place.

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ProxyServer;
use crate::error::CompileError;
use crate::utils::regex_dialect::to_rust_dialect;

/// Evaluation strategy of a compiled rule.
///
/// The discriminants are part of the PAC script format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompiledRuleType {
    RegexHost = 0,
    RegexUrl = 1,
    Exact = 2,
    SearchUrl = 3,
    SearchDomain = 4,
    SearchDomainSubdomain = 5,
    SearchDomainAndPath = 6,
    SearchDomainSubdomainAndPath = 7,
}

impl CompiledRuleType {
    pub const ALL: [CompiledRuleType; 8] = [
        CompiledRuleType::RegexHost,
        CompiledRuleType::RegexUrl,
        CompiledRuleType::Exact,
        CompiledRuleType::SearchUrl,
        CompiledRuleType::SearchDomain,
        CompiledRuleType::SearchDomainSubdomain,
        CompiledRuleType::SearchDomainAndPath,
        CompiledRuleType::SearchDomainSubdomainAndPath,
    ];

    pub fn as_number(self) -> u8 {
        self as u8
    }
}

/// A regex in `RegExp` syntax together with its in-process translation.
///
/// `source` and `flags` are what the PAC script receives; the compiled
/// [`Regex`] matches exactly the same strings.
#[derive(Debug, Clone)]
pub struct RuleRegex {
    source: String,
    flags: String,
    regex: Regex,
}

impl RuleRegex {
    /// Build from a source and a flag string, which may be empty or `i`.
    pub fn new(source: &str, flags: &str) -> Result<Self, CompileError> {
        let translated = to_rust_dialect(source, flags)?;
        let regex = Regex::new(&translated).map_err(|e| CompileError::InvalidRegex {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(RuleRegex {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for RuleRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for RuleRegex {}

#[derive(Serialize, Deserialize)]
struct RuleRegexRepr {
    source: String,
    #[serde(default)]
    flags: String,
}

impl Serialize for RuleRegex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RuleRegexRepr {
            source: self.source.clone(),
            flags: self.flags.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleRegex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = RuleRegexRepr::deserialize(deserializer)?;
        RuleRegex::new(&repr.source, &repr.flags).map_err(D::Error::custom)
    }
}

/// A rule ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRule {
    pub compiled_rule_type: CompiledRuleType,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub regex: Option<RuleRegex>,
    #[serde(default)]
    pub proxy: Option<ProxyServer>,
}

impl CompiledRule {
    pub fn with_search(compiled_rule_type: CompiledRuleType, search: impl Into<String>) -> Self {
        CompiledRule {
            compiled_rule_type,
            search: Some(search.into()),
            regex: None,
            proxy: None,
        }
    }

    pub fn with_regex(compiled_rule_type: CompiledRuleType, regex: RuleRegex) -> Self {
        CompiledRule {
            compiled_rule_type,
            search: None,
            regex: Some(regex),
            proxy: None,
        }
    }

    pub fn proxied_by(mut self, proxy: Option<ProxyServer>) -> Self {
        self.proxy = proxy;
        self
    }
}

/// Ordered rule lists; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompiledRuleSet {
    pub rules: Vec<CompiledRule>,
    pub whitelist: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    pub fn new(rules: Vec<CompiledRule>, whitelist: Vec<CompiledRule>) -> Self {
        CompiledRuleSet { rules, whitelist }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_type_numbers_are_stable() {
        let numbers: Vec<u8> = CompiledRuleType::ALL.iter().map(|t| t.as_number()).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_regex_flags() {
        let insensitive = RuleRegex::new(r"^example\.com$", "i").unwrap();
        assert!(insensitive.is_match("EXAMPLE.com"));

        let sensitive = RuleRegex::new(r"^example\.com$", "").unwrap();
        assert!(!sensitive.is_match("EXAMPLE.com"));
    }

    #[test]
    fn test_compiled_regex_rejects_invalid_source_on_load() {
        let json = r#"{"compiledRuleType":"RegexUrl","regex":{"source":"(unclosed","flags":""}}"#;
        assert!(serde_json::from_str::<CompiledRule>(json).is_err());

        let json = r#"{"compiledRuleType":"RegexHost","regex":{"source":"\\pL","flags":""}}"#;
        assert!(serde_json::from_str::<CompiledRule>(json).is_err());
    }

    #[test]
    fn test_compiled_rule_loads_without_search() {
        let json = r#"{"compiledRuleType":"SearchDomain"}"#;
        let rule: CompiledRule = serde_json::from_str(json).unwrap();
        assert!(rule.search.is_none());
        assert!(rule.regex.is_none());
    }
}
