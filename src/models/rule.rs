use serde::{Deserialize, Serialize};

use super::ProxyServer;

/// How the pattern of a [`UserRule`] should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyRuleType {
    MatchPatternHost,
    MatchPatternUrl,
    RegexHost,
    RegexUrl,
    Exact,
}

fn default_true() -> bool {
    true
}

/// A rule as authored by the user, before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRule {
    pub rule_type: ProxyRuleType,
    pub pattern: String,
    #[serde(default)]
    pub proxy: Option<ProxyServer>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl UserRule {
    pub fn new(rule_type: ProxyRuleType, pattern: &str) -> Self {
        UserRule {
            rule_type,
            pattern: pattern.to_string(),
            proxy: None,
            enabled: true,
        }
    }

    pub fn with_proxy(mut self, proxy: ProxyServer) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_defaults_to_true() {
        let rule: UserRule =
            serde_json::from_str(r#"{"ruleType":"MatchPatternHost","pattern":"*.example.com"}"#)
                .unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.rule_type, ProxyRuleType::MatchPatternHost);
        assert!(rule.proxy.is_none());
    }
}
