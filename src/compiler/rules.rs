use log::{info, warn};

use super::match_pattern::{compile_host_pattern, compile_url_pattern};
use crate::error::CompileError;
use crate::models::{
    CompiledRule, CompiledRuleSet, CompiledRuleType, ProxyRuleType, RuleRegex, UserRule,
};

/// Result of compiling both rule lists.
#[derive(Debug, Clone, Default)]
pub struct CompileOutcome {
    pub rule_set: CompiledRuleSet,
    /// One entry per dropped rule, in input order.
    pub errors: Vec<CompileError>,
}

fn compile_user_regex(
    rule_type: CompiledRuleType,
    pattern: &str,
) -> Result<CompiledRule, CompileError> {
    if pattern.is_empty() {
        return Err(CompileError::EmptyPattern);
    }
    let regex = RuleRegex::new(pattern, "")?;
    Ok(CompiledRule::with_regex(rule_type, regex))
}

/// Compile a single rule, ignoring its enabled flag.
pub fn compile_rule(rule: &UserRule) -> Result<CompiledRule, CompileError> {
    let compiled = match rule.rule_type {
        ProxyRuleType::Exact => {
            let search = rule.pattern.trim().to_lowercase();
            if search.is_empty() {
                return Err(CompileError::EmptyPattern);
            }
            CompiledRule::with_search(CompiledRuleType::Exact, search)
        }
        ProxyRuleType::RegexHost => compile_user_regex(CompiledRuleType::RegexHost, &rule.pattern)?,
        ProxyRuleType::RegexUrl => compile_user_regex(CompiledRuleType::RegexUrl, &rule.pattern)?,
        ProxyRuleType::MatchPatternHost => compile_host_pattern(&rule.pattern)?,
        ProxyRuleType::MatchPatternUrl => compile_url_pattern(&rule.pattern)?,
    };
    Ok(compiled.proxied_by(rule.proxy.clone()))
}

fn compile_list(
    rules: &[UserRule],
    keep_proxy: bool,
    list_name: &str,
    errors: &mut Vec<CompileError>,
) -> Vec<CompiledRule> {
    let mut compiled = Vec::with_capacity(rules.len());

    for rule in rules.iter().filter(|rule| rule.enabled) {
        match compile_rule(rule) {
            Ok(mut result) => {
                if !keep_proxy {
                    result.proxy = None;
                }
                compiled.push(result);
            }
            Err(e) => {
                warn!("Dropping {} rule '{}': {}", list_name, rule.pattern, e);
                errors.push(e);
            }
        }
    }

    compiled
}

/// Compile the ordinary and whitelist rule lists into a fresh rule set.
///
/// Disabled rules are skipped, rules that fail to compile are dropped and
/// reported, and the relative order of the remaining rules is preserved.
/// Whitelist entries never carry a proxy.
pub fn compile(user_rules: &[UserRule], whitelist_rules: &[UserRule]) -> CompileOutcome {
    let mut errors = Vec::new();
    let rules = compile_list(user_rules, true, "proxy", &mut errors);
    let whitelist = compile_list(whitelist_rules, false, "whitelist", &mut errors);

    info!(
        "Compiled {} proxy rules and {} whitelist rules ({} dropped)",
        rules.len(),
        whitelist.len(),
        errors.len()
    );

    CompileOutcome {
        rule_set: CompiledRuleSet::new(rules, whitelist),
        errors,
    }
}
