//! Rule matcher
//!
//! Evaluates one `(url, host)` pair against a compiled rule set in a fixed
//! stage order. Each call is independent; the only cached state lives in a
//! [`RequestContext`] that is dropped when the call returns.

use log::debug;
use once_cell::unsync::OnceCell;

use crate::error::MatchError;
use crate::models::{CompiledRule, CompiledRuleSet, CompiledRuleType, ProxyServer, RuleRegex};
use crate::settings::{GlobalSettings, ProxyMode};
use crate::utils::url::{extract_host_from_invalid_url, remove_schema_from_url};

/// Verdict of the matcher, before it is turned into a routing token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Direct,
    /// Let the operating system's proxy configuration decide.
    DeferToSystem,
    LetBrowserDecide,
    UseActiveProxy,
    UseProxy(ProxyServer),
}

/// Per-request memo of derived URL forms.
pub struct RequestContext<'a> {
    url: &'a str,
    lower_url: OnceCell<String>,
    schema_less_url: OnceCell<Option<String>>,
}

impl<'a> RequestContext<'a> {
    pub fn new(url: &'a str) -> Self {
        RequestContext {
            url,
            lower_url: OnceCell::new(),
            schema_less_url: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        self.url
    }

    pub fn lower_url(&self) -> &str {
        self.lower_url.get_or_init(|| self.url.to_lowercase())
    }

    /// Lowercased URL without `scheme://`, `None` if the URL does not parse.
    pub fn schema_less_url(&self) -> Option<&str> {
        self.schema_less_url
            .get_or_init(|| remove_schema_from_url(self.url).map(str::to_lowercase))
            .as_deref()
    }
}

fn search_of(rule: &CompiledRule) -> Result<&str, MatchError> {
    rule.search
        .as_deref()
        .ok_or(MatchError::MissingSearch(rule.compiled_rule_type))
}

fn regex_of(rule: &CompiledRule) -> Result<&RuleRegex, MatchError> {
    rule.regex
        .as_ref()
        .ok_or(MatchError::MissingRegex(rule.compiled_rule_type))
}

/// Evaluate a single rule against a request.
pub fn evaluate_rule(
    rule: &CompiledRule,
    ctx: &RequestContext<'_>,
    host: &str,
) -> Result<bool, MatchError> {
    let matched = match rule.compiled_rule_type {
        CompiledRuleType::Exact => ctx.lower_url() == search_of(rule)?,
        CompiledRuleType::RegexHost => regex_of(rule)?.is_match(host),
        CompiledRuleType::RegexUrl => regex_of(rule)?.is_match(ctx.url()),
        CompiledRuleType::SearchUrl => ctx.url().starts_with(search_of(rule)?),
        CompiledRuleType::SearchDomain => search_of(rule)? == host,
        CompiledRuleType::SearchDomainSubdomain => {
            let search = search_of(rule)?;
            search == host || host.ends_with(&format!(".{}", search))
        }
        CompiledRuleType::SearchDomainAndPath => {
            let search = search_of(rule)?;
            match ctx.schema_less_url() {
                Some(schema_less) => schema_less.starts_with(search),
                None => false,
            }
        }
        CompiledRuleType::SearchDomainSubdomainAndPath => {
            let search = search_of(rule)?;
            let Some(schema_less) = ctx.schema_less_url() else {
                return Ok(false);
            };
            if schema_less.starts_with(search) {
                return Ok(true);
            }
            if let Some(search_host) = extract_host_from_invalid_url(search) {
                if search_host != host {
                    return Ok(false);
                }
            }
            schema_less.contains(&format!(".{}", search))
        }
    };
    Ok(matched)
}

/// First rule in list order that matches the request.
pub fn find_first_match<'r>(
    rules: &'r [CompiledRule],
    ctx: &RequestContext<'_>,
    host: &str,
) -> Result<Option<&'r CompiledRule>, MatchError> {
    for rule in rules {
        if evaluate_rule(rule, ctx, host)? {
            return Ok(Some(rule));
        }
    }
    Ok(None)
}

fn try_match(
    settings: &GlobalSettings,
    rule_set: &CompiledRuleSet,
    url: &str,
    host: &str,
) -> Result<MatchResult, MatchError> {
    if settings.proxy_mode == ProxyMode::Direct {
        return Ok(MatchResult::Direct);
    }

    let ctx = RequestContext::new(url);
    if find_first_match(&rule_set.whitelist, &ctx, host)?.is_some() {
        return Ok(MatchResult::Direct);
    }

    // bypass is left to the operating system here
    if settings.proxy_mode == ProxyMode::SystemProxy {
        return Ok(MatchResult::DeferToSystem);
    }

    if !settings.has_active_proxy_server() {
        return Ok(MatchResult::LetBrowserDecide);
    }

    let host = host.to_lowercase();

    if settings.proxy_mode == ProxyMode::Always {
        if settings.bypass.bypasses(&host) {
            return Ok(MatchResult::Direct);
        }
        return Ok(MatchResult::UseActiveProxy);
    }

    if find_first_match(&rule_set.whitelist, &ctx, &host)?.is_some() {
        return Ok(MatchResult::Direct);
    }

    let result = match find_first_match(&rule_set.rules, &ctx, &host)? {
        Some(CompiledRule {
            proxy: Some(proxy), ..
        }) => MatchResult::UseProxy(proxy.clone()),
        Some(_) => MatchResult::UseActiveProxy,
        None => MatchResult::LetBrowserDecide,
    };
    Ok(result)
}

/// Decide how a request should be routed.
///
/// Never fails: a rule that cannot be evaluated makes this request fall back
/// to [`MatchResult::LetBrowserDecide`].
pub fn match_request(
    settings: &GlobalSettings,
    rule_set: &CompiledRuleSet,
    url: &str,
    host: &str,
) -> MatchResult {
    match try_match(settings, rule_set, url, host) {
        Ok(result) => result,
        Err(e) => {
            debug!("Rule evaluation failed for '{}': {}", url, e);
            MatchResult::LetBrowserDecide
        }
    }
}
