//! Match pattern decomposition
//!
//! Host patterns look like `*.example.com`, URL patterns like
//! `*://*.example.com/path*`. Shapes that map onto a plain string comparison
//! become one of the `Search*` rule types; everything else falls back to an
//! anchored, case-insensitive regex.

use crate::error::CompileError;
use crate::models::{CompiledRule, CompiledRuleType, RuleRegex};

const MATCH_PATTERN_FLAGS: &str = "i";
const ALL_URLS: &str = "<all_urls>";
const ALL_URLS_REGEX: &str = r"^(?:https?|wss?|ftp|file)://";
const SCHEME_WILDCARD: &str = "[^:/]+";
const HOST_WILDCARD: &str = "[^/]*";
const SUBDOMAIN_WILDCARD: &str = r"(?:[^/]*\.)?";
const PATH_WILDCARD: &str = ".*";

#[derive(Debug, PartialEq, Eq)]
enum HostShape<'a> {
    Any,
    Subdomain(&'a str),
    Exact(&'a str),
    Glob(&'a str),
}

#[derive(Debug, PartialEq, Eq)]
enum PathShape<'a> {
    Any,
    Prefix(&'a str),
    Glob(&'a str),
}

fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c == '*' || c == '/' || c == ':' || c.is_whitespace())
}

fn host_shape(host: &str) -> HostShape<'_> {
    if host == "*" {
        return HostShape::Any;
    }
    if let Some(domain) = host.strip_prefix("*.") {
        if is_plain_host(domain) {
            return HostShape::Subdomain(domain);
        }
    }
    if is_plain_host(host) {
        return HostShape::Exact(host);
    }
    HostShape::Glob(host)
}

fn path_shape(path: &str) -> PathShape<'_> {
    if path.is_empty() || path == "/*" {
        return PathShape::Any;
    }
    match path.strip_suffix('*') {
        Some(prefix) if !prefix.contains('*') => PathShape::Prefix(prefix),
        _ => PathShape::Glob(path),
    }
}

/// Escape every literal piece of a glob and join the pieces with `star`.
fn glob_to_regex(glob: &str, star: &str) -> String {
    glob.split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(star)
}

fn host_regex(shape: &HostShape<'_>) -> String {
    match shape {
        HostShape::Any => HOST_WILDCARD.to_string(),
        HostShape::Subdomain(domain) => {
            format!("{}{}", SUBDOMAIN_WILDCARD, regex::escape(domain))
        }
        HostShape::Exact(host) => regex::escape(host),
        HostShape::Glob(glob) => match glob.strip_prefix("*.") {
            Some(rest) => format!("{}{}", SUBDOMAIN_WILDCARD, glob_to_regex(rest, HOST_WILDCARD)),
            None => glob_to_regex(glob, HOST_WILDCARD),
        },
    }
}

fn regex_rule(rule_type: CompiledRuleType, source: &str) -> Result<CompiledRule, CompileError> {
    let regex = RuleRegex::new(source, MATCH_PATTERN_FLAGS)?;
    Ok(CompiledRule::with_regex(rule_type, regex))
}

/// Compile a host match pattern such as `*.example.com`, `example.com` or
/// `example.com/api`.
///
/// A bare domain covers its subdomains too. A bare domain followed by a path
/// compiles to a domain-and-path search; any other shape is matched as the
/// URL pattern `*://<pattern>`.
pub fn compile_host_pattern(pattern: &str) -> Result<CompiledRule, CompileError> {
    let pattern = pattern.trim().to_lowercase();
    if pattern.is_empty() {
        return Err(CompileError::EmptyPattern);
    }

    if let Some(slash) = pattern.find('/') {
        let (host, path) = pattern.split_at(slash);
        let prefix = path.strip_suffix('*').unwrap_or(path);
        return match host_shape(host) {
            HostShape::Exact(domain) if prefix == "/" => Ok(CompiledRule::with_search(
                CompiledRuleType::SearchDomainSubdomain,
                domain,
            )),
            HostShape::Exact(domain) if !prefix.contains('*') => Ok(CompiledRule::with_search(
                CompiledRuleType::SearchDomainSubdomainAndPath,
                format!("{}{}", domain, prefix),
            )),
            _ => compile_url_pattern(&format!("*://{}", pattern)),
        };
    }

    let shape = host_shape(&pattern);
    match &shape {
        HostShape::Subdomain(domain) | HostShape::Exact(domain) => Ok(CompiledRule::with_search(
            CompiledRuleType::SearchDomainSubdomain,
            *domain,
        )),
        HostShape::Any | HostShape::Glob(_) => regex_rule(
            CompiledRuleType::RegexHost,
            &format!("^{}$", host_regex(&shape)),
        ),
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    if scheme == "*" {
        return true;
    }
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        _ => false,
    }
}

/// Compile a URL match pattern such as `*://*.example.com/path*`.
pub fn compile_url_pattern(pattern: &str) -> Result<CompiledRule, CompileError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(CompileError::EmptyPattern);
    }
    if pattern == ALL_URLS {
        return regex_rule(CompiledRuleType::RegexUrl, ALL_URLS_REGEX);
    }

    let invalid = || CompileError::InvalidMatchPattern(pattern.to_string());
    let (scheme, rest) = pattern.split_once("://").ok_or_else(invalid)?;
    let scheme = scheme.to_lowercase();
    if !is_valid_scheme(&scheme) {
        return Err(invalid());
    }

    let (host, path) = match rest.find('/') {
        Some(slash) => (&rest[..slash], &rest[slash..]),
        None => (rest, ""),
    };
    let host = host.to_lowercase();
    if host.is_empty() {
        return Err(invalid());
    }

    let host_kind = host_shape(&host);
    let path_kind = path_shape(path);

    if scheme == "*" {
        match (&host_kind, &path_kind) {
            (HostShape::Subdomain(domain), PathShape::Any) => {
                return Ok(CompiledRule::with_search(
                    CompiledRuleType::SearchDomainSubdomain,
                    *domain,
                ))
            }
            (HostShape::Exact(domain), PathShape::Any) => {
                return Ok(CompiledRule::with_search(
                    CompiledRuleType::SearchDomain,
                    *domain,
                ))
            }
            (HostShape::Exact(domain), PathShape::Prefix(prefix)) => {
                return Ok(CompiledRule::with_search(
                    CompiledRuleType::SearchDomainAndPath,
                    format!("{}{}", domain, prefix.to_lowercase()),
                ))
            }
            _ => {}
        }
    } else if let HostShape::Exact(domain) = &host_kind {
        match &path_kind {
            PathShape::Any => {
                return Ok(CompiledRule::with_search(
                    CompiledRuleType::SearchUrl,
                    format!("{}://{}/", scheme, domain),
                ))
            }
            PathShape::Prefix(prefix) => {
                return Ok(CompiledRule::with_search(
                    CompiledRuleType::SearchUrl,
                    format!("{}://{}{}", scheme, domain, prefix),
                ))
            }
            PathShape::Glob(_) => {}
        }
    }

    let scheme_regex = if scheme == "*" {
        SCHEME_WILDCARD.to_string()
    } else {
        regex::escape(&scheme)
    };
    let path_regex = match path {
        "" => String::from("(?:/.*)?"),
        path => glob_to_regex(path, PATH_WILDCARD),
    };
    regex_rule(
        CompiledRuleType::RegexUrl,
        &format!("^{}://{}{}$", scheme_regex, host_regex(&host_kind), path_regex),
    )
}
