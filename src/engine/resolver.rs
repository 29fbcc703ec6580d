//! Decision resolver
//!
//! Maps a [`MatchResult`] onto the fixed token vocabulary PAC hosts expect:
//! `"DIRECT"`, `"SYSTEM"`, `""` or `"<SCHEME> <host>:<port>"`.

use std::fmt;

use super::matcher::MatchResult;
use crate::models::ProxyServer;
use crate::settings::ProxyMode;

pub const RESULT_DIRECT: &str = "DIRECT";
pub const RESULT_SYSTEM: &str = "SYSTEM";
pub const RESULT_BROWSER_DEFAULT: &str = "";

/// Routing decision handed back to the host's network stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingToken {
    Direct,
    System,
    /// Empty token: the browser applies its own default.
    BrowserDefault,
    Proxy {
        scheme: &'static str,
        host: String,
        port: u16,
    },
}

impl fmt::Display for RoutingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingToken::Direct => f.write_str(RESULT_DIRECT),
            RoutingToken::System => f.write_str(RESULT_SYSTEM),
            RoutingToken::BrowserDefault => f.write_str(RESULT_BROWSER_DEFAULT),
            RoutingToken::Proxy { scheme, host, port } => write!(f, "{} {}:{}", scheme, host, port),
        }
    }
}

/// Convert a proxy server into its PAC directive.
///
/// An absent or invalid server yields [`RoutingToken::Direct`].
pub fn proxy_token(server: Option<&ProxyServer>) -> RoutingToken {
    let Some(server) = server.filter(|s| s.is_valid()) else {
        return RoutingToken::Direct;
    };
    match server.protocol.pac_scheme() {
        Some(scheme) => RoutingToken::Proxy {
            scheme,
            host: server.host.clone(),
            port: server.port,
        },
        None => RoutingToken::Direct,
    }
}

/// Turn a matcher verdict into a routing token.
pub fn resolve(
    result: &MatchResult,
    proxy_mode: ProxyMode,
    active_proxy: Option<&ProxyServer>,
) -> RoutingToken {
    if proxy_mode == ProxyMode::Direct {
        return RoutingToken::Direct;
    }
    match result {
        MatchResult::Direct => RoutingToken::Direct,
        MatchResult::DeferToSystem => RoutingToken::System,
        MatchResult::LetBrowserDecide => RoutingToken::BrowserDefault,
        MatchResult::UseActiveProxy => proxy_token(active_proxy),
        MatchResult::UseProxy(proxy) => proxy_token(Some(proxy)),
    }
}
