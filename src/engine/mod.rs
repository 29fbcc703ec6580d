//! Rule matching and routing decisions

pub mod matcher;
pub mod proxy_engine;
pub mod resolver;

pub use matcher::{evaluate_rule, find_first_match, match_request, MatchResult, RequestContext};
pub use proxy_engine::{EngineState, ProxyEngine, ProxyHost};
pub use resolver::{proxy_token, resolve, RoutingToken};

use crate::models::CompiledRuleSet;
use crate::settings::GlobalSettings;

/// Match a request and resolve the verdict into a routing token.
pub fn find_proxy_for_url(
    settings: &GlobalSettings,
    rule_set: &CompiledRuleSet,
    url: &str,
    host: &str,
) -> RoutingToken {
    let result = match_request(settings, rule_set, url, host);
    resolve(
        &result,
        settings.proxy_mode,
        settings.active_proxy_server.as_ref(),
    )
}
