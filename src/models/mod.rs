//! Core data models for the rule engine
//!
//! This module contains the data shapes the engine consumes and produces,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use smartpac::models::{ProxyRuleType, ProxyServer, ProxyServerProtocol, UserRule};
//!
//! let proxy = ProxyServer::new("10.0.0.1", 3128, ProxyServerProtocol::HTTP);
//! let rule = UserRule::new(ProxyRuleType::MatchPatternHost, "*.example.com").with_proxy(proxy);
//! assert!(rule.enabled);
//! ```

mod compiled;
mod proxy;
mod rule;

pub use compiled::*;
pub use proxy::*;
pub use rule::*;
