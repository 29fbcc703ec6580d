//! Proxy rule engine for browsers
//!
//! Compiles user proxy rules into an ordered rule set, decides per request
//! whether to go direct, through the system proxy or through an upstream
//! proxy, and renders the same decision logic as a standalone PAC script.
//!
//! ```rust
//! use smartpac::compiler::compile;
//! use smartpac::engine::find_proxy_for_url;
//! use smartpac::models::{ProxyRuleType, ProxyServer, ProxyServerProtocol, UserRule};
//! use smartpac::settings::{GlobalSettings, ProxyMode};
//!
//! let rules = vec![UserRule::new(ProxyRuleType::MatchPatternHost, "foo.com")];
//! let outcome = compile(&rules, &[]);
//! let settings = GlobalSettings::new(
//!     ProxyMode::SmartProxy,
//!     Some(ProxyServer::new("1.2.3.4", 8080, ProxyServerProtocol::HTTP)),
//! );
//!
//! let token = find_proxy_for_url(&settings, &outcome.rule_set, "https://foo.com/", "foo.com");
//! assert_eq!(token.to_string(), "PROXY 1.2.3.4:8080");
//! ```

pub mod compiler;
pub mod engine;
pub mod error;
pub mod generator;
pub mod models;
pub mod settings;
pub mod utils;

// Re-export the main entry points for easier access
pub use compiler::{compile, CompileOutcome};
pub use engine::{find_proxy_for_url, ProxyEngine, ProxyHost, RoutingToken};
pub use generator::{build_proxy_config, generate_pac_script, ProxyConfig};
pub use settings::{GlobalSettings, Profile, ProxyMode};
