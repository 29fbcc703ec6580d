pub mod config;
pub mod pac;

pub use config::{build_proxy_config, PacScriptData, ProxyConfig, ProxyConfigMode};
pub use pac::{generate_pac_script, rule_to_js, rules_to_js};
