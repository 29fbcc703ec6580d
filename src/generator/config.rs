use serde::Serialize;

use super::pac::generate_pac_script;
use crate::models::CompiledRuleSet;
use crate::settings::{GlobalSettings, ProxyMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyConfigMode {
    Direct,
    System,
    PacScript,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacScriptData {
    pub data: String,
}

/// Configuration object for hosts with a native proxy settings API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub mode: ProxyConfigMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pac_script: Option<PacScriptData>,
}

impl ProxyConfig {
    pub fn direct() -> Self {
        ProxyConfig {
            mode: ProxyConfigMode::Direct,
            pac_script: None,
        }
    }

    pub fn system() -> Self {
        ProxyConfig {
            mode: ProxyConfigMode::System,
            pac_script: None,
        }
    }

    pub fn pac_script(data: String) -> Self {
        ProxyConfig {
            mode: ProxyConfigMode::PacScript,
            pac_script: Some(PacScriptData { data }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the configuration for the current mode.
///
/// Direct and system modes need no per-request evaluation, so no script is
/// generated for them.
pub fn build_proxy_config(
    settings: &GlobalSettings,
    rule_set: &CompiledRuleSet,
) -> Result<ProxyConfig, minijinja::Error> {
    match settings.proxy_mode {
        ProxyMode::Direct => Ok(ProxyConfig::direct()),
        ProxyMode::SystemProxy => Ok(ProxyConfig::system()),
        ProxyMode::SmartProxy | ProxyMode::Always => {
            generate_pac_script(settings, rule_set).map(ProxyConfig::pac_script)
        }
    }
}
