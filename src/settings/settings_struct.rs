use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::ProxyServer;

/// Global routing mode.
///
/// The numeric values are shared with the generated PAC script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProxyMode {
    #[default]
    Direct = 0,
    SmartProxy = 1,
    Always = 2,
    SystemProxy = 3,
}

impl ProxyMode {
    pub fn as_number(self) -> u8 {
        self as u8
    }
}

fn deserialize_lowercase_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let hosts = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_hosts(hosts))
}

fn normalize_hosts<I, S>(hosts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hosts
        .into_iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Hosts exempted from proxying in [`ProxyMode::Always`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BypassConfig {
    pub enable_for_always: bool,
    #[serde(deserialize_with = "deserialize_lowercase_set")]
    pub bypass_list: BTreeSet<String>,
}

impl BypassConfig {
    pub fn new<I, S>(enable_for_always: bool, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        BypassConfig {
            enable_for_always,
            bypass_list: normalize_hosts(hosts),
        }
    }

    /// `host` must already be lowercase.
    pub fn bypasses(&self, host: &str) -> bool {
        self.enable_for_always && self.bypass_list.contains(host)
    }
}

/// Settings the engine reads when making a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalSettings {
    pub proxy_mode: ProxyMode,
    pub active_proxy_server: Option<ProxyServer>,
    pub bypass: BypassConfig,
}

impl GlobalSettings {
    pub fn new(proxy_mode: ProxyMode, active_proxy_server: Option<ProxyServer>) -> Self {
        GlobalSettings {
            proxy_mode,
            active_proxy_server,
            bypass: BypassConfig::default(),
        }
    }

    pub fn with_bypass(mut self, bypass: BypassConfig) -> Self {
        self.bypass = bypass;
        self
    }

    pub fn has_active_proxy_server(&self) -> bool {
        self.active_proxy_server.is_some()
    }
}
