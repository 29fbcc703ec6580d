use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::GlobalSettings;
use crate::error::SettingsError;
use crate::models::UserRule;

/// Everything needed to build an engine: global settings and both rule lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub settings: GlobalSettings,
    pub proxy_rules: Vec<UserRule>,
    pub whitelist_rules: Vec<UserRule>,
}

impl Profile {
    /// Parse a profile, detecting JSON, TOML or YAML from the content.
    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        let trimmed = content.trim_start();

        if trimmed.starts_with('{') {
            return Ok(serde_json::from_str(content)?);
        }

        if toml::from_str::<toml::Value>(content).is_ok() {
            return Ok(toml::from_str(content)?);
        }

        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let profile = Profile::load_from_content(&content)?;
        info!(
            "Loaded profile '{}' with {} proxy rules and {} whitelist rules",
            path.display(),
            profile.proxy_rules.len(),
            profile.whitelist_rules.len()
        );
        Ok(profile)
    }
}
