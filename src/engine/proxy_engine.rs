//! Live engine state and host registration
//!
//! The engine keeps the current settings and compiled rules behind one
//! `Arc`. Reloading compiles a fresh rule set and swaps the `Arc`, so a
//! reader always sees either the previous or the new state in full.

use std::sync::{Arc, PoisonError, RwLock};

use log::{error, info};

use super::find_proxy_for_url;
use super::resolver::RoutingToken;
use crate::compiler::compile;
use crate::error::{CompileError, RegistrationError};
use crate::generator::{build_proxy_config, generate_pac_script, ProxyConfig};
use crate::models::{CompiledRuleSet, UserRule};
use crate::settings::{GlobalSettings, Profile};

/// Receiver of generated proxy configurations, e.g. a browser's proxy API.
pub trait ProxyHost {
    fn apply(&self, config: &ProxyConfig) -> Result<(), RegistrationError>;
}

/// Immutable snapshot of everything a decision depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub settings: GlobalSettings,
    pub rule_set: CompiledRuleSet,
}

#[derive(Debug, Default)]
pub struct ProxyEngine {
    state: RwLock<Arc<EngineState>>,
}

impl ProxyEngine {
    pub fn new(settings: GlobalSettings, rule_set: CompiledRuleSet) -> Self {
        ProxyEngine {
            state: RwLock::new(Arc::new(EngineState { settings, rule_set })),
        }
    }

    /// Compile a profile into a new engine. Rules that fail to compile are
    /// returned next to the engine.
    pub fn from_profile(profile: &Profile) -> (Self, Vec<CompileError>) {
        let outcome = compile(&profile.proxy_rules, &profile.whitelist_rules);
        (
            ProxyEngine::new(profile.settings.clone(), outcome.rule_set),
            outcome.errors,
        )
    }

    pub fn snapshot(&self) -> Arc<EngineState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, state: EngineState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
    }

    /// Recompile the rules and replace the whole state at once.
    pub fn reload(
        &self,
        settings: GlobalSettings,
        rules: &[UserRule],
        whitelist: &[UserRule],
    ) -> Vec<CompileError> {
        let outcome = compile(rules, whitelist);
        self.replace(EngineState {
            settings,
            rule_set: outcome.rule_set,
        });
        info!("Proxy engine reloaded");
        outcome.errors
    }

    pub fn reload_profile(&self, profile: &Profile) -> Vec<CompileError> {
        self.reload(
            profile.settings.clone(),
            &profile.proxy_rules,
            &profile.whitelist_rules,
        )
    }

    /// Decide in-process how a request should be routed.
    pub fn find_proxy_for_url(&self, url: &str, host: &str) -> RoutingToken {
        let state = self.snapshot();
        find_proxy_for_url(&state.settings, &state.rule_set, url, host)
    }

    pub fn generate_pac_script(&self) -> Result<String, minijinja::Error> {
        let state = self.snapshot();
        generate_pac_script(&state.settings, &state.rule_set)
    }

    pub fn proxy_config(&self) -> Result<ProxyConfig, minijinja::Error> {
        let state = self.snapshot();
        build_proxy_config(&state.settings, &state.rule_set)
    }

    /// Hand the current configuration to the host.
    ///
    /// A rejected configuration is logged and returned; it is not retried and
    /// the host keeps whatever configuration it had before.
    pub fn push_config(&self, host: &dyn ProxyHost) -> Result<(), RegistrationError> {
        let result = self
            .proxy_config()
            .map_err(RegistrationError::from)
            .and_then(|config| host.apply(&config));

        if let Err(e) = &result {
            error!("Updating proxy configuration failed: {}", e);
        }
        result
    }
}
