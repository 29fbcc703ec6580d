//! Settings module for smartpac
//!
//! Holds the global routing settings and the profile loader that reads them,
//! together with the rule lists, from YAML, TOML or JSON.

pub mod profile;
pub mod settings_struct;

pub use profile::Profile;
pub use settings_struct::{BypassConfig, GlobalSettings, ProxyMode};
