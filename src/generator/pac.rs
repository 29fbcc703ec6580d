//! PAC script emitter
//!
//! The matching algorithm is reproduced as a fixed script template. Only
//! literals rendered on the Rust side are injected, so the output is fully
//! self-contained and identical for identical inputs.

use log::debug;
use minijinja::{context, AutoEscape, Environment, Error as JinjaError, ErrorKind, UndefinedBehavior};

use crate::engine::resolver::proxy_token;
use crate::models::{CompiledRule, CompiledRuleSet, CompiledRuleType};
use crate::settings::GlobalSettings;
use crate::utils::{js_json, js_optional_string, js_regex, js_string};

const PAC_TEMPLATE: &str = include_str!("templates/pac_script.js");

/// Render one compiled rule as a JavaScript object literal.
pub fn rule_to_js(rule: &CompiledRule) -> String {
    let regex = match &rule.regex {
        Some(regex) => js_regex(regex),
        None => String::from("null"),
    };
    let mut literal = format!(
        "{{search:{},regex:{},ruleType:{}",
        js_optional_string(rule.search.as_deref()),
        regex,
        rule.compiled_rule_type.as_number()
    );
    if rule.proxy.is_some() {
        literal.push_str(",proxy:");
        literal.push_str(&js_string(&proxy_token(rule.proxy.as_ref()).to_string()));
    }
    literal.push('}');
    literal
}

/// Render a rule list as a JavaScript array literal, one rule per line.
pub fn rules_to_js(rules: &[CompiledRule]) -> String {
    if rules.is_empty() {
        return String::from("[]");
    }
    let entries: Vec<String> = rules.iter().map(rule_to_js).collect();
    format!("[\n    {}\n]", entries.join(",\n    "))
}

/// Render the rule type table shared by the script and [`CompiledRuleType`].
fn rule_types_to_js() -> String {
    let entries: Vec<String> = CompiledRuleType::ALL
        .iter()
        .map(|rule_type| format!("{:?}: {}", rule_type, rule_type.as_number()))
        .collect();
    format!("{{\n    {}\n}}", entries.join(",\n    "))
}

/// Generate a standalone PAC script for the given settings and rules.
///
/// The script exposes `FindProxyForURL(url, host)` and makes the same
/// decisions as [`crate::engine::find_proxy_for_url`].
pub fn generate_pac_script(
    settings: &GlobalSettings,
    rule_set: &CompiledRuleSet,
) -> Result<String, JinjaError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let bypass = js_json(&settings.bypass).map_err(|e| {
        JinjaError::new(
            ErrorKind::BadSerialization,
            format!("Failed to serialize bypass list: {}", e),
        )
    })?;
    let active_proxy = proxy_token(settings.active_proxy_server.as_ref()).to_string();

    let template = env.template_from_str(PAC_TEMPLATE)?;
    let script = template.render(context! {
        proxy_mode => settings.proxy_mode.as_number(),
        compiled_rule_types => rule_types_to_js(),
        compiled_rules => rules_to_js(&rule_set.rules),
        compiled_whitelist_rules => rules_to_js(&rule_set.whitelist),
        bypass => bypass,
        has_active_proxy_server => if settings.has_active_proxy_server() { "true" } else { "false" },
        result_active_proxy => js_string(&active_proxy),
    })?;

    debug!(
        "Generated PAC script ({} bytes, {} rules, {} whitelist rules)",
        script.len(),
        rule_set.rules.len(),
        rule_set.whitelist.len()
    );
    Ok(script)
}
