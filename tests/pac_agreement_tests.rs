use boa_engine::{Context, Source};

use smartpac::compiler::compile;
use smartpac::generator::generate_pac_script;
use smartpac::models::{
    CompiledRule, CompiledRuleSet, CompiledRuleType, ProxyRuleType, ProxyServer,
    ProxyServerProtocol, UserRule,
};
use smartpac::settings::{BypassConfig, GlobalSettings, ProxyMode};
use smartpac::utils::js_string;
use smartpac::find_proxy_for_url;

#[cfg(test)]
mod pac_agreement_tests {
    use super::*;

    const MODES: [ProxyMode; 4] = [
        ProxyMode::Direct,
        ProxyMode::SmartProxy,
        ProxyMode::Always,
        ProxyMode::SystemProxy,
    ];

    const REQUESTS: &[(&str, &str)] = &[
        ("https://www.example.com/", "www.example.com"),
        ("https://WWW.Example.COM/", "WWW.Example.COM"),
        ("https://login.example.com/auth", "login.example.com"),
        ("https://LOGIN.example.com/auth", "LOGIN.example.com"),
        ("http://cdn7.example.com/x", "cdn7.example.com"),
        ("http://docs.example.org/guide", "docs.example.org"),
        ("http://sub.docs.example.org/guide", "sub.docs.example.org"),
        ("https://api.example.org/v1/users", "api.example.org"),
        ("https://API.example.org/V1/users", "api.example.org"),
        ("https://api.example.org/v2/users", "api.example.org"),
        ("https://shop.example.net/cart/1", "shop.example.net"),
        ("https://m.shop.example.net/cart", "m.shop.example.net"),
        ("https://files.example.net/Docs/a", "files.example.net"),
        ("https://files.example.net/docs/a", "files.example.net"),
        ("https://exact.example.net/A", "exact.example.net"),
        ("https://exact.example.net/a/b", "exact.example.net"),
        ("https://cdn.example.io/api/v2", "cdn.example.io"),
        ("https://example.io/api", "example.io"),
        ("https://example.io.evil/api", "example.io.evil"),
        ("https://cdn.example.io/web", "cdn.example.io"),
        ("http://123/", "123"),
        ("http://\u{0661}\u{0662}\u{0663}/", "\u{0661}\u{0662}\u{0663}"),
        ("http://xfoo.test/", "xfoo.test"),
        ("http://a.foo.test/", "a.foo.test"),
        ("http://\u{e9}foo.test/", "\u{e9}foo.test"),
        ("http://caf\u{e9}.word/", "caf\u{e9}.word"),
        ("http://cafe.word/", "cafe.word"),
        ("http://line.test/axb", "line.test"),
        ("http://line.test/a\rb", "line.test"),
        ("http://line.test/a\nb", "line.test"),
        ("http://line.test/a\u{2028}b", "line.test"),
        ("http://line.test/a\u{85}b", "line.test"),
        ("http://space.test/\u{a0}", "space.test"),
        ("http://space.test/\u{2003}", "space.test"),
        ("http://space.test/\u{feff}", "space.test"),
        ("http://space.test/\u{85}", "space.test"),
        ("http://space.test/\u{200b}", "space.test"),
        ("https://broken.test/", "broken.test"),
        ("http://printer.lan/", "Printer.LAN"),
        ("http://localhost:8080/", "localhost"),
        ("not a url", ""),
        ("example.io/api", "example.io"),
        ("https://other.org/", "other.org"),
    ];

    fn via(port: u16) -> ProxyServer {
        ProxyServer::new("10.0.0.1", port, ProxyServerProtocol::HTTP)
    }

    fn rule(rule_type: ProxyRuleType, pattern: &str, port: u16) -> UserRule {
        UserRule::new(rule_type, pattern).with_proxy(via(port))
    }

    /// One rule set that exercises every compiled rule type.
    fn full_rule_set() -> CompiledRuleSet {
        let rules = [
            rule(ProxyRuleType::MatchPatternHost, "cdn*.example.com", 1001),
            rule(ProxyRuleType::MatchPatternHost, "*.example.com", 1002),
            rule(ProxyRuleType::MatchPatternUrl, "*://docs.example.org/*", 1003),
            rule(ProxyRuleType::MatchPatternUrl, "*://api.example.org/v1*", 1004),
            rule(ProxyRuleType::MatchPatternHost, "shop.example.net/cart", 1005),
            rule(ProxyRuleType::MatchPatternUrl, "https://files.example.net/Docs*", 1006),
            rule(ProxyRuleType::Exact, "https://exact.example.net/a", 1007),
            rule(ProxyRuleType::MatchPatternUrl, "*://*.example.io/api*", 1008),
            rule(ProxyRuleType::RegexHost, r"^\d+$", 1009),
            rule(ProxyRuleType::RegexHost, r"\bfoo", 1010),
            rule(ProxyRuleType::RegexHost, r"^\w+\.word$", 1011),
            rule(ProxyRuleType::RegexUrl, r"^http://line\.test/a.b$", 1012),
            rule(ProxyRuleType::RegexUrl, r"^http://space\.test/\s$", 1013),
            UserRule::new(ProxyRuleType::MatchPatternHost, "broken.test")
                .with_proxy(ProxyServer::new("10.0.0.9", 0, ProxyServerProtocol::HTTP)),
            UserRule::new(ProxyRuleType::MatchPatternHost, "localhost"),
        ];
        let whitelist = [UserRule::new(ProxyRuleType::MatchPatternHost, "login.example.com")];

        let outcome = compile(&rules, &whitelist);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);

        let mut rule_set = outcome.rule_set;
        rule_set.rules.push(
            CompiledRule::with_search(CompiledRuleType::SearchDomain, "other.org")
                .proxied_by(Some(via(1014))),
        );
        rule_set
    }

    /// The full rule set followed by a rule with no search term.
    fn rule_set_with_malformed_tail() -> CompiledRuleSet {
        let mut rule_set = full_rule_set();
        rule_set.rules.insert(
            rule_set.rules.len() - 1,
            CompiledRule {
                compiled_rule_type: CompiledRuleType::SearchDomainSubdomain,
                search: None,
                regex: None,
                proxy: None,
            },
        );
        rule_set
    }

    fn settings_matrix() -> Vec<GlobalSettings> {
        let mut all = Vec::new();
        for mode in MODES {
            for active in [Some(via(3128)), None] {
                for enable_bypass in [true, false] {
                    all.push(
                        GlobalSettings::new(mode, active.clone())
                            .with_bypass(BypassConfig::new(enable_bypass, ["printer.lan", "LOCALHOST"])),
                    );
                }
            }
        }
        all
    }

    fn load_script(script: &str) -> Context {
        let mut context = Context::default();
        context.eval(Source::from_bytes(script.as_bytes())).unwrap();
        context
    }

    fn script_decision(context: &mut Context, url: &str, host: &str) -> String {
        let call = format!("FindProxyForURL({}, {})", js_string(url), js_string(host));
        let value = context.eval(Source::from_bytes(call.as_bytes())).unwrap();
        value.to_string(context).unwrap().to_std_string_escaped()
    }

    fn assert_script_agrees(settings: &GlobalSettings, rule_set: &CompiledRuleSet) {
        let script = generate_pac_script(settings, rule_set).unwrap();
        let mut context = load_script(&script);
        for (url, host) in REQUESTS {
            let expected = find_proxy_for_url(settings, rule_set, url, host).to_string();
            assert_eq!(
                script_decision(&mut context, url, host),
                expected,
                "mode {:?}, active proxy {}, bypass {}, url {:?}, host {:?}",
                settings.proxy_mode,
                settings.active_proxy_server.is_some(),
                settings.bypass.enable_for_always,
                url,
                host
            );
        }
    }

    #[test]
    fn test_rule_set_covers_every_rule_type() {
        let rule_set = full_rule_set();
        for rule_type in CompiledRuleType::ALL {
            assert!(
                rule_set.rules.iter().any(|r| r.compiled_rule_type == rule_type),
                "{:?}",
                rule_type
            );
        }
    }

    #[test]
    fn test_script_agrees_with_engine() {
        let rule_set = full_rule_set();
        for settings in settings_matrix() {
            assert_script_agrees(&settings, &rule_set);
        }
    }

    #[test]
    fn test_script_agrees_with_engine_on_malformed_rule() {
        let rule_set = rule_set_with_malformed_tail();
        for settings in settings_matrix() {
            assert_script_agrees(&settings, &rule_set);
        }
    }

    #[test]
    fn test_script_agrees_without_rules() {
        let rule_set = CompiledRuleSet::default();
        for settings in settings_matrix() {
            assert_script_agrees(&settings, &rule_set);
        }
    }

    #[test]
    fn test_script_reads_regex_classes_as_ascii() {
        let settings = GlobalSettings::new(ProxyMode::SmartProxy, Some(via(3128)));
        let rule_set = full_rule_set();
        let script = generate_pac_script(&settings, &rule_set).unwrap();
        let mut context = load_script(&script);

        let cases = [
            ("http://123/", "123", "PROXY 10.0.0.1:1009"),
            ("http://\u{0661}\u{0662}\u{0663}/", "\u{0661}\u{0662}\u{0663}", ""),
            ("http://\u{e9}foo.test/", "\u{e9}foo.test", "PROXY 10.0.0.1:1010"),
            ("http://caf\u{e9}.word/", "caf\u{e9}.word", ""),
            ("http://line.test/a\u{2028}b", "line.test", ""),
            ("http://space.test/\u{feff}", "space.test", "PROXY 10.0.0.1:1013"),
            ("http://space.test/\u{85}", "space.test", ""),
            ("https://cdn.example.io/api/v2", "cdn.example.io", "PROXY 10.0.0.1:1008"),
        ];
        for (url, host, expected) in cases {
            assert_eq!(script_decision(&mut context, url, host), expected, "{:?}", url);
            assert_eq!(
                find_proxy_for_url(&settings, &rule_set, url, host).to_string(),
                expected,
                "{:?}",
                url
            );
        }
    }
}
