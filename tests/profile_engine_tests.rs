use std::io::Write;

use smartpac::error::{CompileError, SettingsError};
use smartpac::generator::ProxyConfigMode;
use smartpac::{Profile, ProxyEngine, ProxyMode};
use tempfile::NamedTempFile;

#[cfg(test)]
mod profile_engine_tests {
    use super::*;

    const YAML_PROFILE: &str = r#"
proxyMode: SmartProxy
activeProxyServer:
  name: office
  host: 1.2.3.4
  port: 8080
  protocol: HTTP
bypass:
  enableForAlways: true
  bypassList: [localhost, Printer.LAN]
proxyRules:
  - ruleType: MatchPatternHost
    pattern: "*.example.com"
  - ruleType: RegexHost
    pattern: "(unclosed"
  - ruleType: MatchPatternUrl
    pattern: "*://*.onion/*"
    proxy:
      host: 127.0.0.1
      port: 9050
      protocol: SOCKS5
whitelistRules:
  - ruleType: MatchPatternHost
    pattern: "login.example.com"
"#;

    fn write_profile(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_engine_from_profile_file() {
        let file = write_profile(YAML_PROFILE);
        let profile = Profile::load_from_file(file.path()).unwrap();
        assert_eq!(profile.proxy_rules.len(), 3);
        assert!(profile.settings.bypass.bypasses("printer.lan"));

        let (engine, errors) = ProxyEngine::from_profile(&profile);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CompileError::InvalidRegex { .. }));

        let cases = [
            ("https://www.example.com/", "www.example.com", "PROXY 1.2.3.4:8080"),
            ("https://login.example.com/", "login.example.com", "DIRECT"),
            ("http://abc.onion/index", "abc.onion", "SOCKS5 127.0.0.1:9050"),
            ("https://other.org/", "other.org", ""),
        ];
        for (url, host, expected) in cases {
            assert_eq!(engine.find_proxy_for_url(url, host).to_string(), expected, "{}", url);
        }
    }

    #[test]
    fn test_missing_profile_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Profile::load_from_file(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(SettingsError::IoError(_))));
    }

    #[test]
    fn test_toml_and_json_profiles_agree() {
        let toml_profile = r#"
proxyMode = "Always"
proxyRules = []
whitelistRules = []

[activeProxyServer]
host = "proxy.lan"
port = 3128
protocol = "HTTP"

[bypass]
enableForAlways = true
bypassList = ["intranet.lan"]
"#;
        let json_profile = r#"{
  "proxyMode": "Always",
  "activeProxyServer": { "host": "proxy.lan", "port": 3128, "protocol": "HTTP" },
  "bypass": { "enableForAlways": true, "bypassList": ["intranet.lan"] }
}"#;

        let toml_file = write_profile(toml_profile);
        let json_file = write_profile(json_profile);
        let from_toml = Profile::load_from_file(toml_file.path()).unwrap();
        let from_json = Profile::load_from_file(json_file.path()).unwrap();
        assert_eq!(from_toml, from_json);
        assert_eq!(from_toml.settings.proxy_mode, ProxyMode::Always);

        let (engine, _) = ProxyEngine::from_profile(&from_toml);
        assert_eq!(
            engine.find_proxy_for_url("http://intranet.lan/", "intranet.lan").to_string(),
            "DIRECT"
        );
        assert_eq!(
            engine.find_proxy_for_url("http://example.com/", "example.com").to_string(),
            "PROXY proxy.lan:3128"
        );
    }

    #[test]
    fn test_pac_script_embeds_compiled_rules_in_order() {
        let profile = Profile::load_from_content(YAML_PROFILE).unwrap();
        let (engine, _) = ProxyEngine::from_profile(&profile);
        let script = engine.generate_pac_script().unwrap();

        assert!(script.contains("function FindProxyForURL(url, host)"));
        assert!(script.contains("const proxyMode = 1;"));
        assert!(script.contains("const hasActiveProxyServer = true;"));
        assert!(script.contains(r#"const resultActiveProxy = "PROXY 1.2.3.4:8080";"#));

        let example = script
            .find(r#"{search:"example.com",regex:null,ruleType:5}"#)
            .unwrap();
        let onion = script
            .find(r#"{search:"onion",regex:null,ruleType:5,proxy:"SOCKS5 127.0.0.1:9050"}"#)
            .unwrap();
        assert!(example < onion);
        assert!(script.contains(r#"{search:"login.example.com",regex:null,ruleType:5}"#));
        assert!(!script.contains("(unclosed"));
        assert!(!script.contains("{{"));
    }

    #[test]
    fn test_pac_script_is_deterministic() {
        let profile = Profile::load_from_content(YAML_PROFILE).unwrap();
        let (first, _) = ProxyEngine::from_profile(&profile);
        let (second, _) = ProxyEngine::from_profile(&profile);
        assert_eq!(
            first.generate_pac_script().unwrap(),
            second.generate_pac_script().unwrap()
        );
    }

    #[test]
    fn test_proxy_config_follows_mode() {
        let mut profile = Profile::load_from_content(YAML_PROFILE).unwrap();
        let (engine, _) = ProxyEngine::from_profile(&profile);
        let config = engine.proxy_config().unwrap();
        assert_eq!(config.mode, ProxyConfigMode::PacScript);
        assert!(config.pac_script.is_some());

        profile.settings.proxy_mode = ProxyMode::SystemProxy;
        engine.reload_profile(&profile);
        let config = engine.proxy_config().unwrap();
        assert_eq!(config.mode, ProxyConfigMode::System);
        assert!(config.pac_script.is_none());
        assert_eq!(
            engine.find_proxy_for_url("https://www.example.com/", "www.example.com").to_string(),
            "SYSTEM"
        );
    }
}
