//! Proxy model definitions
//!
//! Contains the upstream proxy server description consumed by the matcher
//! and the PAC generator.

use serde::{Deserialize, Serialize};

/// Represents the protocol spoken by an upstream proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProxyServerProtocol {
    HTTP,
    HTTPS,
    SOCKS4,
    SOCKS5,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ProxyServerProtocol {
    /// PAC directive keyword for this protocol.
    pub fn pac_scheme(self) -> Option<&'static str> {
        match self {
            ProxyServerProtocol::HTTP => Some("PROXY"),
            ProxyServerProtocol::HTTPS => Some("HTTPS"),
            ProxyServerProtocol::SOCKS4 => Some("SOCKS4"),
            ProxyServerProtocol::SOCKS5 => Some("SOCKS5"),
            ProxyServerProtocol::Unknown => None,
        }
    }
}

/// Represents an upstream proxy server.
///
/// A server with an empty host, a zero port or an unknown protocol is
/// invalid and always resolves to a direct connection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyServer {
    pub name: Option<String>,
    pub host: String,
    pub port: u16,
    pub protocol: ProxyServerProtocol,
}

impl ProxyServer {
    pub fn new(host: &str, port: u16, protocol: ProxyServerProtocol) -> Self {
        ProxyServer {
            name: None,
            host: host.to_string(),
            port,
            protocol,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.host.trim().is_empty()
            && self.port != 0
            && self.protocol != ProxyServerProtocol::Unknown
    }
}
