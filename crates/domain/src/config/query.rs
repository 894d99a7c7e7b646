use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Smallest payload an EDNS0 requestor may advertise (RFC 6891 §6.2.5).
const MIN_UDP_PAYLOAD: u16 = 512;

/// Upper bound on the total query lifetime.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Query parameters handed to the query layer on every call.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct QueryConfig {
    /// Recursive resolvers, tried in order. `IP` or `IP:PORT`.
    #[serde(default = "default_resolvers")]
    pub resolvers: Vec<String>,

    #[serde(default = "default_udp_payload")]
    pub udp_payload: u16,

    /// Total lifetime of one query, across resolvers and UDP/TCP attempts.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Send the Compact Answers OK EDNS flag.
    #[serde(default)]
    pub compact_ok: bool,

    /// Only believe compact denial when the response has AD=1.
    #[serde(default = "default_true")]
    pub require_authenticated: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            resolvers: default_resolvers(),
            udp_payload: default_udp_payload(),
            timeout_secs: default_timeout_secs(),
            compact_ok: false,
            require_authenticated: true,
        }
    }
}

impl QueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolver_addrs(&self) -> Result<Vec<SocketAddr>, String> {
        self.resolvers
            .iter()
            .map(|addr| parse_server_addr(addr))
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.resolvers.is_empty() {
            return Err("No resolvers configured".to_string());
        }
        self.resolver_addrs()?;
        if self.udp_payload < MIN_UDP_PAYLOAD {
            return Err(format!(
                "UDP payload {} is below the EDNS minimum of {}",
                self.udp_payload, MIN_UDP_PAYLOAD
            ));
        }
        if self.timeout_secs == 0 {
            return Err("Query timeout cannot be 0".to_string());
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!(
                "Query timeout {}s exceeds the maximum of {}s",
                self.timeout_secs, MAX_TIMEOUT_SECS
            ));
        }
        Ok(())
    }
}

/// Parse `IP`, `IP:PORT` or `[IPv6]:PORT`; bare addresses get port 53.
pub fn parse_server_addr(s: &str) -> Result<SocketAddr, String> {
    let s = s.trim();
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
    }
    if let Some(ip) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        if let Ok(ip) = ip.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
        }
    }
    Err(format!(
        "Invalid server address '{}'. Expected IP, IP:PORT or [IPv6]:PORT",
        s
    ))
}

fn default_resolvers() -> Vec<String> {
    vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()]
}

fn default_udp_payload() -> u16 {
    1420
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}
