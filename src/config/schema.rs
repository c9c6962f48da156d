//! Configuration schema definitions.
//!
//! Field names follow the on-disk JSON shape, so `maxIdleConnsPerHost`
//! and `idleConnTimeout` are renamed rather than snake_cased away.

use serde::{Deserialize, Serialize};

/// Idle connections retained per upstream host when unset/zero.
pub const DEFAULT_MAX_IDLE_CONNS_PER_HOST: usize = 100;

/// Idle connection retention in seconds when unset/zero.
pub const DEFAULT_IDLE_CONN_TIMEOUT_SECS: u64 = 90;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    pub listen: String,

    /// Ordered upstream pattern table.
    #[serde(default)]
    pub upstreams: Vec<UpstreamConfig>,

    /// Maximum idle outbound connections kept per upstream host.
    #[serde(default, rename = "maxIdleConnsPerHost")]
    pub max_idle_conns_per_host: usize,

    /// Idle outbound connection retention in seconds.
    #[serde(default, rename = "idleConnTimeout")]
    pub idle_conn_timeout: u64,
}

/// A single `(pattern, addr)` routing entry.
///
/// `pattern` is a path prefix; `addr` is a plain-HTTP `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpstreamConfig {
    pub pattern: String,
    pub addr: String,
}

impl ProxyConfig {
    /// Replace unset/zero tuning fields with their defaults.
    pub fn normalize(&mut self) {
        if self.max_idle_conns_per_host == 0 {
            self.max_idle_conns_per_host = DEFAULT_MAX_IDLE_CONNS_PER_HOST;
        }
        if self.idle_conn_timeout == 0 {
            self.idle_conn_timeout = DEFAULT_IDLE_CONN_TIMEOUT_SECS;
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            upstreams: Vec::new(),
            max_idle_conns_per_host: DEFAULT_MAX_IDLE_CONNS_PER_HOST,
            idle_conn_timeout: DEFAULT_IDLE_CONN_TIMEOUT_SECS,
        }
    }
}
