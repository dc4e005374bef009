//! Application settings
//!
//! Defines cache location, query timeouts and the probe names used for
//! open-resolver detection.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for an audit run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the wire-format response cache
    pub cache_dir: PathBuf,
    /// Cache entry lifetime in seconds, judged by file mtime
    pub cache_ttl_secs: u64,
    /// Timeout per DNS exchange in seconds
    pub query_timeout_secs: u64,
    /// EDNS0 UDP payload size advertised on every query
    pub udp_payload: u16,
    /// Unrelated third-party name used to probe nameservers for
    /// open recursion
    pub probe_name: String,
    /// Probe name used when the audited zone equals `probe_name`
    pub probe_fallback: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("dns_cache"),
            cache_ttl_secs: 3600,
            query_timeout_secs: 5,
            udp_payload: 4096,
            probe_name: "example.org.".to_string(),
            probe_fallback: "example.net.".to_string(),
        }
    }
}

impl Settings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Probe name guaranteed to differ from the audited zone
    pub fn probe_for(&self, zone: &str) -> &str {
        if zone.eq_ignore_ascii_case(&self.probe_name) {
            &self.probe_fallback
        } else {
            &self.probe_name
        }
    }
}
