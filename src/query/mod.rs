//! DNSSEC query layer
//!
//! Two primitives drive the whole audit: `resolver_query` goes through the
//! host's configured recursive resolver with the DO bit set, while
//! `authoritative_query` asks a zone's own nameservers with recursion
//! cleared. Both are backed by the on-disk response cache.

pub mod cache;
pub mod transport;

use crate::config::Settings;
use crate::error::{DnssecToolkitError, Result};
use cache::ResponseCache;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Query client bundling resolver addresses, cache and timeouts
#[derive(Debug)]
pub struct QueryClient {
    resolvers: Vec<SocketAddr>,
    cache: ResponseCache,
    timeout: Duration,
    udp_payload: u16,
}

impl QueryClient {
    /// Create a client using the nameservers from the host resolver
    /// configuration (`/etc/resolv.conf`).
    pub fn new(settings: &Settings) -> Result<Self> {
        let (config, _opts) = hickory_resolver::system_conf::read_system_conf()?;
        // One entry per (address, protocol) comes back; keep unique addresses
        let mut resolvers: Vec<SocketAddr> = Vec::new();
        for ns in config.name_servers() {
            if !resolvers.contains(&ns.socket_addr) {
                resolvers.push(ns.socket_addr);
            }
        }
        Self::with_resolvers(resolvers, settings)
    }

    /// Create a client with an explicit resolver list.
    pub fn with_resolvers(resolvers: Vec<SocketAddr>, settings: &Settings) -> Result<Self> {
        if resolvers.is_empty() {
            return Err(DnssecToolkitError::NoServerReached {
                name: "<resolver configuration>".to_string(),
                rtype: "-".to_string(),
            });
        }
        Ok(Self {
            resolvers,
            cache: ResponseCache::open(&settings.cache_dir, settings.cache_ttl())?,
            timeout: settings.query_timeout(),
            udp_payload: settings.udp_payload,
        })
    }

    /// Query through the system resolver (RD=1, DO=1).
    pub async fn resolver_query(&self, name: &Name, rtype: RecordType) -> Result<Message> {
        self.query_servers(name, rtype, &self.resolvers, true).await
    }

    /// Query an authoritative nameserver of the zone containing `name`
    /// (RD=0, DO=1).
    pub async fn authoritative_query(&self, name: &Name, rtype: RecordType) -> Result<Message> {
        let servers = self.authoritative_servers(name).await?;
        self.query_servers(name, rtype, &servers, false).await
    }

    /// Direct probe of a single server. Used by the nameserver checks;
    /// failures are for the caller to interpret.
    pub async fn server_query(
        &self,
        name: &Name,
        rtype: RecordType,
        server: SocketAddr,
        recursion_desired: bool,
    ) -> Result<Message> {
        self.query_servers(name, rtype, &[server], recursion_desired)
            .await
    }

    /// Resolve a hostname to its first IPv4 address via the resolver.
    pub async fn resolve_host(&self, host: &Name) -> Result<Option<IpAddr>> {
        let message = self.resolver_query(host, RecordType::A).await?;
        Ok(message.answers().iter().find_map(|record| match record.data() {
            Some(RData::A(a)) => Some(IpAddr::V4(a.0)),
            _ => None,
        }))
    }

    /// Nameserver addresses for the zone containing `name`.
    ///
    /// The NS set is looked up through the resolver, walking up one label
    /// at a time so that non-apex names land on their enclosing zone.
    async fn authoritative_servers(&self, name: &Name) -> Result<Vec<SocketAddr>> {
        let mut zone = name.clone();
        loop {
            let message = self.resolver_query(&zone, RecordType::NS).await?;
            let mut servers = Vec::new();
            for record in message.answers() {
                let Some(RData::NS(ns)) = record.data() else {
                    continue;
                };
                if let Some(ip) = self.resolve_host(&ns.0).await? {
                    servers.push(SocketAddr::new(ip, 53));
                }
            }
            if !servers.is_empty() {
                return Ok(servers);
            }
            if zone.is_root() {
                return Err(DnssecToolkitError::NoServerReached {
                    name: name.to_ascii(),
                    rtype: "NS".to_string(),
                });
            }
            zone = zone.base_name();
        }
    }

    /// Try each server in turn; the first response wins. Responses other
    /// than NOERROR collapse to an empty message because the audit treats
    /// "missing" differently from "failure to reach".
    async fn query_servers(
        &self,
        name: &Name,
        rtype: RecordType,
        servers: &[SocketAddr],
        recursion_desired: bool,
    ) -> Result<Message> {
        for server in servers {
            if let Some(cached) = self.cache.fetch(name, rtype, server.ip()) {
                tracing::debug!("cache hit for {} {} @{}", name, rtype, server.ip());
                return Ok(normalize(cached));
            }

            let query = transport::build_query(name, rtype, recursion_desired, self.udp_payload);
            match transport::exchange(*server, &query, self.timeout).await {
                Ok((response, wire)) => {
                    self.cache.store(name, rtype, server.ip(), &wire);
                    return Ok(normalize(response));
                }
                Err(e) => {
                    tracing::debug!("{} {} @{} failed: {}", name, rtype, server, e);
                }
            }
        }
        Err(DnssecToolkitError::NoServerReached {
            name: name.to_ascii(),
            rtype: rtype.to_string(),
        })
    }
}

/// NXDOMAIN, REFUSED and friends become an empty message, not an error.
fn normalize(message: Message) -> Message {
    if message.response_code() == ResponseCode::NoError {
        message
    } else {
        Message::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::MessageType;

    #[test]
    fn test_empty_resolver_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            cache_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let err = QueryClient::with_resolvers(vec![], &settings).unwrap_err();
        assert!(matches!(err, DnssecToolkitError::NoServerReached { .. }));
    }

    #[test]
    fn test_normalize_keeps_noerror() {
        let mut message = Message::new();
        message
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::NoError)
            .set_recursion_available(true);
        assert!(normalize(message).recursion_available());
    }

    #[test]
    fn test_normalize_clears_nxdomain() {
        let mut message = Message::new();
        message
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::NXDomain)
            .set_recursion_available(true);
        let normalized = normalize(message);
        assert!(normalized.answers().is_empty());
        assert!(!normalized.recursion_available());
    }
}
