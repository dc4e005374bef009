//! Authoritative nameserver discovery and probing
//!
//! Every NS of the audited zone is probed with a query for an unrelated
//! third-party name. A server that answers it with recursion available is
//! an open resolver; whether the response carries an OPT record tells us
//! about EDNS0 support.

use crate::config::Settings;
use crate::error::Result;
use crate::models::NameserverReport;
use crate::query::QueryClient;
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::{IpAddr, SocketAddr};

/// Discover the authoritative NS set of a zone and probe each server.
pub async fn discover_nameservers(
    client: &QueryClient,
    zone: &Name,
    settings: &Settings,
) -> Result<Vec<NameserverReport>> {
    let message = client.resolver_query(zone, RecordType::NS).await?;
    let mut reports = Vec::new();

    for record in message.answers() {
        let Some(RData::NS(ns)) = record.data() else {
            continue;
        };
        let ns_name = &ns.0;
        let ip = client.resolve_host(ns_name).await?;
        let resolver = match ip {
            Some(addr) => probe_open_resolver(client, addr, zone, settings).await,
            None => false,
        };
        reports.push(NameserverReport {
            name: ns_name.to_ascii(),
            ip: ip.map(|a| a.to_string()),
            resolver,
        });
    }

    Ok(reports)
}

/// Probe a nameserver with an unrelated name (RD=1).
///
/// An answer plus the RA flag marks an open resolver. The probe doubles as
/// the EDNS0 check: presence of an OPT record in the response is recorded
/// at debug level.
pub async fn probe_open_resolver(
    client: &QueryClient,
    addr: IpAddr,
    zone: &Name,
    settings: &Settings,
) -> bool {
    let probe = settings.probe_for(&zone.to_ascii());
    let probe_name = match Name::from_ascii(probe) {
        Ok(name) => name,
        Err(_) => return false,
    };

    match client
        .server_query(&probe_name, RecordType::ANY, SocketAddr::new(addr, 53), true)
        .await
    {
        Ok(response) => {
            tracing::debug!(
                "nameserver {} EDNS0 support: {}",
                addr,
                response.edns().is_some()
            );
            let open = !response.answers().is_empty() && response.recursion_available();
            if open {
                tracing::warn!("nameserver {} answers recursive queries", addr);
            }
            open
        }
        // Unreachable probes are not fatal for the audit
        Err(_) => false,
    }
}
