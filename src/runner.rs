//! Audit orchestration
//!
//! Decomposes the target FQDN into its ancestor zones and walks them from
//! the target up to the root, stopping early when a zone turns out to be a
//! trust island.

use crate::checks::ZoneChecker;
use crate::config::Settings;
use crate::error::DnssecToolkitError;
use crate::models::AuditReport;
use crate::query::QueryClient;
use anyhow::Result;
use hickory_proto::rr::{Name, RecordType};

/// Ancestor zones of a name, most-specific first, ending at the root.
///
/// `a.b.example.com.` yields `[a.b.example.com., b.example.com.,
/// example.com., com., .]`.
pub fn ancestor_zones(target: &Name) -> Vec<Name> {
    let mut zones = Vec::with_capacity(usize::from(target.num_labels()) + 1);
    let mut zone = target.clone();
    loop {
        zones.push(zone.clone());
        if zone.is_root() {
            return zones;
        }
        zone = zone.base_name();
    }
}

/// Parse and normalize the target into canonical dot-terminated form.
pub fn parse_fqdn(fqdn: &str) -> crate::error::Result<Name> {
    let mut name = Name::from_ascii(fqdn)
        .map_err(|_| DnssecToolkitError::InvalidFqdn(fqdn.to_string()))?;
    name.set_fqdn(true);
    Ok(name)
}

/// Run a complete audit for one FQDN.
pub async fn run_audit(fqdn: &str, settings: Settings) -> Result<AuditReport> {
    let target = parse_fqdn(fqdn)?;
    let client = QueryClient::new(&settings)?;
    let checker = ZoneChecker::new(&client, &settings);

    // DNSSEC is observable iff the target carries any RRSIG
    let dnssec = !client
        .resolver_query(&target, RecordType::RRSIG)
        .await?
        .answers()
        .is_empty();

    let mut report = AuditReport {
        target: target.to_ascii(),
        dnssec,
        trust_island: false,
        trust_island_anchor_zone: None,
        zones: Vec::new(),
    };

    if !dnssec {
        tracing::info!("{} carries no RRSIG records, nothing to audit", target);
        return Ok(report);
    }

    for zone in ancestor_zones(&target) {
        tracing::info!("auditing zone {}", zone);
        let zone_report = checker.audit(&zone).await?;
        let anchored = zone_report.keys.iter().any(|key| key.trust_anchor);
        report.zones.push(zone_report);

        if anchored {
            // The chain of trust ends here
            if !zone.is_root() {
                report.trust_island = true;
                report.trust_island_anchor_zone = Some(zone.to_ascii());
            }
            break;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_zones_of_deep_name() {
        let target = parse_fqdn("a.b.example.com.").unwrap();
        let zones: Vec<String> = ancestor_zones(&target)
            .iter()
            .map(|z| z.to_ascii())
            .collect();
        assert_eq!(
            zones,
            vec![
                "a.b.example.com.",
                "b.example.com.",
                "example.com.",
                "com.",
                "."
            ]
        );
    }

    #[test]
    fn test_ancestor_zones_of_root() {
        let target = parse_fqdn(".").unwrap();
        let zones = ancestor_zones(&target);
        assert_eq!(zones.len(), 1);
        assert!(zones[0].is_root());
    }

    #[test]
    fn test_parse_fqdn_appends_missing_dot() {
        let name = parse_fqdn("example.com").unwrap();
        assert_eq!(name.to_ascii(), "example.com.");
    }

    #[test]
    fn test_parse_fqdn_rejects_garbage() {
        assert!(parse_fqdn("exa mple..com").is_err());
    }
}
