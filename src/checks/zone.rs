//! Per-zone audit
//!
//! Runs the complete battery for a single zone on the chain: nameserver
//! discovery and probing, NSEC3 detection, per-section signature
//! validation of an authoritative ANY response, and the DNSKEY audit.

use crate::checks::{keys, nameserver};
use crate::config::Settings;
use crate::dnssec::verify::{validate_section, Section};
use crate::error::Result;
use crate::models::ZoneReport;
use crate::query::QueryClient;
use hickory_proto::rr::dnssec::rdata::DNSSECRData;
use hickory_proto::rr::{Name, RData, RecordType};

/// Auditor for a single zone
pub struct ZoneChecker<'a> {
    client: &'a QueryClient,
    settings: &'a Settings,
}

impl<'a> ZoneChecker<'a> {
    pub fn new(client: &'a QueryClient, settings: &'a Settings) -> Self {
        Self { client, settings }
    }

    /// Audit one zone and return its report.
    pub async fn audit(&self, zone: &Name) -> Result<ZoneReport> {
        let mut report = ZoneReport::new(zone.to_ascii());

        report.authoritative_ns =
            nameserver::discover_nameservers(self.client, zone, self.settings).await?;

        let (nsec3, nsec3_iter) = self.check_nsec3(zone).await?;
        report.nsec3 = nsec3;
        report.nsec3_iter = nsec3_iter;

        let any_message = self
            .client
            .authoritative_query(zone, RecordType::ANY)
            .await?;
        let answer = validate_section(self.client, any_message.answers(), Section::Answer).await?;
        let ns = validate_section(self.client, any_message.name_servers(), Section::Ns).await?;
        let extra = validate_section(self.client, any_message.additionals(), Section::Extra).await?;

        report.validates_answer = answer.valid;
        report.validates_ns = ns.valid;
        report.validates_extra = extra.valid;
        report.validation = answer.valid && ns.valid && extra.valid;
        report.validation_error_answer = answer.error;
        report.validation_error_ns = ns.error;
        report.validation_error_extra = extra.error;

        let key_audit = keys::audit_keys(self.client, zone).await?;
        report.key_count = key_audit.keys.len();
        report.keys = key_audit.keys;

        Ok(report)
    }

    /// RFC 5155 §3: an NSEC3PARAM with a zero Flags field at the apex
    /// announces NSEC3 authenticated denial.
    async fn check_nsec3(&self, zone: &Name) -> Result<(bool, u16)> {
        let message = self
            .client
            .resolver_query(zone, RecordType::NSEC3PARAM)
            .await?;
        for record in message.answers() {
            let Some(RData::DNSSEC(DNSSECRData::NSEC3PARAM(param))) = record.data() else {
                continue;
            };
            if param.flags() == 0 {
                return Ok((true, param.iterations()));
            }
        }
        Ok((false, 0))
    }
}
