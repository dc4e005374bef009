//! Per-section RRSIG validation
//!
//! Every RRSIG found in a response section is checked for temporal validity
//! and then cryptographically verified against the DNSKEY it names.
//! Signatures over the DNSKEY RRset itself are excluded here; they are the
//! subject of the ZSK verifiability check.

use crate::error::Result;
use crate::query::QueryClient;
use chrono::Utc;
use hickory_proto::rr::dnssec::rdata::{DNSSECRData, DNSKEY, RRSIG, SIG};
use hickory_proto::rr::dnssec::Verifier;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};

/// Response section under validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Answer,
    Ns,
    Extra,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Answer => "Answer",
            Section::Ns => "Ns",
            Section::Extra => "Extra",
        }
    }
}

/// Verdict for one section; `error` is empty on success
#[derive(Debug, Clone)]
pub struct SectionVerdict {
    pub valid: bool,
    pub error: String,
}

impl SectionVerdict {
    fn pass() -> Self {
        Self {
            valid: true,
            error: String::new(),
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: error.into(),
        }
    }
}

/// View a record as an RRSIG
pub fn as_rrsig(record: &Record) -> Option<&RRSIG> {
    match record.data() {
        Some(RData::DNSSEC(DNSSECRData::RRSIG(sig))) => Some(sig),
        _ => None,
    }
}

/// View a record as a DNSKEY
pub fn as_dnskey(record: &Record) -> Option<&DNSKEY> {
    match record.data() {
        Some(RData::DNSSEC(DNSSECRData::DNSKEY(key))) => Some(key),
        _ => None,
    }
}

/// Validate every RRSIG in one response section.
///
/// The first failure decides the verdict. RRSIGs covering DNSKEY are
/// skipped so the section pass does not loop on the keys it is verifying.
pub async fn validate_section(
    client: &QueryClient,
    records: &[Record],
    section: Section,
) -> Result<SectionVerdict> {
    let now = Utc::now().timestamp();

    for record in records {
        let Some(sig) = as_rrsig(record) else {
            continue;
        };
        if sig.type_covered() == RecordType::DNSKEY {
            continue;
        }

        if !validity_period(sig, now) {
            tracing::warn!(
                "{} section of {}: RRSIG over {} outside validity window",
                section.label(),
                record.name(),
                sig.type_covered()
            );
            return Ok(SectionVerdict::fail("The validity period expired"));
        }

        let key = match find_dnskey(client, sig.signer_name(), sig.key_tag()).await? {
            Some(key) => key,
            None => {
                return Ok(SectionVerdict::fail(format!(
                    "no DNSKEY with key tag {} found for signer {}",
                    sig.key_tag(),
                    sig.signer_name()
                )));
            }
        };

        let covered = covered_rrset(client, record.name(), sig.type_covered(), section, records)
            .await?;
        if covered.is_empty() {
            // Delegation points need not carry the covered RRset in-band
            if section == Section::Ns {
                continue;
            }
            return Ok(SectionVerdict::fail(format!(
                "no records covered by the RRSIG over {} for {}",
                sig.type_covered(),
                record.name()
            )));
        }

        if let Err(e) = key.verify_rrsig(record.name(), DNSClass::IN, sig, &covered) {
            return Ok(SectionVerdict::fail(format!(
                "cannot validate the signature cryptographically: {}",
                e
            )));
        }
    }

    Ok(SectionVerdict::pass())
}

/// RFC 1982 serial-arithmetic check of the RRSIG validity window.
pub fn validity_period(sig: &SIG, now: i64) -> bool {
    const YEAR68: i64 = 1 << 31;
    let inception = i64::from(sig.sig_inception());
    let expiration = i64::from(sig.sig_expiration());
    let ti = inception + (inception - now) / YEAR68 * YEAR68;
    let te = expiration + (expiration - now) / YEAR68 * YEAR68;
    ti <= now && now <= te
}

/// Locate the DNSKEY named by an RRSIG via (signer name, key tag).
pub async fn find_dnskey(
    client: &QueryClient,
    signer: &Name,
    key_tag: u16,
) -> Result<Option<DNSKEY>> {
    let message = client.resolver_query(signer, RecordType::DNSKEY).await?;
    Ok(find_key_in(message.answers(), key_tag)?.cloned())
}

/// Find the DNSKEY with the given key tag among already-fetched records.
pub fn find_key_in(records: &[Record], key_tag: u16) -> Result<Option<&DNSKEY>> {
    for record in records {
        let Some(key) = as_dnskey(record) else {
            continue;
        };
        if key.calculate_key_tag()? == key_tag {
            return Ok(Some(key));
        }
    }
    Ok(None)
}

/// Collect the RRset covered by an RRSIG.
///
/// For the Extra section the covered records come from the same response so
/// that TTLs match; Answer and Ns re-query an authoritative nameserver.
async fn covered_rrset(
    client: &QueryClient,
    owner: &Name,
    covered: RecordType,
    section: Section,
    same_response: &[Record],
) -> Result<Vec<Record>> {
    let filter = |records: &[Record]| -> Vec<Record> {
        records
            .iter()
            .filter(|r| r.record_type() == covered && r.name() == owner)
            .cloned()
            .collect()
    };

    match section {
        Section::Extra => Ok(filter(same_response)),
        Section::Answer => {
            let message = client.authoritative_query(owner, covered).await?;
            Ok(filter(message.answers()))
        }
        Section::Ns => {
            let message = client.authoritative_query(owner, covered).await?;
            Ok(filter(message.name_servers()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::dnssec::Algorithm;

    fn sig_with_window(inception: u32, expiration: u32) -> SIG {
        SIG::new(
            RecordType::A,
            Algorithm::RSASHA256,
            2,
            3600,
            expiration,
            inception,
            12345,
            Name::from_ascii("example.com.").unwrap(),
            vec![0u8; 256],
        )
    }

    #[test]
    fn test_validity_period_inside_window() {
        let now = 1_700_000_000i64;
        let sig = sig_with_window(1_690_000_000, 1_710_000_000);
        assert!(validity_period(&sig, now));
    }

    #[test]
    fn test_validity_period_expired() {
        let now = 1_700_000_000i64;
        let sig = sig_with_window(1_600_000_000, 1_650_000_000);
        assert!(!validity_period(&sig, now));
    }

    #[test]
    fn test_validity_period_not_yet_valid() {
        let now = 1_700_000_000i64;
        let sig = sig_with_window(1_710_000_000, 1_720_000_000);
        assert!(!validity_period(&sig, now));
    }

    #[test]
    fn test_validity_period_window_edges_inclusive() {
        let sig = sig_with_window(1_690_000_000, 1_710_000_000);
        assert!(validity_period(&sig, 1_690_000_000));
        assert!(validity_period(&sig, 1_710_000_000));
        assert!(!validity_period(&sig, 1_710_000_001));
    }

    #[test]
    fn test_section_labels() {
        assert_eq!(Section::Answer.label(), "Answer");
        assert_eq!(Section::Ns.label(), "Ns");
        assert_eq!(Section::Extra.label(), "Extra");
    }
}
