//! DNSKEY audit: ZSK and KSK verifiability
//!
//! ZSKs are verifiable when the RRSIGs over the zone's own DNSKEY RRset
//! check out; the flag is zone-wide. KSKs are verifiable when their digest
//! matches a DS record in the parent zone. A KSK without any obtainable DS
//! is a trust anchor.

use crate::dnssec::classify::classify_key;
use crate::dnssec::verify::{as_dnskey, as_rrsig, find_key_in, validity_period};
use crate::error::Result;
use crate::models::KeyReport;
use crate::query::QueryClient;
use chrono::Utc;
use hickory_proto::rr::dnssec::rdata::{DNSSECRData, DNSKEY, DS};
use hickory_proto::rr::dnssec::{DigestType, Verifier};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384};

/// Outcome of the key audit for one zone
#[derive(Debug, Default)]
pub struct KeyAudit {
    /// ZSKs first, then KSKs, each in DNSKEY query order
    pub keys: Vec<KeyReport>,
    /// Set when at least one KSK had no obtainable parent DS
    pub trust_anchor: bool,
}

/// Audit every DNSKEY of a zone.
pub async fn audit_keys(client: &QueryClient, zone: &Name) -> Result<KeyAudit> {
    let zsk_verifiable = check_zsk_verifiability(client, zone).await?;

    let dnskey_message = client.resolver_query(zone, RecordType::DNSKEY).await?;
    let mut zsks = Vec::new();
    let mut ksks = Vec::new();
    for record in dnskey_message.answers() {
        let Some(key) = as_dnskey(record) else {
            continue;
        };
        if !key.zone_key() {
            continue;
        }
        if key.secure_entry_point() {
            ksks.push(key);
        } else {
            zsks.push(key);
        }
    }

    let ds_set: Vec<DS> = client
        .resolver_query(zone, RecordType::DS)
        .await?
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::DNSSEC(DNSSECRData::DS(ds))) => Some(ds.clone()),
            _ => None,
        })
        .collect();

    let mut audit = KeyAudit::default();

    for key in zsks {
        let Some(class) = classify_key(key)? else {
            continue;
        };
        audit
            .keys
            .push(class.into_report("ZSK", zsk_verifiable, false));
    }

    for key in ksks {
        let Some(class) = classify_key(key)? else {
            continue;
        };
        let (verifiable, trust_anchor) = if ds_set.is_empty() {
            // We left the signed tree: no DS is obtainable from the parent
            (false, true)
        } else {
            (check_ksk_against_ds(zone, key, &ds_set)?, false)
        };
        audit.trust_anchor |= trust_anchor;
        audit
            .keys
            .push(class.into_report("KSK", verifiable, trust_anchor));
    }

    Ok(audit)
}

/// Verify the RRSIGs covering the zone's DNSKEY RRset against the keys in
/// the zone's own answer. Any failure marks every ZSK of the zone.
async fn check_zsk_verifiability(client: &QueryClient, zone: &Name) -> Result<bool> {
    let sig_message = client.authoritative_query(zone, RecordType::RRSIG).await?;
    let dnskey_message = client.resolver_query(zone, RecordType::DNSKEY).await?;
    let dnskey_records: Vec<Record> = dnskey_message
        .answers()
        .iter()
        .filter(|record| record.record_type() == RecordType::DNSKEY)
        .cloned()
        .collect();

    let now = Utc::now().timestamp();
    let mut verifiable = true;

    for record in sig_message.answers() {
        let Some(sig) = as_rrsig(record) else {
            continue;
        };
        if sig.type_covered() != RecordType::DNSKEY {
            continue;
        }

        if !validity_period(sig, now) {
            tracing::warn!("{}: RRSIG over DNSKEY outside validity window", zone);
            verifiable = false;
            continue;
        }

        let Some(key) = find_key_in(&dnskey_records, sig.key_tag())? else {
            tracing::warn!(
                "{}: no DNSKEY with key tag {} in the zone's answer",
                zone,
                sig.key_tag()
            );
            verifiable = false;
            continue;
        };

        if let Err(e) = key.verify_rrsig(record.name(), DNSClass::IN, sig, &dnskey_records) {
            tracing::warn!("{}: DNSKEY RRset signature does not verify: {}", zone, e);
            verifiable = false;
        }
    }

    Ok(verifiable)
}

/// Compare a KSK against the DS set from the parent zone.
fn check_ksk_against_ds(zone: &Name, key: &DNSKEY, ds_set: &[DS]) -> Result<bool> {
    let key_tag = key.calculate_key_tag()?;
    for ds in ds_set {
        if ds.key_tag() != key_tag {
            continue;
        }
        let Some(digest) = ds_digest(zone, key, ds.digest_type()) else {
            tracing::warn!("{}: DS with unsupported digest type", zone);
            continue;
        };
        if digest == ds.digest() {
            return Ok(true);
        }
        tracing::warn!(
            "{}: DS does not match (key tag {}, computed {}, parent has {})",
            zone,
            key_tag,
            hex::encode(&digest),
            hex::encode(ds.digest())
        );
        return Ok(false);
    }
    tracing::warn!("{}: DS does not match (no DS with key tag {})", zone, key_tag);
    Ok(false)
}

/// DS digest per RFC 4034 §5.1.4: hash over the canonical owner name
/// followed by the DNSKEY RDATA.
fn ds_digest(zone: &Name, key: &DNSKEY, digest_type: DigestType) -> Option<Vec<u8>> {
    let mut input = canonical_name(zone);
    input.extend(dnskey_rdata(key));

    match digest_type {
        DigestType::SHA1 => Some(Sha1::digest(&input).to_vec()),
        DigestType::SHA256 => Some(Sha256::digest(&input).to_vec()),
        DigestType::SHA384 => Some(Sha384::digest(&input).to_vec()),
        _ => None,
    }
}

/// Canonical (lowercase, uncompressed) wire form of a name
fn canonical_name(name: &Name) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + 1);
    for label in name.iter() {
        out.push(label.len() as u8);
        out.extend(label.iter().map(u8::to_ascii_lowercase));
    }
    out.push(0);
    out
}

/// DNSKEY RDATA in wire form: flags, protocol, algorithm, public key
fn dnskey_rdata(key: &DNSKEY) -> Vec<u8> {
    let mut flags: u16 = 0;
    if key.zone_key() {
        flags |= 0b0000_0001_0000_0000;
    }
    if key.secure_entry_point() {
        flags |= 0b0000_0000_0000_0001;
    }
    if key.revoke() {
        flags |= 0b0000_0000_1000_0000;
    }

    let mut out = Vec::with_capacity(4 + key.public_key().len());
    out.extend(flags.to_be_bytes());
    out.push(3); // protocol is always 3
    out.push(u8::from(key.algorithm()));
    out.extend(key.public_key());
    out
}
