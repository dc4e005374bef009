//! Audit report document
//!
//! The JSON shape of these structs is consumed by downstream tooling, so
//! field names and ordering are part of the external interface.

use serde::{Deserialize, Serialize};

/// Top-level record for one audit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Requested FQDN
    pub target: String,
    /// Whether any RRSIG records were observable for the target
    pub dnssec: bool,
    /// True iff the chain terminated at a non-root zone because no parent
    /// DS could be obtained
    pub trust_island: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_island_anchor_zone: Option<String>,
    /// Audited zones, most-specific first
    pub zones: Vec<ZoneReport>,
}

/// Audit of one zone on the chain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReport {
    /// Zone name, dot-terminated; the root is "."
    pub fqdn: String,
    pub validation: bool,
    pub validates_answer: bool,
    pub validates_ns: bool,
    pub validates_extra: bool,
    #[serde(default)]
    pub validation_error_answer: String,
    #[serde(default)]
    pub validation_error_ns: String,
    #[serde(default)]
    pub validation_error_extra: String,
    pub nsec3: bool,
    #[serde(rename = "nsec3iter")]
    pub nsec3_iter: u16,
    pub key_count: usize,
    pub keys: Vec<KeyReport>,
    #[serde(rename = "authoritativeNS")]
    pub authoritative_ns: Vec<NameserverReport>,
}

/// Audit of one DNSKEY
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyReport {
    /// "ZSK" (flags=256) or "KSK" (flags=257)
    #[serde(rename = "type")]
    pub key_type: String,
    pub alg: String,
    pub key_length: u32,
    pub a_comment: String,
    pub a_until: String,
    pub hash: String,
    pub h_comment: String,
    pub h_until: String,
    /// ZSK: the signature over the zone's DNSKEY RRset checks out.
    /// KSK: the digest matches a DS in the parent zone.
    pub verifiable: bool,
    /// KSK for which no parent DS was obtainable
    pub trust_anchor: bool,
}

/// One authoritative nameserver of a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameserverReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Whether the server answered a recursion-requiring query for an
    /// unrelated name
    pub resolver: bool,
}

impl ZoneReport {
    /// A fresh report for a zone, all verdicts pending
    pub fn new(fqdn: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            ..Default::default()
        }
    }
}
