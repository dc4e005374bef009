//! DNSKEY algorithm and hash classification
//!
//! Maps a DNSKEY to its algorithm name, key length and a BSI TR-02102-2
//! compliance verdict for both the signing algorithm and the mandatory
//! hash. RSA and DSA key lengths are derived from the wire-format key
//! material; the modern curve algorithms have fixed sizes.

use crate::dnssec::keylength::{decode_key, parse_dsa, parse_rsa};
use crate::error::Result;
use crate::models::KeyReport;
use hickory_proto::rr::dnssec::rdata::DNSKEY;

pub const COMPLIANT: &str = "COMPLIANT";
pub const NON_COMPLIANT: &str = "NON-COMPLIANT";
/// Horizon used by the BSI catalogue for open-ended approvals
pub const OPEN_ENDED: &str = "prognosis impossible (2023+)";

/// Classification of a single DNSKEY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyClassification {
    pub alg: String,
    pub key_length: u32,
    pub a_comment: String,
    pub a_until: String,
    pub hash: String,
    pub h_comment: String,
    pub h_until: String,
}

impl KeyClassification {
    /// Fold the classification into a report entry.
    pub fn into_report(self, key_type: &str, verifiable: bool, trust_anchor: bool) -> KeyReport {
        KeyReport {
            key_type: key_type.to_string(),
            alg: self.alg,
            key_length: self.key_length,
            a_comment: self.a_comment,
            a_until: self.a_until,
            hash: self.hash,
            h_comment: self.h_comment,
            h_until: self.h_until,
            verifiable,
            trust_anchor,
        }
    }
}

/// Classify a typed DNSKEY record. Returns `None` for algorithms outside
/// the audit catalogue.
pub fn classify_key(key: &DNSKEY) -> Result<Option<KeyClassification>> {
    classify(u8::from(key.algorithm()), key.public_key())
}

/// Classify by algorithm number and raw public key material.
pub fn classify(algorithm: u8, public_key: &[u8]) -> Result<Option<KeyClassification>> {
    let classification = match algorithm {
        1 => rsa(public_key, "MD5", NON_COMPLIANT, "09.2004")?,
        3 => dsa(public_key)?,
        5 => rsa(public_key, "SHA-1", NON_COMPLIANT, "10.2015")?,
        6 => dsa(public_key)?,
        7 => rsa(public_key, "SHA-1", NON_COMPLIANT, "10.2015")?,
        8 => rsa(public_key, "SHA-256", COMPLIANT, OPEN_ENDED)?,
        // IANA assigns SHA-512 to algorithm 10
        10 => rsa(public_key, "SHA-512", COMPLIANT, OPEN_ENDED)?,
        13 => fixed("ECDSA P-256", 256, COMPLIANT, "2022", "SHA-256"),
        14 => fixed("ECDSA P-384", 384, COMPLIANT, OPEN_ENDED, "SHA-384"),
        15 => fixed("Ed25519", 256, COMPLIANT, OPEN_ENDED, "SHA-512"),
        16 => fixed("Ed448", 456, COMPLIANT, OPEN_ENDED, "SHAKE-256"),
        _ => return Ok(None),
    };
    Ok(Some(classification))
}

/// Classify from the RDATA presentation of a DNSKEY
/// (`<flags> <protocol> <algorithm> <base64 key>`).
///
/// Returns the key type ("ZSK"/"KSK") alongside the classification.
/// Records with a protocol other than 3 are skipped.
pub fn classify_presentation(rdata: &str) -> Result<Option<(String, KeyClassification)>> {
    let fields: Vec<&str> = rdata.split_whitespace().collect();
    if fields.len() < 4 || fields[1] != "3" {
        return Ok(None);
    }
    let key_type = match fields[0] {
        "256" => "ZSK",
        "257" => "KSK",
        _ => return Ok(None),
    };
    let algorithm: u8 = match fields[2].parse() {
        Ok(a) => a,
        Err(_) => return Ok(None),
    };
    let blob = decode_key(&fields[3..].join(""))?;
    Ok(classify(algorithm, &blob)?.map(|c| (key_type.to_string(), c)))
}

fn rsa(public_key: &[u8], hash: &str, h_comment: &str, h_until: &str) -> Result<KeyClassification> {
    let key = parse_rsa(public_key)?;
    let (a_comment, a_until) = strength_verdict(key.bits);
    Ok(KeyClassification {
        alg: "RSA".to_string(),
        key_length: key.bits,
        a_comment,
        a_until,
        hash: hash.to_string(),
        h_comment: h_comment.to_string(),
        h_until: h_until.to_string(),
    })
}

fn dsa(public_key: &[u8]) -> Result<KeyClassification> {
    let key = parse_dsa(public_key)?;
    let (a_comment, a_until) = strength_verdict(key.bits);
    Ok(KeyClassification {
        alg: "DSA".to_string(),
        key_length: key.bits,
        a_comment,
        a_until,
        hash: "SHA-1".to_string(),
        h_comment: NON_COMPLIANT.to_string(),
        h_until: "10.2015".to_string(),
    })
}

fn fixed(alg: &str, key_length: u32, a_comment: &str, a_until: &str, hash: &str) -> KeyClassification {
    KeyClassification {
        alg: alg.to_string(),
        key_length,
        a_comment: a_comment.to_string(),
        a_until: a_until.to_string(),
        hash: hash.to_string(),
        h_comment: COMPLIANT.to_string(),
        h_until: OPEN_ENDED.to_string(),
    }
}

/// BSI TR-02102-2 verdict for RSA/DSA moduli
fn strength_verdict(bits: u32) -> (String, String) {
    if (2048..3072).contains(&bits) {
        (COMPLIANT.to_string(), "2022".to_string())
    } else if bits >= 3072 {
        (COMPLIANT.to_string(), OPEN_ENDED.to_string())
    } else {
        (NON_COMPLIANT.to_string(), String::new())
    }
}
