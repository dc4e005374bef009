//! Key-length derivation from DNSKEY wire material
//!
//! RSA public keys follow RFC 3110 (exponent length, exponent, modulus),
//! DSA public keys follow RFC 2536 (T, Q, P, G, Y). The reported key length
//! is the exact bit length of the modulus resp. prime P, so leading zero
//! octets never inflate the result.

use crate::error::{DnssecToolkitError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// RSA public key material per RFC 3110
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub exponent: Vec<u8>,
    pub modulus: Vec<u8>,
    pub bits: u32,
}

/// DSA public key material per RFC 2536
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaPublicKey {
    pub t: u8,
    pub q: Vec<u8>,
    pub p: Vec<u8>,
    pub g: Vec<u8>,
    pub y: Vec<u8>,
    pub bits: u32,
}

/// Decode base64 key material as found in DNSKEY presentation format.
/// Whitespace inside the blob is tolerated.
pub fn decode_key(material: &str) -> Result<Vec<u8>> {
    let compact: String = material.split_whitespace().collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| DnssecToolkitError::KeyMaterial(format!("not base64 readable: {}", e)))
}

/// Parse an RFC 3110 RSA public key blob.
pub fn parse_rsa(blob: &[u8]) -> Result<RsaPublicKey> {
    if blob.is_empty() {
        return Err(DnssecToolkitError::KeyMaterial("empty RSA key".to_string()));
    }

    // First octet zero means a 16-bit exponent length follows
    let (exponent_len, offset) = if blob[0] == 0 {
        if blob.len() < 3 {
            return Err(DnssecToolkitError::KeyMaterial(
                "truncated RSA exponent length".to_string(),
            ));
        }
        (usize::from(u16::from_be_bytes([blob[1], blob[2]])), 3)
    } else {
        (usize::from(blob[0]), 1)
    };

    if blob.len() <= offset + exponent_len {
        return Err(DnssecToolkitError::KeyMaterial(
            "truncated RSA key material".to_string(),
        ));
    }

    let exponent = blob[offset..offset + exponent_len].to_vec();
    let modulus = blob[offset + exponent_len..].to_vec();
    let bits = bit_len(&modulus);

    Ok(RsaPublicKey {
        exponent,
        modulus,
        bits,
    })
}

/// Parse an RFC 2536 DSA public key blob.
pub fn parse_dsa(blob: &[u8]) -> Result<DsaPublicKey> {
    if blob.is_empty() {
        return Err(DnssecToolkitError::KeyMaterial("empty DSA key".to_string()));
    }

    let t = blob[0];
    let n = 64 + 8 * usize::from(t);
    let needed = 1 + 20 + 3 * n;
    if blob.len() < needed {
        return Err(DnssecToolkitError::KeyMaterial(format!(
            "truncated DSA key material: need {} octets, got {}",
            needed,
            blob.len()
        )));
    }

    let q = blob[1..21].to_vec();
    let p = blob[21..21 + n].to_vec();
    let g = blob[21 + n..21 + 2 * n].to_vec();
    let y = blob[21 + 2 * n..21 + 3 * n].to_vec();
    let bits = bit_len(&p);

    Ok(DsaPublicKey { t, q, p, g, y, bits })
}

/// Bit length of a big-endian integer, leading zero octets excluded.
pub fn bit_len(bytes: &[u8]) -> u32 {
    match bytes.iter().position(|b| *b != 0) {
        Some(i) => {
            let significant = 8 - bytes[i].leading_zeros();
            (bytes.len() - i - 1) as u32 * 8 + significant
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 3110 encoding of (e, n) with the short exponent-length form
    fn encode_rsa(exponent: &[u8], modulus: &[u8]) -> Vec<u8> {
        let mut blob = vec![exponent.len() as u8];
        blob.extend_from_slice(exponent);
        blob.extend_from_slice(modulus);
        blob
    }

    fn modulus_of(bits: usize) -> Vec<u8> {
        let mut modulus = vec![0xabu8; bits / 8];
        modulus[0] = 0x80 | (modulus[0] >> 1);
        modulus
    }

    #[test]
    fn test_parse_rsa_2048() {
        let modulus = modulus_of(2048);
        let key = parse_rsa(&encode_rsa(&[0x01, 0x00, 0x01], &modulus)).unwrap();
        assert_eq!(key.exponent, vec![0x01, 0x00, 0x01]);
        assert_eq!(key.modulus, modulus);
        assert_eq!(key.bits, 2048);
    }

    #[test]
    fn test_parse_rsa_roundtrip_is_exact() {
        for bits in [512, 1024, 2048, 3072, 4096] {
            let modulus = modulus_of(bits);
            let key = parse_rsa(&encode_rsa(&[0x03], &modulus)).unwrap();
            assert_eq!(key.modulus, modulus);
            assert_eq!(key.bits, bits as u32);
        }
    }

    #[test]
    fn test_parse_rsa_long_exponent_form() {
        let modulus = modulus_of(1024);
        let exponent = vec![0x01, 0x00, 0x01];
        let mut blob = vec![0x00, 0x00, exponent.len() as u8];
        blob.extend_from_slice(&exponent);
        blob.extend_from_slice(&modulus);

        let key = parse_rsa(&blob).unwrap();
        assert_eq!(key.exponent, exponent);
        assert_eq!(key.bits, 1024);
    }

    #[test]
    fn test_parse_rsa_leading_zero_modulus() {
        let mut modulus = modulus_of(1024);
        modulus.insert(0, 0x00);
        let key = parse_rsa(&encode_rsa(&[0x03], &modulus)).unwrap();
        // 129 octets on the wire, 1024 significant bits
        assert_eq!(key.bits, 1024);
    }

    #[test]
    fn test_parse_rsa_truncated() {
        assert!(parse_rsa(&[]).is_err());
        assert!(parse_rsa(&[0x03, 0x01]).is_err());
        assert!(parse_rsa(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_parse_dsa() {
        // T=8 gives a 1024-bit prime P
        let t = 8u8;
        let n = 64 + 8 * usize::from(t);
        let mut blob = vec![t];
        blob.extend(vec![0x11u8; 20]); // Q
        let mut p = vec![0xc2u8; n];
        p[0] |= 0x80;
        blob.extend(&p); // P
        blob.extend(vec![0x33u8; n]); // G
        blob.extend(vec![0x44u8; n]); // Y

        let key = parse_dsa(&blob).unwrap();
        assert_eq!(key.t, 8);
        assert_eq!(key.q.len(), 20);
        assert_eq!(key.p, p);
        assert_eq!(key.bits, 1024);
    }

    #[test]
    fn test_parse_dsa_truncated() {
        assert!(parse_dsa(&[]).is_err());
        assert!(parse_dsa(&[8, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_bit_len() {
        assert_eq!(bit_len(&[]), 0);
        assert_eq!(bit_len(&[0x00]), 0);
        assert_eq!(bit_len(&[0x01]), 1);
        assert_eq!(bit_len(&[0x80]), 8);
        assert_eq!(bit_len(&[0x00, 0xff]), 8);
        assert_eq!(bit_len(&[0x01, 0x00]), 9);
    }

    #[test]
    fn test_decode_key_tolerates_whitespace() {
        let blob = decode_key("AwEA AAEC").unwrap();
        assert_eq!(blob, vec![0x03, 0x01, 0x00, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn test_decode_key_rejects_garbage() {
        assert!(decode_key("not!!base64??").is_err());
    }
}
