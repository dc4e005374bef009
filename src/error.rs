//! Unified error types for dnssec-toolkit

use thiserror::Error;

/// Main error type for dnssec-toolkit operations
#[derive(Error, Debug)]
pub enum DnssecToolkitError {
    #[error("DNS error: {0}")]
    Dns(String),

    #[error("no DNS server reachable for {name} {rtype}")]
    NoServerReached { name: String, rtype: String },

    #[error("invalid FQDN: {0}")]
    InvalidFqdn(String),

    #[error("malformed key material: {0}")]
    KeyMaterial(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("query timed out after {0} seconds")]
    Timeout(u64),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("file error: {0}")]
    File(String),

    #[error("{0}")]
    Other(String),
}

impl From<hickory_proto::error::ProtoError> for DnssecToolkitError {
    fn from(err: hickory_proto::error::ProtoError) -> Self {
        DnssecToolkitError::Dns(err.to_string())
    }
}

impl From<hickory_resolver::error::ResolveError> for DnssecToolkitError {
    fn from(err: hickory_resolver::error::ResolveError) -> Self {
        DnssecToolkitError::Dns(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DnssecToolkitError>;
