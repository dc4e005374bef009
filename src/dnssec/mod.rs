//! DNSSEC key classification and signature validation

pub mod classify;
pub mod keylength;
pub mod verify;

pub use classify::{classify, classify_key, classify_presentation, KeyClassification};
pub use keylength::{parse_dsa, parse_rsa};
pub use verify::{validate_section, Section, SectionVerdict};
