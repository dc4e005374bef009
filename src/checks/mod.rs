//! Check modules for dnssec-toolkit
//!
//! This module contains the per-zone audit steps.

pub mod keys;
pub mod nameserver;
pub mod zone;

pub use zone::ZoneChecker;
