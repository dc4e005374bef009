//! Data models for dnssec-toolkit
//!
//! This module contains the report document emitted at the end of an audit.

pub mod report;

pub use report::{AuditReport, KeyReport, NameserverReport, ZoneReport};
