//! DNSSEC-Toolkit Library
//!
//! A DNSSEC deployment audit tool providing:
//! - Delegation chain discovery from a target FQDN up to the root or the
//!   nearest trust island
//! - Per-zone RRSIG validation across Answer/Authority/Additional sections
//! - DNSKEY classification (algorithm, hash, key length, BSI TR-02102-2
//!   compliance) and ZSK/KSK verifiability
//! - Authoritative nameserver discovery with open-resolver detection
//! - JSON report generation
//!
//! # Usage
//!
//! ```rust,ignore
//! use dnssec_toolkit::{runner, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let report = runner::run_audit("example.com.", Settings::default())
//!         .await
//!         .unwrap();
//!     println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod dnssec;
pub mod error;
pub mod models;
pub mod output;
pub mod query;
pub mod runner;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use error::{DnssecToolkitError, Result};
pub use models::{AuditReport, KeyReport, NameserverReport, ZoneReport};
