//! CLI argument definitions using Clap derive macros

use crate::config::Settings;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// DNSSEC deployment audit tool
///
/// Walks the chain of delegated zones from the target FQDN up to the DNS
/// root (or the nearest trust island), validating signatures and grading
/// every DNSKEY on the way. Results are emitted as a single JSON document.
#[derive(Parser, Debug)]
#[command(name = "dnssec-toolkit")]
#[command(version)]
#[command(about = "DNSSEC deployment audit tool with JSON reporting")]
#[command(long_about = None)]
pub struct Cli {
    /// Fully qualified domain name to audit (e.g. example.com.)
    #[arg(long)]
    pub fqdn: String,

    /// Output file; when absent the report is written to standard output
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// -v shows warnings, -vv shows warnings and info
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Cache directory; created if absent and swept of stale entries at start
    #[arg(long, default_value = "dns_cache")]
    pub cache: PathBuf,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default tracing filter derived from the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "warn",
            _ => "info",
        }
    }

    /// Build runtime settings from the parsed arguments
    pub fn settings(&self) -> Settings {
        Settings {
            cache_dir: self.cache.clone(),
            ..Settings::default()
        }
    }
}
