//! DNSSEC-Toolkit - DNSSEC deployment audit tool
//!
//! Walks the delegation chain of a target FQDN and reports, per zone:
//! authoritative nameservers and open-resolver status, NSEC3 usage,
//! per-section signature validity, and a compliance classification of
//! every DNSKEY.

use clap::Parser;
use console::style;
use dnssec_toolkit::{output, runner, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; -v / -vv raise the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.settings();
    let report = runner::run_audit(&cli.fqdn, settings).await?;

    // An empty -f value falls back to stdout
    match cli.file.as_deref().filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => output::write_json_file(&report, path)?,
        None => output::print_json(&report)?,
    }

    Ok(())
}
