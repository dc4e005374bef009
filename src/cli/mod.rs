//! Command-line interface for dnssec-toolkit

pub mod args;

pub use args::Cli;
