// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the derive API: the CLI structure is described by the structs and
// enums below and clap generates the parsing, --help and --version.
// =============================================================================

use crate::config::CheckerConfig;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-sentinel",
    version,
    about = "Checks every outbound link on a list of pages for broken links and redirects",
    long_about = "link-sentinel fetches each source page, extracts its absolute outbound links \
                  and probes every one of them. It reports, per source page, each link that is \
                  broken, unreachable or redirecting."
)]
pub struct Cli {
    /// Increase log output (-v = info, -vv = debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the links on one or more source pages
    ///
    /// Example: link-sentinel check https://example.com --input sources.json
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Source page URLs, checked after any URLs from --input
    pub urls: Vec<String>,

    /// JSON file holding an array of records with a "URL" field
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Print the full response as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Write the tab-separated export to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Seconds to wait for a source page
    #[arg(long, default_value_t = 10)]
    pub fetch_timeout: u64,

    /// Seconds to wait for a link probe
    #[arg(long, default_value_t = 5)]
    pub probe_timeout: u64,

    /// Maximum requests in flight at once
    #[arg(long, default_value_t = 50)]
    pub concurrency: usize,

    /// Probe each distinct link once, even if several pages contain it
    #[arg(long)]
    pub dedupe: bool,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl CheckArgs {
    pub fn config(&self) -> CheckerConfig {
        let config = CheckerConfig::default()
            .with_fetch_timeout(self.fetch_timeout)
            .with_probe_timeout(self.probe_timeout)
            .with_concurrency(self.concurrency)
            .with_dedupe(self.dedupe);

        match &self.user_agent {
            Some(user_agent) => config.with_user_agent(user_agent.clone()),
            None => config,
        }
    }
}
