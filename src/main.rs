// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Load the source URLs (from --input and/or positional arguments)
// 3. Run the verification pass
// 4. Print the rows (table or JSON) and optionally write the export
// 5. Exit with 0 = no problems, 1 = problems found, 2 = the request failed
// =============================================================================

mod checker;
mod cli;
mod config;
mod crawl;
mod errors;
mod input;
mod report;
mod service;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use checker::ReqwestClient;
use crawl::Pipeline;
use errors::CheckError;
use report::ReportRow;
use service::CheckResponse;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so --json output on stdout stays parseable
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check(args) => handle_check(args).await,
    }
}

async fn handle_check(args: CheckArgs) -> Result<i32> {
    let config = args.config();

    let records = match &args.input {
        Some(path) => input::read_records(path).map_err(|e| report_failure(&e))?,
        None => Vec::new(),
    };
    let urls = input::source_urls(records, args.urls.clone()).map_err(|e| report_failure(&e))?;

    let client = ReqwestClient::new(&config.user_agent)
        .map_err(|e| report_failure(&CheckError::Internal(e.to_string())))?;
    let pipeline = Arc::new(Pipeline::new(Arc::new(client), config));

    eprintln!("🔍 Checking {} source page(s)...", urls.len());

    let response = service::check_sources(pipeline, urls)
        .await
        .map_err(|e| report_failure(&e))?;

    if let Some(path) = &args.output {
        std::fs::write(path, &response.export)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        eprintln!("💾 Export written to {}", path.display());
    }

    print_response(&response, args.json)?;

    Ok(if response.problem_count() > 0 { 1 } else { 0 })
}

// Attaches the HTTP-equivalent status to a request-level failure
fn report_failure(error: &CheckError) -> anyhow::Error {
    anyhow::anyhow!("{} (status {})", error, error.status_code())
}

fn print_response(response: &CheckResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        print_table(&response.results);
    }
    Ok(())
}

// Prints rows as a human-readable table in the terminal
fn print_table(rows: &[ReportRow]) {
    println!(
        "{:<40} {:<50} {:<12} {:<32} {:<30}",
        "URL", "BROKEN LINK", "STATUS", "ERROR", "REDIRECT TO"
    );
    println!("{}", "=".repeat(168));

    for row in rows {
        println!(
            "{:<40} {:<50} {:<12} {:<32} {:<30}",
            truncate(&row.url, 40),
            truncate(row.broken_link.as_deref().unwrap_or(report::ABSENT), 50),
            row.status.to_string(),
            truncate(row.error.as_deref().unwrap_or(report::ABSENT), 32),
            row.redirect_to.as_deref().unwrap_or(report::ABSENT),
        );
    }

    println!();

    let problems = rows.iter().filter(|r| r.is_problem()).count();
    let sources = {
        let mut seen: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
        seen.dedup();
        seen.len()
    };

    println!("📊 Summary:");
    println!("   📄 Sources: {}", sources);
    println!("   ✅ Clean: {}", rows.len() - problems);
    println!("   ❌ Problems: {}", problems);
}

// Shortens long values so the table keeps its columns
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}
