#![deny(
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `namefind` - Concurrent filename search, one worker per target name.

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use clap_cargo::style::CLAP_STYLING;
use namefind::coordinator;
use namefind::reporter::Reporter;
use namefind::types::{MAX_TARGETS, SearchRequest};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "NAMEFIND_LOG";

/// CLI arguments for `namefind`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    /// Search subdirectories too
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Compare filenames ignoring ASCII case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Log more about each worker (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Directory to search in
    root: PathBuf,

    /// Filenames to search for, one worker each
    #[arg(required = true, num_args = 1..=MAX_TARGETS)]
    filenames: Vec<String>,
}

/// Send log records to stderr, away from the match stream
fn setup_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "namefind=warn",
            1 => "namefind=debug",
            _ => "namefind=trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let request =
        match SearchRequest::new(cli.root, cli.filenames, cli.recursive, cli.ignore_case) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            },
        };
    debug!(?request, "starting search");

    let summary = coordinator::run(&request, &Reporter::stdio());
    std::process::exit(summary.exit_code());
}
