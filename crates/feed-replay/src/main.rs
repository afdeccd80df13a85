//! Event feed replay tool.
//!
//! Feeds a JSONL file of raw events through a feed and prints the records a
//! UI would show, one JSON object per line.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use feed_core::{EventFeed, FeedConfig};
use feed_replay::{read_raw_events, replay, write_records, ReplayError, ReplayOptions};

/// Command line arguments for the replay tool
#[derive(Parser, Debug)]
#[command(name = "event_feed")]
#[command(about = "Replay raw events through a bounded event feed")]
struct Args {
    /// JSONL file of raw events
    #[arg(long)]
    events: PathBuf,

    /// TOML feed configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Week assigned to events that carry none
    #[arg(long, allow_negative_numbers = true)]
    default_week: Option<i64>,

    /// Week to evaluate visibility at
    #[arg(long, allow_negative_numbers = true)]
    current_week: Option<i64>,

    /// Weeks an option-less event stays visible
    #[arg(long)]
    max_age: Option<i64>,

    /// Print every stored record instead of the visible ones
    #[arg(long)]
    all: bool,

    /// Mark this uid handled before printing (repeatable)
    #[arg(long = "handle")]
    handle: Vec<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ReplayError> {
    let config = match &args.config {
        Some(path) => FeedConfig::from_file(path)?,
        None => FeedConfig::default(),
    };
    let mut feed = EventFeed::new(config);

    let events = read_raw_events(BufReader::new(File::open(&args.events)?))?;
    let options = ReplayOptions {
        default_week: args.default_week,
        current_week: args.current_week,
        max_age: args.max_age,
        show_all: args.all,
        handle: args.handle,
    };

    let records = replay(&mut feed, events, &options);
    write_records(io::stdout().lock(), &records)?;

    tracing::info!(
        printed = records.len(),
        stored = feed.len(),
        pending_required = feed.has_pending_required(),
        "replay finished"
    );
    Ok(())
}
