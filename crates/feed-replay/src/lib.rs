//! Replays a JSONL file of raw events through an event feed.
//!
//! Each non-blank line of the input is one JSON value handed to
//! [`EventFeed::add`]: a string, an object with event fields, or any other
//! value. The resulting feed can then be queried the way a UI would.

use std::io::{BufRead, Write};

use feed_core::{ConfigError, EventFeed, EventRecord, RawEvent};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while replaying events.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// What to do with the feed once every event has been added.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Week used for events that carry none
    pub default_week: Option<i64>,
    /// Week to evaluate visibility at
    pub current_week: Option<i64>,
    /// Age limit for visibility, config default when absent
    pub max_age: Option<i64>,
    /// Output every stored record instead of the visible ones
    pub show_all: bool,
    /// Uids to mark handled before querying
    pub handle: Vec<u64>,
}

/// Reads raw events from JSONL, skipping blank lines.
pub fn read_raw_events(reader: impl BufRead) -> Result<Vec<RawEvent>, ReplayError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
            line: index + 1,
            source,
        })?;
        events.push(RawEvent::from(value));
    }
    Ok(events)
}

/// Adds `events` to `feed`, applies handled marks and returns the records
/// selected by `options`.
pub fn replay(
    feed: &mut EventFeed,
    events: Vec<RawEvent>,
    options: &ReplayOptions,
) -> Vec<EventRecord> {
    let total = events.len();
    for raw in events {
        feed.add(raw, options.default_week);
    }
    tracing::info!(total, stored = feed.len(), "events replayed");

    for &uid in &options.handle {
        if feed.mark_handled(uid).is_none() {
            tracing::warn!(uid, "no stored event to mark handled");
        }
    }

    if options.show_all {
        feed.all()
    } else {
        feed.visible_events(options.current_week, options.max_age)
    }
}

/// Writes one JSON record per line.
pub fn write_records(mut writer: impl Write, records: &[EventRecord]) -> Result<(), ReplayError> {
    for record in records {
        let json = serde_json::to_string(record).map_err(ReplayError::Serialize)?;
        writeln!(writer, "{}", json)?;
    }
    writer.flush()?;
    Ok(())
}
