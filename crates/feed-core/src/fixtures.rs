//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers from other
//! crates.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // feed-core = { path = "../feed-core", features = ["test-fixtures"] }
//!
//! use feed_core::fixtures;
//!
//! let feed = fixtures::sample_feed();
//! assert_eq!(feed.len(), 8);
//! ```

use serde_json::Value;

use crate::{EventFeed, RawEvent};

/// Raw JSONL used by [`sample_raw_events`].
pub const SAMPLE_EVENTS_JSONL: &str = include_str!("../tests/fixtures/sample_events.jsonl");

/// Returns the sample raw events in file order.
///
/// Contains 10 lines:
/// - 1 bare string, 1 number, 1 null
/// - 2 identical "Market Day" payloads (merge)
/// - 2 "Bandit Raid" payloads, the second adding options (merge)
/// - 1 council vote with options, using `text` instead of `description`
/// - 2 plain informational payloads
pub fn sample_raw_events() -> Vec<RawEvent> {
    SAMPLE_EVENTS_JSONL
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let value: Value = serde_json::from_str(l).unwrap_or_else(|e| {
                panic!("Failed to parse event line: {}\nError: {}", l, e)
            });
            RawEvent::from(value)
        })
        .collect()
}

/// Returns a default-configured feed with every sample event added at
/// default week 0.
pub fn sample_feed() -> EventFeed {
    let mut feed = EventFeed::default();
    for raw in sample_raw_events() {
        feed.add(raw, Some(0));
    }
    feed
}
