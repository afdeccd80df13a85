//! Bounded, deduplicated event feed for a week-based game UI.
//!
//! The feed normalizes loosely shaped input into [`EventRecord`]s, merges
//! duplicates by identity key, keeps only the newest `max_size` records,
//! and decides which records are still worth showing. A single listener is
//! notified synchronously whenever the feed changes.
//!
//! # Modules
//!
//! - [`record`]: Normalized records and their visibility rules
//! - [`raw`]: Accepted input shapes and normalization
//! - [`feed`]: The feed itself
//! - [`listener`]: Single-slot change listener
//! - [`config`]: TOML configuration
//! - [`default_feed`]: Lazily created per-thread default feed

pub mod config;
pub mod default_feed;
pub mod feed;
pub mod listener;
pub mod raw;
pub mod record;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use config::{
    default_config_toml, ConfigError, FeedConfig, FeedFile, TomlSerializeError, DEFAULT_MAX_AGE,
    DEFAULT_MAX_SIZE,
};
pub use default_feed::{reset_default_feed, with_default_feed};
pub use feed::EventFeed;
pub use listener::{ChangeListener, ListenerError, ListenerSlot};
pub use raw::{normalize, EventPayload, RawEvent};
pub use record::{EventOptions, EventRecord};
