//! The bounded, deduplicating event feed.

use std::collections::VecDeque;

use crate::config::{FeedConfig, DEFAULT_MAX_SIZE};
use crate::listener::{ListenerError, ListenerSlot};
use crate::raw::{derive_key, normalize, RawEvent};
use crate::record::EventRecord;

/// Bounded log of events, newest first.
///
/// Adding an event whose identity key matches a stored record updates that
/// record in place instead of inserting a duplicate. Once the feed holds
/// more than `max_size` records the oldest one is evicted. A single
/// listener is told about every insertion, handled mark and clear.
///
/// # Example
///
/// ```
/// use feed_core::{EventFeed, EventPayload};
///
/// let mut feed = EventFeed::with_max_size(2);
/// feed.add("A", Some(0));
/// feed.add(EventPayload::new("B").with_name("B").with_week(1), None);
/// feed.add(EventPayload::new("C").with_name("C").with_week(2), None);
///
/// let names: Vec<_> = feed.all().into_iter().map(|e| e.description).collect();
/// assert_eq!(names, ["C", "B"]);
/// ```
#[derive(Debug)]
pub struct EventFeed {
    config: FeedConfig,
    events: VecDeque<EventRecord>,
    /// Last uid handed out
    counter: u64,
    listener: ListenerSlot,
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

impl EventFeed {
    /// Creates an empty feed.
    ///
    /// A zero `max_size` falls back to the default capacity.
    pub fn new(mut config: FeedConfig) -> Self {
        if config.max_size == 0 {
            tracing::warn!(
                default = DEFAULT_MAX_SIZE,
                "event feed max_size of 0 replaced by default"
            );
            config.max_size = DEFAULT_MAX_SIZE;
        }
        Self {
            events: VecDeque::with_capacity(config.max_size.min(DEFAULT_MAX_SIZE) + 1),
            config,
            counter: 0,
            listener: ListenerSlot::new(),
        }
    }

    /// Creates an empty feed with the given capacity and default settings.
    pub fn with_max_size(max_size: usize) -> Self {
        Self::new(FeedConfig::with_max_size(max_size))
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn max_size(&self) -> usize {
        self.config.max_size
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Adds an event, or merges it into the stored record with the same
    /// identity key.
    ///
    /// A merge overwrites description, week, options and event id, and the
    /// name only when the new one is present. The merged record keeps its
    /// position, uid and handled flag. Merges don't notify the listener
    /// unless `notify_on_merge` is set.
    ///
    /// A new record gets the next uid and goes to the front. If that pushes
    /// the feed over capacity the oldest record is dropped. The listener is
    /// then called with the whole feed.
    pub fn add(&mut self, raw: impl Into<RawEvent>, default_week: Option<i64>) -> &EventRecord {
        let record = normalize(&raw.into(), default_week);
        let key = derive_key(&record);

        if let Some(index) = self.events.iter().position(|e| derive_key(e) == key) {
            let existing = &mut self.events[index];
            existing.description = record.description;
            existing.week = record.week;
            existing.options = record.options;
            existing.event_id = record.event_id;
            if record.name.is_some() {
                existing.name = record.name;
            }
            tracing::debug!(uid = existing.uid, "merged event into existing record");

            if self.config.notify_on_merge {
                self.emit();
            }
            return &self.events[index];
        }

        self.counter += 1;
        let uid = self.counter;
        self.events.push_front(EventRecord { uid, ..record });
        tracing::debug!(uid, len = self.events.len(), "event added");

        if self.events.len() > self.config.max_size {
            if let Some(evicted) = self.events.pop_back() {
                tracing::debug!(uid = evicted.uid, "evicted oldest event");
            }
        }

        self.emit();
        &self.events[0]
    }

    /// Marks the record with `uid` as handled.
    ///
    /// Returns `None` if no such record is stored. The listener is only
    /// called the first time a record is marked.
    pub fn mark_handled(&mut self, uid: u64) -> Option<&EventRecord> {
        let index = self.events.iter().position(|e| e.uid == uid)?;

        if !self.events[index].is_handled {
            self.events[index].is_handled = true;
            tracing::debug!(uid, "event marked handled");
            self.emit();
        }
        Some(&self.events[index])
    }

    /// Looks up a stored record by uid.
    pub fn get_by_uid(&self, uid: u64) -> Option<&EventRecord> {
        self.events.iter().find(|e| e.uid == uid)
    }

    /// Returns a snapshot of the records worth showing at `current_week`.
    ///
    /// See [`EventRecord::is_visible_at`] for the rules. `max_age` defaults
    /// to the configured `default_max_age`.
    pub fn visible_events(&self, current_week: Option<i64>, max_age: Option<i64>) -> Vec<EventRecord> {
        let max_age = max_age.unwrap_or(self.config.default_max_age);
        self.events
            .iter()
            .filter(|e| e.is_visible_at(current_week, max_age))
            .cloned()
            .collect()
    }

    /// Returns true if any stored record still needs a decision.
    pub fn has_pending_required(&self) -> bool {
        self.events.iter().any(EventRecord::is_pending_required)
    }

    /// Removes every record.
    ///
    /// Clearing an empty feed does nothing and doesn't notify. Uids are not
    /// reset.
    pub fn clear(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let removed = self.events.len();
        self.events.clear();
        tracing::debug!(removed, "event feed cleared");
        self.emit();
    }

    /// Returns a snapshot of every stored record, newest first.
    pub fn all(&self) -> Vec<EventRecord> {
        self.events.iter().cloned().collect()
    }

    /// Iterates over stored records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter()
    }

    /// Installs the change listener, replacing any previous one.
    pub fn set_on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[EventRecord]) -> Result<(), ListenerError> + 'static,
    {
        self.listener.set(listener);
    }

    /// Removes the change listener.
    pub fn clear_on_change(&mut self) {
        self.listener.clear();
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_set()
    }

    fn emit(&mut self) {
        let events = self.events.make_contiguous();
        self.listener.notify(events);
    }
}
