//! Normalized event records.
//!
//! An [`EventRecord`] is what the feed stores and hands to listeners. Records
//! are only ever created by [`EventFeed::add`](crate::EventFeed::add).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Choices attached to an event.
///
/// A list marks the event as needing a decision once it is non-empty. Any
/// other present value is kept as-is and measured by its `length`: a string
/// counts UTF-16 code units, an object counts its numeric `length` field,
/// and everything else counts as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventOptions {
    /// Shallow copy of a list of opaque choice values
    List(Vec<Value>),
    /// Non-list value supplied in place of a list
    Scalar(Value),
}

impl EventOptions {
    /// Number of choices carried by this value.
    pub fn len(&self) -> usize {
        match self {
            EventOptions::List(items) => items.len(),
            EventOptions::Scalar(Value::String(s)) => s.encode_utf16().count(),
            EventOptions::Scalar(Value::Object(map)) => map
                .get("length")
                .and_then(Value::as_f64)
                .filter(|n| n.is_finite() && *n > 0.0)
                .map_or(0, |n| n.ceil() as usize),
            EventOptions::Scalar(_) => 0,
        }
    }

    /// Returns true if there is nothing to choose from.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One normalized entry in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Optional short label
    pub name: Option<String>,
    /// Text summary, empty when nothing usable was supplied
    pub description: String,
    /// Logical week the event belongs to
    pub week: i64,
    /// Choices awaiting a decision, if any
    pub options: Option<EventOptions>,
    /// External correlation identifier
    pub event_id: Option<String>,
    /// Feed-assigned identity, stable for the lifetime of the feed
    pub uid: u64,
    /// Set once the consumer has dealt with the event
    pub is_handled: bool,
}

impl EventRecord {
    /// Creates an unassigned record (uid 0, not handled).
    pub fn new(description: impl Into<String>, week: i64) -> Self {
        Self {
            name: None,
            description: description.into(),
            week,
            options: None,
            event_id: None,
            uid: 0,
            is_handled: false,
        }
    }

    /// Returns true if the record carries at least one choice.
    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }

    /// Returns true if the record needs a decision that hasn't been made yet.
    pub fn is_pending_required(&self) -> bool {
        self.has_options() && !self.is_handled
    }

    /// Returns true if the record should still be shown at `current_week`.
    ///
    /// Handled records are never visible. Records with choices are always
    /// visible. Everything else is visible while its age is at most
    /// `max_age`; future-dated records count as fresh. Without a current
    /// week the age check is skipped.
    pub fn is_visible_at(&self, current_week: Option<i64>, max_age: i64) -> bool {
        if self.is_handled {
            return false;
        }
        if self.has_options() {
            return true;
        }
        match current_week {
            Some(now) => now.saturating_sub(self.week) <= max_age,
            None => true,
        }
    }
}
