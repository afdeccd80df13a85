//! Raw event input and normalization.
//!
//! Callers hand the feed loosely shaped input: bare text, arbitrary JSON
//! values, or structured payloads. Everything is funnelled through
//! [`normalize`] into an [`EventRecord`].
//!
//! # Example
//!
//! ```
//! use feed_core::{normalize, EventPayload, RawEvent};
//!
//! let record = normalize(&RawEvent::from("Storm on the coast"), Some(4));
//! assert_eq!(record.description, "Storm on the coast");
//! assert_eq!(record.week, 4);
//!
//! let payload = EventPayload::new("Bandits sighted").with_name("Raid").with_week(6);
//! let record = normalize(&payload.into(), Some(4));
//! assert_eq!(record.week, 6);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{EventOptions, EventRecord};

/// Separator between identity key components.
const KEY_SEPARATOR: &str = "::";

/// Accepted input shapes for [`EventFeed::add`](crate::EventFeed::add).
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// Plain text; becomes the description
    Text(String),
    /// Any other non-structured value; stringified into the description
    Value(Value),
    /// Structured event fields
    Payload(EventPayload),
}

/// Structured event input.
///
/// Every field is optional. `description` wins over `text` when both are
/// set and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub text: Option<String>,
    pub week: Option<i64>,
    pub options: Option<Value>,
    pub event_id: Option<String>,
}

impl EventPayload {
    /// Creates a payload with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the fallback text used when no description is given.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the week.
    pub fn with_week(mut self, week: i64) -> Self {
        self.week = Some(week);
        self
    }

    /// Sets the choices as a list of opaque values.
    pub fn with_options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.options = Some(Value::Array(options.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets the external event id.
    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Builds a payload by probing the fields of a JSON object.
    ///
    /// Falsy field values (null, false, 0, "") count as absent; other
    /// non-string values are stringified.
    fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            name: map.get("name").and_then(truthy_string),
            description: map.get("description").and_then(truthy_string),
            text: map.get("text").and_then(truthy_string),
            week: map.get("week").and_then(integral_week),
            options: map.get("options").filter(|v| !v.is_null()).cloned(),
            event_id: map.get("eventId").and_then(truthy_string),
        }
    }
}

impl From<&str> for RawEvent {
    fn from(text: &str) -> Self {
        RawEvent::Text(text.to_string())
    }
}

impl From<String> for RawEvent {
    fn from(text: String) -> Self {
        RawEvent::Text(text)
    }
}

impl From<EventPayload> for RawEvent {
    fn from(payload: EventPayload) -> Self {
        RawEvent::Payload(payload)
    }
}

impl From<Value> for RawEvent {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RawEvent::Text(text),
            Value::Object(map) => RawEvent::Payload(EventPayload::from_object(&map)),
            // Lists are probed like objects and carry none of the known fields
            Value::Array(_) => RawEvent::Payload(EventPayload::default()),
            other => RawEvent::Value(other),
        }
    }
}

/// Normalizes raw input into an unassigned record (uid 0, not handled).
///
/// `default_week` applies when the input carries no usable week; without
/// one the week is 0. The input is never modified.
pub fn normalize(raw: &RawEvent, default_week: Option<i64>) -> EventRecord {
    let week = default_week.unwrap_or(0);
    match raw {
        RawEvent::Text(text) => EventRecord::new(text.clone(), week),
        RawEvent::Value(value) => {
            EventRecord::new(truthy_string(value).unwrap_or_default(), week)
        }
        RawEvent::Payload(payload) => {
            let description = non_empty(&payload.description)
                .or_else(|| non_empty(&payload.text))
                .unwrap_or_default();
            let mut record = EventRecord::new(description, payload.week.unwrap_or(week));
            record.name = non_empty(&payload.name);
            record.options = payload.options.as_ref().and_then(normalize_options);
            record.event_id = non_empty(&payload.event_id);
            record
        }
    }
}

/// Derives the identity key used to detect duplicate events.
///
/// Two records with the same week, name, description and event id are the
/// same logical event. The uid is deliberately left out.
pub(crate) fn derive_key(record: &EventRecord) -> String {
    [
        record.week.to_string().as_str(),
        record.name.as_deref().unwrap_or(""),
        record.description.as_str(),
        record.event_id.as_deref().unwrap_or(""),
    ]
    .join(KEY_SEPARATOR)
}

fn normalize_options(value: &Value) -> Option<EventOptions> {
    match value {
        Value::Array(items) => Some(EventOptions::List(items.clone())),
        other if is_truthy(other) => Some(EventOptions::Scalar(other.clone())),
        _ => None,
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stringifies a truthy value; falsy values yield `None`.
fn truthy_string(value: &Value) -> Option<String> {
    is_truthy(value).then(|| display_value(value))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Accepts integral JSON numbers as weeks.
fn integral_week(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    })
}
