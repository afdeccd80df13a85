//! Integration tests for the event feed.
//!
//! These drive the public API through the scenarios a UI layer relies on,
//! including a replay of the sample fixture file.

use feed_core::{EventFeed, EventPayload, EventRecord, FeedConfig, RawEvent};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

/// Load sample raw events from fixture file.
fn load_sample_events() -> Vec<RawEvent> {
    let content = fs::read_to_string("tests/fixtures/sample_events.jsonl")
        .expect("Failed to read events");

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let value: Value = serde_json::from_str(line).expect("Failed to parse event");
            RawEvent::from(value)
        })
        .collect()
}

fn descriptions(events: &[EventRecord]) -> Vec<&str> {
    events.iter().map(|e| e.description.as_str()).collect()
}

#[test]
fn test_capacity_scenario() {
    let mut feed = EventFeed::with_max_size(2);
    feed.add("A", Some(0));
    feed.add(EventPayload::new("B").with_name("B").with_week(1), None);
    feed.add(EventPayload::new("C").with_name("C").with_week(2), None);

    let all = feed.all();
    assert_eq!(all.len(), 2);
    assert_eq!(descriptions(&all), ["C", "B"]);
}

#[test]
fn test_pending_decision_scenario() {
    let mut feed = EventFeed::default();
    let uid = feed
        .add(json!({"name": "X", "week": 0, "options": ["a", "b"]}), None)
        .uid;
    assert!(feed.has_pending_required());

    feed.mark_handled(uid);
    assert!(!feed.has_pending_required());
}

#[test]
fn test_clear_scenario() {
    let calls: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let mut feed = EventFeed::default();
    let sink = Rc::clone(&calls);
    feed.set_on_change(move |events| {
        sink.borrow_mut().push(events.len());
        Ok(())
    });

    feed.clear();
    assert!(calls.borrow().is_empty());

    feed.add("A", None);
    calls.borrow_mut().clear();
    feed.clear();
    assert_eq!(*calls.borrow(), vec![0]);
}

#[test]
fn test_bounded_size_over_many_adds() {
    let mut feed = EventFeed::default();
    let mut last_uid = 0;
    for week in 0..100 {
        let uid = feed.add(format!("week {week} report"), Some(week)).uid;
        assert!(uid > last_uid);
        last_uid = uid;
        assert!(feed.len() <= 24);
    }

    // The 24 newest survive, newest first
    let weeks: Vec<i64> = feed.iter().map(|e| e.week).collect();
    let expected: Vec<i64> = (76..100).rev().collect();
    assert_eq!(weeks, expected);
}

#[test]
fn test_handled_is_monotonic_across_merges() {
    let mut feed = EventFeed::default();
    let raw = EventPayload::new("Envoy arrives").with_event_id("evt_envoy").with_week(3);
    let uid = feed.add(raw.clone(), None).uid;
    feed.mark_handled(uid);

    feed.add(raw, None);
    assert!(feed.get_by_uid(uid).unwrap().is_handled);
}

#[test]
fn test_fixture_replay() {
    let mut feed = EventFeed::default();
    for raw in load_sample_events() {
        feed.add(raw, Some(0));
    }

    assert_eq!(feed.len(), 8);
    assert!(feed.has_pending_required());

    let visible = feed.visible_events(Some(5), None);
    assert_eq!(
        descriptions(&visible),
        [
            "A comet is seen in the night sky.",
            "Travellers speak of sickness in the south.",
            "The council asks for your ruling on the grain tax.",
            "Bandits struck the eastern farms.",
        ]
    );

    // The raid kept its original uid and picked up options on merge
    let raid = &visible[3];
    assert_eq!(raid.uid, 3);
    assert!(raid.has_options());
}

#[test]
fn test_fixture_replay_with_small_feed() {
    let mut feed = EventFeed::new(FeedConfig::with_max_size(3));
    for raw in load_sample_events() {
        feed.add(raw, Some(0));
    }

    // The raid was evicted before its second line arrived, so it came back
    // as a new record. The null line normalizes to an empty description.
    let all = feed.all();
    assert_eq!(
        descriptions(&all),
        [
            "",
            "A comet is seen in the night sky.",
            "Bandits struck the eastern farms.",
        ]
    );
}

#[test]
fn test_records_serialize_for_ui() {
    let mut feed = EventFeed::default();
    feed.add(
        EventPayload::new("Council vote")
            .with_name("Council")
            .with_options(["yes", "no"])
            .with_event_id("evt_vote"),
        Some(2),
    );

    let json = serde_json::to_value(feed.all()).unwrap();
    assert_eq!(
        json,
        json!([{
            "name": "Council",
            "description": "Council vote",
            "week": 2,
            "options": ["yes", "no"],
            "eventId": "evt_vote",
            "uid": 1,
            "isHandled": false
        }])
    );
}
