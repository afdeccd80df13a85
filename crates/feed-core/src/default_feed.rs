//! Ambient default feed.
//!
//! Code that owns its own [`EventFeed`] should pass it around explicitly.
//! This instance exists for the outermost layer of an application that
//! wants one shared feed without threading it through every call. It is
//! created with the default configuration on first use and lives until
//! [`reset_default_feed`] drops it.
//!
//! The feed is per thread: it is not `Send`, and its listener runs inline.
//! Calling [`with_default_feed`] from inside the default feed's own
//! listener panics on the nested borrow; the listener guard catches and
//! logs that panic.

use std::cell::RefCell;

use crate::feed::EventFeed;

thread_local! {
    static DEFAULT_FEED: RefCell<Option<EventFeed>> = const { RefCell::new(None) };
}

/// Runs `f` against the default feed, creating it on first use.
pub fn with_default_feed<R>(f: impl FnOnce(&mut EventFeed) -> R) -> R {
    DEFAULT_FEED.with(|cell| {
        let mut slot = cell.borrow_mut();
        let feed = slot.get_or_insert_with(|| {
            tracing::debug!("creating default event feed");
            EventFeed::default()
        });
        f(feed)
    })
}

/// Drops the default feed so the next access starts from scratch.
pub fn reset_default_feed() {
    let previous = DEFAULT_FEED.with(|cell| cell.borrow_mut().take());
    if previous.is_some() {
        tracing::debug!("default event feed reset");
    }
}
