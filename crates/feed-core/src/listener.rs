//! Single-slot change listener.
//!
//! The feed calls its listener synchronously after every notifying
//! mutation. A failing listener is logged and otherwise ignored: the
//! mutation that triggered it has already been committed.

use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::record::EventRecord;

/// Error type listeners may return.
pub type ListenerError = Box<dyn Error + Send + Sync>;

/// Callback invoked with the full, ordered record sequence.
pub type ChangeListener = Box<dyn FnMut(&[EventRecord]) -> Result<(), ListenerError>>;

/// Holds at most one listener.
#[derive(Default)]
pub struct ListenerSlot {
    listener: Option<ChangeListener>,
}

impl ListenerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `listener`, replacing any previous one.
    pub fn set<F>(&mut self, listener: F)
    where
        F: FnMut(&[EventRecord]) -> Result<(), ListenerError> + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the current listener, if any.
    pub fn clear(&mut self) {
        self.listener = None;
    }

    pub fn is_set(&self) -> bool {
        self.listener.is_some()
    }

    /// Calls the listener with `events`.
    ///
    /// Errors and panics raised by the listener are logged and swallowed.
    pub fn notify(&mut self, events: &[EventRecord]) {
        let Some(listener) = self.listener.as_mut() else {
            return;
        };

        match catch_unwind(AssertUnwindSafe(|| listener(events))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(error = %err, "event feed listener failed");
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::error!(panic = %message, "event feed listener panicked");
            }
        }
    }
}

impl fmt::Debug for ListenerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}
