//! Event resolver for telemetry and event logging.
//!
//! The `EventResolver` captures event outputs without touching game state.
//! Drain it with `take_events()` at the end of a tick.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::arena::Arena;
use crate::output::{Event, Output, OutputKind};

use super::Resolver;

/// Resolver that records event outputs in arrival order.
///
/// # Thread Safety
///
/// The log sits behind a `Mutex` to satisfy the `Send + Sync` bound of
/// [`Resolver`]; a poisoned lock is recovered since the log holds plain data.
///
/// # Example
///
/// ```
/// use skirmish_core::output::OutputKind;
/// use skirmish_core::resolver::{EventResolver, Resolver};
///
/// let resolver = EventResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Event));
/// assert!(resolver.take_events().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventResolver {
    event_log: Mutex<Vec<Event>>,
}

impl EventResolver {
    /// Creates a new event resolver with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_log: Mutex::new(Vec::new()),
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<Event>> {
        self.event_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drains and returns all recorded events.
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log())
    }

    /// Records events that did not pass through a resolve call.
    pub fn record(&self, events: impl IntoIterator<Item = Event>) {
        self.log().extend(events);
    }

    /// Returns the number of events currently in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.log().len()
    }

    /// Returns true if the event log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(&self, outputs: &[&Output], _current: &Arena, _next: &mut Arena) {
        self.record(outputs.iter().filter_map(|output| output.as_event().copied()));
    }
}
