//! # Event History
//!
//! Subjects record what happened to them as an ordered log of timestamped
//! events. Game logic appends to the log as time advances, so insertion order
//! is also chronological order. Expressions only ever read it.

use serde::{Deserialize, Serialize};

use crate::timestamp::{TimeDuration, TimePoint};

/// Identifier of an item type, e.g. `"butter"`. Compared by exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that happened at a known point of game time.
pub trait TimedEvent {
    fn time(&self) -> TimePoint;
}

/// A subject ate or drank one unit of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionEvent {
    pub item_id: ItemId,
    pub time: TimePoint,
}

impl ConsumptionEvent {
    pub fn new(item_id: impl Into<String>, time: TimePoint) -> Self {
        Self {
            item_id: ItemId::new(item_id),
            time,
        }
    }
}

impl TimedEvent for ConsumptionEvent {
    fn time(&self) -> TimePoint {
        self.time
    }
}

/// A closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: TimePoint,
    pub end: TimePoint,
}

impl TimeWindow {
    /// The window reaching `span` back from `now`, both ends included.
    pub fn trailing(now: TimePoint, span: TimeDuration) -> Self {
        Self {
            start: now - span,
            end: now,
        }
    }

    pub fn contains(&self, time: TimePoint) -> bool {
        self.start <= time && time <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventHistory<E> {
    events: Vec<E>,
}

impl<E> Default for EventHistory<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventHistory<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E: TimedEvent> EventHistory<E> {
    /// Number of events inside `window` that also satisfy `filter`.
    pub fn count_within<F>(&self, window: TimeWindow, filter: F) -> usize
    where
        F: Fn(&E) -> bool,
    {
        self.events
            .iter()
            .filter(|event| window.contains(event.time()) && filter(event))
            .count()
    }
}

impl EventHistory<ConsumptionEvent> {
    /// How many units of `item_id` were consumed within `[now - span, now]`.
    pub fn consumption_count(&self, item_id: &str, now: TimePoint, span: TimeDuration) -> usize {
        self.count_within(TimeWindow::trailing(now, span), |event| {
            event.item_id.as_str() == item_id
        })
    }
}

impl<E> FromIterator<E> for EventHistory<E> {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a, E> IntoIterator for &'a EventHistory<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
