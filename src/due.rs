use crate::mastery::{MasteryLevel, MasteryThresholds};
use crate::state::{ItemSchedulingState, Schedulable};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::hash::Hash;

/// Review order: earliest due first, then lowest mastery. Never-reviewed items
/// count as due since the beginning of time.
type DueKey = (DateTime<Utc>, MasteryLevel);

fn due_key(state: &ItemSchedulingState, thresholds: &MasteryThresholds) -> DueKey {
    (
        state.next_review_at().unwrap_or(DateTime::<Utc>::MIN_UTC),
        state.mastery_level_with(thresholds),
    )
}

/// Items due at `now` (inclusive), in review order.
pub fn select_due<T: Schedulable>(items: &[T], now: DateTime<Utc>) -> Vec<&T> {
    select_due_with(items, now, &MasteryThresholds::default())
}

/// [`select_due`] with ties broken by mastery under `thresholds`.
pub fn select_due_with<'a, T: Schedulable>(
    items: &'a [T],
    now: DateTime<Utc>,
    thresholds: &MasteryThresholds,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item.scheduling_state().is_due(now))
        .sorted_by_key(|item| due_key(item.scheduling_state(), thresholds))
        .collect()
}

/// A user's review queue keyed by item identifier.
///
/// Keeps every pushed item, due or not; [`ReviewQueue::pop_due`] only yields
/// items whose due time has passed.
#[derive(Debug, Clone)]
pub struct ReviewQueue<K: Hash + Eq> {
    queue: PriorityQueue<K, Reverse<DueKey>>,
    thresholds: MasteryThresholds,
}

impl<K: Hash + Eq> Default for ReviewQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> ReviewQueue<K> {
    pub fn new() -> Self {
        Self::with_thresholds(MasteryThresholds::default())
    }

    pub fn with_thresholds(thresholds: MasteryThresholds) -> Self {
        Self {
            queue: PriorityQueue::new(),
            thresholds,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Insert an item, or re-prioritize it after a review.
    pub fn push(&mut self, key: K, state: &ItemSchedulingState) {
        self.queue.push(key, Reverse(due_key(state, &self.thresholds)));
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.queue.remove(key).is_some()
    }

    /// When the front of the queue becomes due; `None` for an empty queue.
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.queue.peek().map(|(_, Reverse((due, _)))| *due)
    }

    pub fn peek_due(&self, now: DateTime<Utc>) -> Option<&K> {
        match self.queue.peek() {
            Some((key, Reverse((due, _)))) if *due <= now => Some(key),
            _ => None,
        }
    }

    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<K> {
        self.peek_due(now)?;
        self.queue.pop().map(|(key, _)| key)
    }

    /// Remove and return every item due at `now`, in review order.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<K> {
        std::iter::from_fn(|| self.pop_due(now)).collect()
    }
}

impl<K: Hash + Eq> Extend<(K, ItemSchedulingState)> for ReviewQueue<K> {
    fn extend<I: IntoIterator<Item = (K, ItemSchedulingState)>>(&mut self, iter: I) {
        for (key, state) in iter {
            self.push(key, &state);
        }
    }
}

impl<K: Hash + Eq> FromIterator<(K, ItemSchedulingState)> for ReviewQueue<K> {
    fn from_iter<I: IntoIterator<Item = (K, ItemSchedulingState)>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
