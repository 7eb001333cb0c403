use crate::config::INITIAL_EASE;
use crate::mastery::{MasteryLevel, MasteryThresholds};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling state of one learner/item pair.
///
/// Mastery and the next review time are derived on demand and cannot be set
/// directly. A "reset" is expressed by replacing the state with
/// [`ItemSchedulingState::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSchedulingState {
    pub ease_factor: f64,
    pub interval_days: u32,
    /// Consecutive successful reviews since the last lapse.
    pub repetition_count: u32,
    /// `None` until the item has been reviewed once.
    pub last_quality: Option<u8>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Default for ItemSchedulingState {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemSchedulingState {
    pub fn new() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval_days: 0,
            repetition_count: 0,
            last_quality: None,
            last_reviewed_at: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_quality.is_none()
    }

    /// Mastery under the default thresholds. A scheduler with custom
    /// thresholds answers through [`crate::Scheduler::mastery_of`].
    pub fn mastery_level(&self) -> MasteryLevel {
        self.mastery_level_with(&MasteryThresholds::default())
    }

    pub fn mastery_level_with(&self, thresholds: &MasteryThresholds) -> MasteryLevel {
        match self.last_quality {
            None => MasteryLevel::New,
            Some(q) => thresholds.classify(self.interval_days, self.repetition_count, q),
        }
    }

    /// `last_reviewed_at + interval_days`, saturating at the last date chrono
    /// can represent. A never-reviewed item has no due time and is due
    /// immediately.
    pub fn next_review_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
            .map(|at| due_after(at, self.interval_days).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at().is_none_or(|due| due <= now)
    }
}

/// `None` when the due date is past `DateTime::<Utc>::MAX_UTC`.
pub(crate) fn due_after(reference: DateTime<Utc>, interval_days: u32) -> Option<DateTime<Utc>> {
    reference.checked_add_signed(TimeDelta::days(interval_days as i64))
}

/// Anything that carries a scheduling state, so due filtering can keep caller
/// identifiers attached to the items it returns.
pub trait Schedulable {
    fn scheduling_state(&self) -> &ItemSchedulingState;
}

impl Schedulable for ItemSchedulingState {
    fn scheduling_state(&self) -> &ItemSchedulingState {
        self
    }
}

impl<K> Schedulable for (K, ItemSchedulingState) {
    fn scheduling_state(&self) -> &ItemSchedulingState {
        &self.1
    }
}
