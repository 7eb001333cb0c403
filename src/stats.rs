//! Aggregate helpers over a learner's items, used by progress reporting.

use crate::state::Schedulable;
use chrono::{NaiveDate, TimeDelta};

const SECONDS_PER_REVIEW: i64 = 3;

/// Percentage of correct answers, `0.0` when nothing was answered.
pub fn retention_rate(correct: u32, incorrect: u32) -> f64 {
    let total = correct as u64 + incorrect as u64;
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

/// Daily review target by the number of items not yet mastered.
pub fn recommended_daily_reviews(total: u32, mastered: u32) -> u32 {
    match total.saturating_sub(mastered) {
        0..20 => 10,
        20..100 => 20,
        100..500 => 30,
        _ => 50,
    }
}

pub fn estimate_review_time(item_count: usize) -> TimeDelta {
    TimeDelta::seconds(item_count as i64 * SECONDS_PER_REVIEW)
}

/// Items falling due during `day` (UTC). Never-reviewed items have no due day
/// and are not counted.
pub fn review_load_for_day<T: Schedulable>(items: &[T], day: NaiveDate) -> usize {
    items
        .iter()
        .filter_map(|item| item.scheduling_state().next_review_at())
        .filter(|due| due.date_naive() == day)
        .count()
}

pub fn average_ease<T: Schedulable>(items: &[T]) -> f64 {
    mean(items.iter().map(|i| i.scheduling_state().ease_factor))
}

pub fn average_interval<T: Schedulable>(items: &[T]) -> f64 {
    mean(
        items
            .iter()
            .map(|i| i.scheduling_state().interval_days as f64),
    )
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}
