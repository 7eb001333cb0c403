use crate::clock::Clock;
use crate::error::{
    DueDateOutOfRangeSnafu, MissingItemIdSnafu, NegativeFieldSnafu, NonFiniteEaseSnafu, Result,
    SchedulerError,
};
use crate::mastery::MasteryLevel;
use crate::scheduler::Scheduler;
use crate::state::due_after;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ensure};

/// One review to apply, as received from a sync payload or a bulk update.
/// Fields are kept loose so malformed rows can be reported instead of dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: Option<i64>,
    /// Reference time of the review; the scheduler's clock when absent.
    pub last_review: Option<DateTime<Utc>>,
    pub quality: i64,
    pub repetitions: i64,
    pub ease_factor: f64,
    pub interval: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub id: i64,
    pub next_review: DateTime<Utc>,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub mastery: MasteryLevel,
}

#[derive(Debug)]
pub struct BatchReport {
    /// One entry per input item, in input order.
    pub results: Vec<Result<ReviewResult>>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn successes(&self) -> impl Iterator<Item = &ReviewResult> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &SchedulerError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
}

fn checked_count(id: i64, field: &'static str, value: i64) -> Result<u32> {
    ensure!(value >= 0, NegativeFieldSnafu { id, field, value });
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

impl<C: Clock + Sync> Scheduler<C> {
    fn apply_item(&self, item: &BatchItem) -> Result<ReviewResult> {
        let id = item.id.context(MissingItemIdSnafu)?;
        // NaN or infinite ease is corruption, unlike zero which means "unset"
        ensure!(item.ease_factor.is_finite(), NonFiniteEaseSnafu { id });
        let repetitions = checked_count(id, "repetitions", item.repetitions)?;
        let interval = checked_count(id, "interval", item.interval)?;
        let reference = item.last_review.unwrap_or_else(|| self.now());

        let result = self.schedule(
            item.quality,
            item.ease_factor,
            interval,
            repetitions,
            Some(reference),
        );
        let next_review =
            due_after(reference, result.interval_days).context(DueDateOutOfRangeSnafu { id })?;
        Ok(ReviewResult {
            id,
            next_review,
            ease_factor: result.ease_factor,
            interval_days: result.interval_days,
            repetitions: result.repetitions,
            mastery: result.mastery,
        })
    }

    /// Apply every item independently. A malformed item becomes an `Err` entry
    /// and never stops the rest of the batch; nothing is rolled back.
    pub fn apply_batch(&self, items: &[BatchItem]) -> BatchReport {
        let results: Vec<_> = items.par_iter().map(|item| self.apply_item(item)).collect();
        let report = BatchReport { results };
        for (index, err) in report.failures() {
            warn!("batch item {index} skipped: {err}");
        }
        info!(
            "applied batch of {}: {} succeeded, {} failed",
            items.len(),
            report.succeeded(),
            report.failed()
        );
        report
    }
}

/// [`Scheduler::apply_batch`] with the default SM-2 scheduler.
pub fn apply_batch(items: &[BatchItem]) -> BatchReport {
    Scheduler::sm2().apply_batch(items)
}
