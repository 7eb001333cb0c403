mod batch;
mod clock;
mod config;
mod due;
mod error;
mod mastery;
mod quality;
mod scheduler;
mod state;
mod stats;
#[cfg(test)]
mod test_helpers;

pub use batch::{BatchItem, BatchReport, ReviewResult, apply_batch};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{INITIAL_EASE, MAX_EASE, MAX_INTERVAL, MIN_EASE, SchedulerConfig};
pub use due::{ReviewQueue, select_due, select_due_with};
pub use error::{Result, SchedulerError};
pub use mastery::{MasteryLevel, MasteryThresholds, classify};
pub use quality::{Quality, ReviewOutcome, estimate_quality, estimate_quality_binary};
pub use scheduler::{ScheduleResult, Scheduler, schedule};
pub use state::{ItemSchedulingState, Schedulable};
pub use stats::{
    average_ease, average_interval, estimate_review_time, recommended_daily_reviews,
    retention_rate, review_load_for_day,
};
