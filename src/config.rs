use crate::error::{
    InvalidEaseBoundsSnafu, InvalidInitialEaseSnafu, InvalidIntervalsSnafu,
    InvalidMasteryThresholdsSnafu, Result,
};
use crate::mastery::MasteryThresholds;
use serde::{Deserialize, Serialize};
use snafu::ensure;

pub const INITIAL_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 3.5;
/// A hundred years; long enough that no learner outlives it.
pub const MAX_INTERVAL: u32 = 36500;

/// Parameters of the SM-2 transition. The defaults are the classic SM-2 values
/// with the ease ceiling used by the progress service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub initial_ease: f64,
    pub min_ease: f64,
    pub max_ease: f64,
    /// Interval after the first successful review.
    pub first_interval: u32,
    /// Interval after the second consecutive successful review.
    pub second_interval: u32,
    /// Interval after a lapse.
    pub lapse_interval: u32,
    /// Upper bound on any scheduled interval.
    pub max_interval: u32,
    pub mastery: MasteryThresholds,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            min_ease: MIN_EASE,
            max_ease: MAX_EASE,
            first_interval: 1,
            second_interval: 6,
            lapse_interval: 1,
            max_interval: MAX_INTERVAL,
            mastery: MasteryThresholds::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_ease, self.max_ease);
        ensure!(
            min.is_finite() && max.is_finite() && min > 0.0 && min <= max,
            InvalidEaseBoundsSnafu { min, max }
        );
        ensure!(
            (min..=max).contains(&self.initial_ease),
            InvalidInitialEaseSnafu {
                initial: self.initial_ease
            }
        );
        ensure!(
            self.first_interval >= 1
                && self.second_interval >= self.first_interval
                && self.lapse_interval >= 1
                && self.max_interval >= self.second_interval.max(self.lapse_interval),
            InvalidIntervalsSnafu
        );
        ensure!(self.mastery.is_valid(), InvalidMasteryThresholdsSnafu);
        Ok(())
    }

    /// Zero, negative or non-finite ease means the item was never scheduled.
    pub(crate) fn normalize_ease(&self, ease: f64) -> f64 {
        if ease.is_finite() && ease > 0.0 {
            ease
        } else {
            self.initial_ease
        }
    }

    pub(crate) fn clamp_ease(&self, ease: f64) -> f64 {
        ease.clamp(self.min_ease, self.max_ease)
    }
}
