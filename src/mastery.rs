use crate::quality::PASSING_QUALITY;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

/// Coarse mastery tier, used for reporting only. Ordered from least to most
/// familiar, so sorting by level surfaces newer items first.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    FromRepr,
)]
#[repr(u8)]
pub enum MasteryLevel {
    #[default]
    New = 0,
    Learning = 1,
    Reviewing = 2,
    Mastered = 3,
}

impl MasteryLevel {
    /// Numeric code used by persisted progress rows.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Interval thresholds separating the mastery tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryThresholds {
    /// Reviews below this quality count as lapses.
    pub lapse_quality: u8,
    pub reviewing_days: u32,
    pub mastered_days: u32,
}

impl Default for MasteryThresholds {
    fn default() -> Self {
        Self {
            lapse_quality: PASSING_QUALITY,
            reviewing_days: 6,
            mastered_days: 30,
        }
    }
}

impl MasteryThresholds {
    pub(crate) fn is_valid(&self) -> bool {
        (1..=crate::quality::MAX_QUALITY).contains(&self.lapse_quality)
            && self.reviewing_days > 0
            && self.reviewing_days <= self.mastered_days
    }

    /// The lapse check runs first: an item that just failed is `Learning`
    /// even if its interval still says otherwise.
    pub fn classify(&self, interval_days: u32, repetitions: u32, last_quality: u8) -> MasteryLevel {
        if last_quality < self.lapse_quality || repetitions == 0 {
            MasteryLevel::Learning
        } else if interval_days >= self.mastered_days {
            MasteryLevel::Mastered
        } else if interval_days >= self.reviewing_days {
            MasteryLevel::Reviewing
        } else if repetitions >= 1 {
            MasteryLevel::Learning
        } else {
            MasteryLevel::New
        }
    }
}

/// Classify with the default thresholds (6 days reviewing, 30 days mastered).
pub fn classify(interval_days: u32, repetitions: u32, last_quality: u8) -> MasteryLevel {
    MasteryThresholds::default().classify(interval_days, repetitions, last_quality)
}
