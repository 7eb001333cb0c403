use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest quality that still counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;
pub const MAX_QUALITY: u8 = 5;

/// Recall quality of a single review, always within `0..=5`.
///
/// - 0: complete blackout
/// - 1: incorrect, or correct but barely remembered
/// - 2: difficult
/// - 3: correct with effort
/// - 4: correct after some hesitation
/// - 5: instant recall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const BLACKOUT: Self = Self(0);
    pub const PERFECT: Self = Self(MAX_QUALITY);

    /// Out of range values are clamped rather than rejected.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, MAX_QUALITY as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_lapse(self) -> bool {
        self.0 < PASSING_QUALITY
    }
}

impl From<i64> for Quality {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<i32> for Quality {
    fn from(value: i32) -> Self {
        Self::clamped(value as i64)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw result of one practice attempt, as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub is_correct: bool,
    pub response_time_ms: i64,
}

impl ReviewOutcome {
    pub fn new(is_correct: bool, response_time_ms: i64) -> Self {
        Self {
            is_correct,
            response_time_ms,
        }
    }

    pub fn quality(&self) -> Quality {
        estimate_quality(self.is_correct, self.response_time_ms)
    }
}

/// Estimate recall quality from correctness and response latency.
///
/// Faster correct answers score higher. Incorrect answers never score above 1:
/// a quick wrong answer is treated as a guess (1), a slow one as no recall (0).
/// Negative latencies are treated as 0.
pub fn estimate_quality(is_correct: bool, response_time_ms: i64) -> Quality {
    let ms = response_time_ms.max(0);
    let q = if !is_correct {
        if ms < 2000 { 1 } else { 0 }
    } else {
        match ms {
            0..1000 => 5,
            1000..2000 => 4,
            2000..4000 => 3,
            4000..8000 => 2,
            _ => 1,
        }
    };
    Quality(q)
}

/// Quality for clients that only report correctness.
pub fn estimate_quality_binary(is_correct: bool) -> Quality {
    if is_correct { Quality(4) } else { Quality(2) }
}
