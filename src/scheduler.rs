use crate::clock::{Clock, SystemClock};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::mastery::MasteryLevel;
use crate::quality::{Quality, ReviewOutcome};
use crate::due::{ReviewQueue, select_due_with};
use crate::state::{ItemSchedulingState, Schedulable, due_after};
use chrono::{DateTime, Utc};
use std::hash::Hash;
use log::debug;
use serde::{Deserialize, Serialize};

/// Outcome of one SM-2 transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub mastery: MasteryLevel,
    pub next_review_at: DateTime<Utc>,
}

/// SM-2 scheduler with a validated configuration and an injectable clock.
///
/// The clock is consulted only when a call omits its reference time.
#[derive(Debug, Clone)]
pub struct Scheduler<C = SystemClock> {
    config: SchedulerConfig,
    clock: C,
}

impl Scheduler {
    /// Classic SM-2 parameters, reading time from the system clock.
    pub fn sm2() -> Self {
        Self {
            config: SchedulerConfig::default(),
            clock: SystemClock,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::sm2()
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn new(config: SchedulerConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn initial_state(&self) -> ItemSchedulingState {
        ItemSchedulingState {
            ease_factor: self.config.initial_ease,
            ..ItemSchedulingState::new()
        }
    }

    /// Mastery of `state` under this scheduler's thresholds.
    pub fn mastery_of(&self, state: &ItemSchedulingState) -> MasteryLevel {
        state.mastery_level_with(&self.config.mastery)
    }

    /// [`select_due_with`] using this scheduler's thresholds to order ties.
    pub fn select_due<'a, T: Schedulable>(
        &self,
        items: &'a [T],
        now: DateTime<Utc>,
    ) -> Vec<&'a T> {
        select_due_with(items, now, &self.config.mastery)
    }

    /// An empty queue ordering ties by this scheduler's thresholds.
    pub fn review_queue<K: Hash + Eq>(&self) -> ReviewQueue<K> {
        ReviewQueue::with_thresholds(self.config.mastery)
    }

    /// Apply one review to the given prior state.
    ///
    /// Never fails: quality is clamped to `0..=5`, a missing ease is replaced
    /// by the initial ease, intervals stop at `max_interval` and the due date
    /// saturates at `DateTime::<Utc>::MAX_UTC`.
    pub fn schedule(
        &self,
        quality: impl Into<Quality>,
        prior_ease: f64,
        prior_interval: u32,
        prior_repetitions: u32,
        reference: Option<DateTime<Utc>>,
    ) -> ScheduleResult {
        let quality = quality.into();
        let reference = reference.unwrap_or_else(|| self.clock.now());
        let config = &self.config;

        let q = quality.value() as f64;
        let prior_ease = config.normalize_ease(prior_ease);
        let ease = config.clamp_ease(prior_ease + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)));

        let (interval_days, repetitions) = if quality.value() < config.mastery.lapse_quality {
            (config.lapse_interval, 0)
        } else {
            let repetitions = prior_repetitions.saturating_add(1);
            let interval = match repetitions {
                1 => config.first_interval,
                2 => config.second_interval,
                _ => grow_interval(prior_interval, ease, config.max_interval),
            };
            (interval, repetitions)
        };

        let mastery = config
            .mastery
            .classify(interval_days, repetitions, quality.value());
        let next_review_at =
            due_after(reference, interval_days).unwrap_or(DateTime::<Utc>::MAX_UTC);

        debug!(
            "quality={quality} ease {prior_ease:.2}->{ease:.2} interval {prior_interval}->{interval_days} reps {prior_repetitions}->{repetitions} mastery={mastery}"
        );

        ScheduleResult {
            ease_factor: ease,
            interval_days,
            repetitions,
            mastery,
            next_review_at,
        }
    }

    /// Estimate quality from a raw outcome and apply it to `state`.
    pub fn review(
        &self,
        state: &ItemSchedulingState,
        outcome: ReviewOutcome,
        reference: Option<DateTime<Utc>>,
    ) -> ItemSchedulingState {
        self.review_with_quality(state, outcome.quality(), reference)
    }

    pub fn review_with_quality(
        &self,
        state: &ItemSchedulingState,
        quality: impl Into<Quality>,
        reference: Option<DateTime<Utc>>,
    ) -> ItemSchedulingState {
        let quality = quality.into();
        let reference = reference.unwrap_or_else(|| self.clock.now());
        let result = self.schedule(
            quality,
            state.ease_factor,
            state.interval_days,
            state.repetition_count,
            Some(reference),
        );
        ItemSchedulingState {
            ease_factor: result.ease_factor,
            interval_days: result.interval_days,
            repetition_count: result.repetitions,
            last_quality: Some(quality.value()),
            last_reviewed_at: Some(reference),
        }
    }
}

fn grow_interval(prior_interval: u32, ease: f64, max_interval: u32) -> u32 {
    (prior_interval as f64 * ease)
        .round()
        .clamp(1.0, max_interval as f64) as u32
}

/// SM-2 transition with the default configuration and an explicit reference
/// time.
pub fn schedule(
    quality: i64,
    prior_ease: f64,
    prior_interval: u32,
    prior_repetitions: u32,
    now: DateTime<Utc>,
) -> ScheduleResult {
    Scheduler::sm2().schedule(
        quality,
        prior_ease,
        prior_interval,
        prior_repetitions,
        Some(now),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{INITIAL_EASE, MAX_EASE, MAX_INTERVAL, MIN_EASE};
    use crate::mastery::MasteryThresholds;
    use crate::test_helpers::{TestHelper, init_logger};
    use chrono::{TimeDelta, TimeZone};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn fresh_item_first_success() {
        init_logger();
        let r = schedule(5, 2.5, 0, 0, now());
        assert_eq!(r.repetitions, 1);
        assert_eq!(r.interval_days, 1);
        assert_eq!(r.mastery, MasteryLevel::Learning);
        [r.ease_factor].assert_approx_eq([2.6]);
        assert_eq!(r.next_review_at, now() + TimeDelta::days(1));
    }

    #[test]
    fn success_streak() {
        let first = schedule(5, 2.5, 0, 0, now());
        let second = schedule(
            5,
            first.ease_factor,
            first.interval_days,
            first.repetitions,
            now(),
        );
        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval_days, 6);
        assert_eq!(second.mastery, MasteryLevel::Reviewing);

        let third = schedule(
            5,
            second.ease_factor,
            second.interval_days,
            second.repetitions,
            now(),
        );
        assert!(third.ease_factor > 2.5);
        assert_eq!(third.repetitions, 3);
        assert_eq!(
            third.interval_days,
            (6.0 * third.ease_factor).round() as u32
        );
        assert_eq!(third.interval_days, 17);
        assert_eq!(third.mastery, MasteryLevel::Reviewing);
    }

    #[test]
    fn third_review_at_ease_2_6() {
        let r = schedule(4, 2.6, 6, 2, now());
        [r.ease_factor].assert_approx_eq([2.6]);
        assert_eq!(r.interval_days, 16);
        assert_eq!(r.mastery, MasteryLevel::Reviewing);
    }

    #[test]
    fn lapse_from_mastered() {
        let r = schedule(1, 2.5, 40, 5, now());
        assert_eq!(r.repetitions, 0);
        assert_eq!(r.interval_days, 1);
        assert_eq!(r.mastery, MasteryLevel::Learning);
        [r.ease_factor].assert_approx_eq([1.96]);
    }

    #[test]
    fn lapse_always_resets() {
        for q in 0..3 {
            for (interval, reps) in [(0, 0), (1, 1), (6, 2), (120, 9)] {
                let r = schedule(q, 2.2, interval, reps, now());
                assert_eq!((r.repetitions, r.interval_days), (0, 1));
            }
        }
    }

    #[test]
    fn ease_delta_per_quality() {
        let deltas = (0..=5)
            .map(|q| schedule(q, 2.5, 0, 0, now()).ease_factor - 2.5)
            .collect::<Vec<_>>();
        deltas.assert_approx_eq([-0.8, -0.54, -0.32, -0.14, 0.0, 0.1]);
    }

    #[test]
    fn quality_is_clamped() {
        assert_eq!(schedule(9, 2.5, 6, 2, now()), schedule(5, 2.5, 6, 2, now()));
        assert_eq!(schedule(-4, 2.5, 6, 2, now()), schedule(0, 2.5, 6, 2, now()));
    }

    #[test]
    fn missing_ease_uses_initial() {
        for ease in [0.0, -1.5, f64::NAN] {
            assert_eq!(
                schedule(4, ease, 0, 0, now()).ease_factor,
                schedule(4, INITIAL_EASE, 0, 0, now()).ease_factor
            );
        }
    }

    #[test]
    fn ease_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let quality = rng.random_range(-2..=7);
            let ease = rng.random_range(-5.0..10.0);
            let interval = rng.random_range(0..=400);
            let reps = rng.random_range(0..=20);
            let r = schedule(quality, ease, interval, reps, now());
            assert!((MIN_EASE..=MAX_EASE).contains(&r.ease_factor), "{r:?}");
            assert!(r.interval_days >= 1);
            assert!(r.next_review_at > now());
        }
    }

    #[test]
    fn interval_floor_of_one_day() {
        // a corrupted zero interval on a long streak must not schedule "now"
        let r = schedule(3, 1.3, 0, 7, now());
        assert_eq!(r.interval_days, 1);
        assert_eq!(r.repetitions, 8);
    }

    #[test]
    fn intervals_grow_on_success_streak() {
        for quality in [4, 5] {
            let scheduler = Scheduler::sm2();
            let mut state = scheduler.initial_state();
            let mut intervals = vec![];
            for day in 0..10 {
                state = scheduler.review_with_quality(
                    &state,
                    quality,
                    Some(now() + TimeDelta::days(day)),
                );
                intervals.push(state.interval_days);
            }
            assert_eq!(intervals[..2], [1, 6]);
            assert!(intervals[1..].windows(2).all(|w| w[1] > w[0]), "{intervals:?}");
        }
    }

    #[test]
    fn review_updates_state() {
        let scheduler = Scheduler::new(SchedulerConfig::default(), FixedClock(now())).unwrap();
        let state = scheduler.review(
            &ItemSchedulingState::new(),
            ReviewOutcome::new(true, 500),
            None,
        );
        assert_eq!(state.last_quality, Some(5));
        assert_eq!(state.last_reviewed_at, Some(now()));
        assert_eq!(state.repetition_count, 1);
        assert_eq!(state.next_review_at(), Some(now() + TimeDelta::days(1)));
        assert_eq!(state.mastery_level(), MasteryLevel::Learning);

        let state = scheduler.review(&state, ReviewOutcome::new(false, 3000), None);
        assert_eq!(state.last_quality, Some(0));
        assert_eq!(state.repetition_count, 0);
        assert_eq!(state.mastery_level(), MasteryLevel::Learning);
    }

    #[test]
    fn omitted_reference_uses_clock() {
        let scheduler = Scheduler::new(SchedulerConfig::default(), FixedClock(now())).unwrap();
        let r = scheduler.schedule(4, 2.5, 6, 2, None);
        assert_eq!(
            r.next_review_at,
            now() + TimeDelta::days(r.interval_days as i64)
        );
    }

    #[test]
    fn non_utc_reference_is_normalized() {
        let seoul = chrono_tz::Asia::Seoul
            .with_ymd_and_hms(2025, 6, 1, 17, 0, 0)
            .unwrap();
        let r = schedule(5, 2.5, 0, 0, seoul.with_timezone(&Utc));
        assert_eq!(r.next_review_at, now() + TimeDelta::days(1));
    }

    #[test]
    fn custom_config() {
        let config = SchedulerConfig {
            max_ease: 2.5,
            second_interval: 4,
            lapse_interval: 2,
            ..Default::default()
        };
        let scheduler = Scheduler::new(config, FixedClock(now())).unwrap();
        let r = scheduler.schedule(5, 2.5, 1, 1, None);
        assert_eq!((r.interval_days, r.ease_factor), (4, 2.5));
        let r = scheduler.schedule(2, 2.5, 4, 2, None);
        assert_eq!((r.interval_days, r.repetitions), (2, 0));
        assert!(Scheduler::new(
            SchedulerConfig {
                initial_ease: 3.0,
                ..config
            },
            FixedClock(now())
        )
        .is_err());
    }

    #[test]
    fn oversized_interval_is_capped() {
        let r = schedule(5, 3.5, 100_000_000, 5, now());
        assert_eq!(r.interval_days, MAX_INTERVAL);
        assert_eq!(r.next_review_at, now() + TimeDelta::days(MAX_INTERVAL as i64));
        let r = schedule(4, 2.5, u32::MAX, u32::MAX, now());
        assert_eq!((r.interval_days, r.repetitions), (MAX_INTERVAL, u32::MAX));
    }

    #[test]
    fn due_date_saturates_near_the_end_of_time() {
        let late = DateTime::<Utc>::MAX_UTC - TimeDelta::days(3);
        let r = schedule(5, 2.5, 6, 2, late);
        assert_eq!(r.interval_days, 16);
        assert_eq!(r.next_review_at, DateTime::<Utc>::MAX_UTC);

        let scheduler = Scheduler::new(
            SchedulerConfig {
                max_interval: u32::MAX,
                ..Default::default()
            },
            FixedClock(now()),
        )
        .unwrap();
        let r = scheduler.schedule(5, 3.5, u32::MAX, 5, None);
        assert_eq!(r.interval_days, u32::MAX);
        assert_eq!(r.next_review_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn custom_thresholds_apply_everywhere() {
        let config = SchedulerConfig {
            mastery: MasteryThresholds {
                reviewing_days: 10,
                ..Default::default()
            },
            ..Default::default()
        };
        let scheduler = Scheduler::new(config, FixedClock(now())).unwrap();
        let state = ItemSchedulingState {
            ease_factor: 2.6,
            interval_days: 1,
            repetition_count: 1,
            last_quality: Some(5),
            last_reviewed_at: Some(now()),
        };
        let r = scheduler.schedule(5, 2.6, 1, 1, None);
        let next = scheduler.review_with_quality(&state, 5, None);
        assert_eq!(next.interval_days, 6);
        assert_eq!(r.mastery, MasteryLevel::Learning);
        assert_eq!(scheduler.mastery_of(&next), r.mastery);
        assert_eq!(next.mastery_level(), MasteryLevel::Reviewing);
        assert_eq!(scheduler.mastery_of(&ItemSchedulingState::new()), MasteryLevel::New);
    }
}
