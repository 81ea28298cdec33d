//! Human-like drag trajectory synthesis.
//!
//! A drag is generated as a small state machine:
//!
//! - **Moving:** draw a step size, a delay, and a vertical tremor; advance
//!   the pointer (clipped at the target) until the target is reached.
//! - **Settling:** hold the pointer at the target for a fixed number of
//!   points while time keeps advancing.
//! - **Done.**
//!
//! Every step moves at least one pixel, so the motion phase ends after at
//! most `ceil(target / step_min)` points.

use rand::Rng;
use slidetrack_challenge_model::{TrackPhase, TrackPoint, Trajectory};
use slidetrack_common::{Bounds, TrackConfig};

/// Drag trajectory generator.
pub struct TrackSynthesizer {
    config: TrackConfig,
}

/// Ranges in effect for one drag, after time-budget scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub step_px: Bounds<u32>,
    pub delay_ms: Bounds<u64>,
    pub jitter_px: Bounds<i32>,
    pub settle_delay_ms: Bounds<u64>,
    pub settle_points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SynthState {
    Moving,
    Settling { remaining: usize },
    Done,
}

/// Lazily generated drag, yielding each point with its phase.
pub struct TrackSteps<'r, R: Rng> {
    plan: StepPlan,
    rng: &'r mut R,
    target: u32,
    x: u32,
    t: u64,
    state: SynthState,
}

impl TrackSynthesizer {
    pub fn new(config: TrackConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(TrackConfig::default())
    }

    /// Scale factor applied to motion delays for a given time budget.
    ///
    /// The budget is advisory: it stretches or compresses the delay range
    /// relative to `reference_budget_ms` but does not fix the end time.
    /// Inverted or NaN bounds are repaired rather than trusted.
    pub fn budget_scale(&self, total_time_budget_ms: u64) -> f64 {
        let (lo, hi) = scale_bounds(self.config.min_budget_scale, self.config.max_budget_scale);
        let reference = self.config.reference_budget_ms.max(1) as f64;
        (total_time_budget_ms as f64 / reference).clamp(lo, hi)
    }

    /// Resolve the ranges for one drag.
    ///
    /// Minimum step and delays are floored at 1 so the motion phase always
    /// terminates and time strictly increases.
    pub fn plan(&self, total_time_budget_ms: u64) -> StepPlan {
        let scale = self.budget_scale(total_time_budget_ms);
        let delay_min = ((self.config.delay_ms.min as f64 * scale).round() as u64).max(1);
        let delay_max = ((self.config.delay_ms.max as f64 * scale).round() as u64).max(delay_min);

        StepPlan {
            step_px: floored(self.config.step_px),
            delay_ms: Bounds::new(delay_min, delay_max),
            jitter_px: Bounds::new(
                self.config.jitter_px.min,
                self.config.jitter_px.max.max(self.config.jitter_px.min),
            ),
            settle_delay_ms: floored(self.config.settle_delay_ms),
            settle_points: self.config.settle_points,
        }
    }

    /// Iterate the drag point by point.
    pub fn steps<'r, R: Rng>(
        &self,
        target_distance: u32,
        total_time_budget_ms: u64,
        rng: &'r mut R,
    ) -> TrackSteps<'r, R> {
        TrackSteps {
            plan: self.plan(total_time_budget_ms),
            rng,
            target: target_distance,
            x: 0,
            t: 0,
            state: SynthState::Moving,
        }
    }

    /// Generate a full drag of `target_distance` pixels.
    ///
    /// The same `rng` state always yields the same trajectory.
    pub fn synthesize<R: Rng>(
        &self,
        target_distance: u32,
        total_time_budget_ms: u64,
        rng: &mut R,
    ) -> Trajectory {
        let plan = self.plan(total_time_budget_ms);
        let mean_step = (plan.step_px.min as usize + plan.step_px.max as usize) / 2;
        let capacity = target_distance as usize / mean_step.max(1) + plan.settle_points + 1;

        let mut trajectory = Trajectory::with_capacity(capacity);
        for (phase, point) in self.steps(target_distance, total_time_budget_ms, rng) {
            trajectory.push(phase, point);
        }

        tracing::debug!(
            target_distance,
            total_time_budget_ms,
            motion_points = trajectory.motion().len(),
            settle_points = trajectory.settle().len(),
            duration_ms = trajectory.duration_ms(),
            "Synthesized drag trajectory"
        );
        trajectory
    }
}

/// Positive, ordered clamp range for the budget scale.
fn scale_bounds(min: f64, max: f64) -> (f64, f64) {
    let lo = if min.is_nan() {
        1.0
    } else {
        min.max(f64::MIN_POSITIVE)
    };
    let hi = if max.is_nan() { lo.max(1.0) } else { max.max(lo) };
    (lo, hi)
}

fn floored<T: From<u8> + Ord + Copy>(bounds: Bounds<T>) -> Bounds<T> {
    let min = bounds.min.max(T::from(1));
    Bounds::new(min, bounds.max.max(min))
}

impl<R: Rng> Iterator for TrackSteps<'_, R> {
    type Item = (TrackPhase, TrackPoint);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                SynthState::Moving if self.x >= self.target => {
                    self.state = SynthState::Settling {
                        remaining: self.plan.settle_points,
                    };
                }
                SynthState::Moving => {
                    let step = self
                        .rng
                        .random_range(self.plan.step_px.min..=self.plan.step_px.max);
                    let delay = self
                        .rng
                        .random_range(self.plan.delay_ms.min..=self.plan.delay_ms.max);
                    let jitter = self
                        .rng
                        .random_range(self.plan.jitter_px.min..=self.plan.jitter_px.max);

                    self.x = self.x.saturating_add(step).min(self.target);
                    self.t = self.t.saturating_add(delay);
                    return Some((TrackPhase::Motion, TrackPoint::new(self.x, jitter, self.t)));
                }
                SynthState::Settling { remaining: 0 } => {
                    self.state = SynthState::Done;
                }
                SynthState::Settling { remaining } => {
                    let delay = self.rng.random_range(
                        self.plan.settle_delay_ms.min..=self.plan.settle_delay_ms.max,
                    );
                    self.t = self.t.saturating_add(delay);
                    self.state = SynthState::Settling {
                        remaining: remaining - 1,
                    };
                    return Some((TrackPhase::Settle, TrackPoint::new(self.target, 0, self.t)));
                }
                SynthState::Done => return None,
            }
        }
    }
}
