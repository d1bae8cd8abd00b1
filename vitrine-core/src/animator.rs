//! Time-based tween animator for moving the stage to a target offset

use serde::Serialize;
use std::f32::consts::PI;
use std::time::{Duration, Instant};

use crate::constants::animation::MAX_DISTANCE_FACTOR;

/// Curve for tick-driven transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Half cosine; the fallback easing when the host has no transitions.
    #[default]
    Swing,
}

impl Easing {
    /// Progress at `t` in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::Swing => 0.5 - (t * PI).cos() / 2.0,
        }
    }
}

/// Stage move from `from` to `to`, started at `started_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Transition {
    pub from: f32,
    pub to: f32,
    pub started_at: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    /// Whether `duration` has elapsed by `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }

    /// Interpolated offset at `now`.
    pub fn offset_at(&self, now: Instant) -> f32 {
        if self.is_finished(now) || self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32())
            .clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

/// Offset to write on a tick, and whether the transition just ended.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Frame {
    pub offset: f32,
    pub finished: bool,
}

/// At most one running stage transition.
#[derive(Debug, Clone, Default)]
pub struct SnapAnimator {
    transition: Option<Transition>,
    easing: Easing,
}

impl SnapAnimator {
    /// Idle animator using `easing` for every transition.
    pub fn new(easing: Easing) -> Self {
        Self {
            transition: None,
            easing,
        }
    }

    /// A transition is running.
    pub fn is_active(&self) -> bool {
        self.transition.is_some()
    }

    /// The running transition.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Replaces any running transition.
    pub fn start(
        &mut self,
        from: f32,
        to: f32,
        duration_ms: u64,
        now: Instant,
    ) {
        self.transition = Some(Transition {
            from,
            to,
            started_at: now,
            duration: Duration::from_millis(duration_ms),
            easing: self.easing,
        });
    }

    /// Returns the next frame while animating, or None when inactive.
    /// A finished transition is cleared after its last frame.
    pub fn tick(&mut self, now: Instant) -> Option<Frame> {
        let transition = self.transition?;
        let finished = transition.is_finished(now);
        if finished {
            self.transition = None;
        }
        Some(Frame {
            offset: transition.offset_at(now),
            finished,
        })
    }

    /// Visual offset at `now` without advancing anything.
    pub fn offset_at(&self, now: Instant) -> Option<f32> {
        self.transition.map(|t| t.offset_at(now))
    }

    /// Drops the current transition, returning it.
    pub fn cancel(&mut self) -> Option<Transition> {
        self.transition.take()
    }
}

/// Transition length for a move between two positions.
///
/// A factor of `Some(0)` means immediate; `None` falls back to
/// `smart_speed`. Longer jumps scale the factor, up to six times; the
/// product saturates.
pub fn duration(
    from: isize,
    to: isize,
    factor: Option<u64>,
    smart_speed: u64,
) -> u64 {
    let factor = match factor {
        Some(0) => return 0,
        Some(factor) => factor,
        None => smart_speed,
    };
    let distance = (to - from).unsigned_abs() as u64;
    factor.saturating_mul(distance.clamp(1, MAX_DISTANCE_FACTOR))
}
