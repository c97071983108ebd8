//! Shared machinery for stateful/animated node kinds: easing curves,
//! per-field interpolation state, spring physics, and momentum decay.

pub mod bezier;
pub mod curves;
pub mod momentum;
pub mod spring;

pub use curves::AnimationCurve;
pub use momentum::MomentumState;
pub use spring::{SpringParams, SpringSim};

/// Completion tolerance for animated scalars. Exact float equality would
/// oscillate forever on drift.
pub const ANIMATION_EPSILON: f64 = 1e-5;

pub fn are_equivalent(a: f64, b: f64) -> bool {
    (a - b).abs() < ANIMATION_EPSILON
}

/// One animated scalar field: where it started, where it is headed, and
/// how many frames it has been running. `frame_count == 0` means the field
/// has not stepped yet (Idle or just Reset).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationField {
    pub frame_count: u64,
    pub start: f64,
    pub goal: f64,
}

impl AnimationField {
    pub fn begin(start: f64, goal: f64) -> Self {
        Self {
            frame_count: 0,
            start,
            goal,
        }
    }
}

/// Advance one field of a duration/curve animation by one frame.
/// Returns the new output value; the field is finished once the output is
/// within [`ANIMATION_EPSILON`] of the goal or elapsed time passes the
/// duration.
pub fn step_field(
    field: &mut AnimationField,
    duration: f64,
    fps: f64,
    curve: AnimationCurve,
) -> f64 {
    field.frame_count += 1;
    let fps = if fps > 0.0 { fps } else { 60.0 };
    let elapsed = field.frame_count as f64 / fps;
    if duration <= 0.0 || elapsed >= duration {
        return field.goal;
    }
    curves::ease(curve, elapsed, field.start, field.goal - field.start, duration)
}

/// Linear return-to-start motion used by drag reset and scroll paging:
/// a fixed-speed glide whose duration scales with distance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearMotion {
    pub frame_count: u64,
    pub start: f64,
    pub end: f64,
}

/// Frames a [`LinearMotion`] takes, proportional to distance but bounded
/// so short hops still animate and long ones do not crawl.
pub(crate) const LINEAR_MOTION_FRAMERATE: f64 = 60.0;
pub(crate) const LINEAR_MOTION_SECONDS_PER_UNIT: f64 = 0.0008;
pub(crate) const LINEAR_MOTION_MIN_SECONDS: f64 = 0.1;
pub(crate) const LINEAR_MOTION_MAX_SECONDS: f64 = 0.5;

impl LinearMotion {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            frame_count: 0,
            start,
            end,
        }
    }

    fn duration(&self) -> f64 {
        let distance = (self.end - self.start).abs();
        (distance * LINEAR_MOTION_SECONDS_PER_UNIT)
            .clamp(LINEAR_MOTION_MIN_SECONDS, LINEAR_MOTION_MAX_SECONDS)
    }

    /// Step one frame; returns (output, finished).
    pub fn step(&mut self) -> (f64, bool) {
        self.frame_count += 1;
        let elapsed = self.frame_count as f64 / LINEAR_MOTION_FRAMERATE;
        let duration = self.duration();
        if elapsed >= duration || are_equivalent(self.start, self.end) {
            return (self.end, true);
        }
        let t = elapsed / duration;
        let out = self.start + (self.end - self.start) * t;
        (out, are_equivalent(out, self.end))
    }
}

/// Map a normalized progress value into `[start, end]`.
pub fn transition(progress: f64, start: f64, end: f64) -> f64 {
    start + progress * (end - start)
}

/// Inverse of [`transition`]: where `value` sits within `[start, end]`.
pub fn progress(value: f64, start: f64, end: f64) -> f64 {
    if end == start {
        0.0
    } else {
        (value - start) / (end - start)
    }
}
