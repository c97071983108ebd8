//! Momentum (inertial scrolling) decay used by the drag interaction when
//! momentum is enabled and the pointer lifts with velocity.

/// Amplitudes below this are treated as stopped.
pub(crate) const AMPLITUDE_MINIMUM: f64 = 0.001;

/// Decay time constant; tuned for a 60fps feel.
pub(crate) const TIME_CONSTANT: f64 = 1.0 + 70.0 / 6.0;

/// Hard cap on steps so tiny residual amplitudes cannot run forever.
pub(crate) const END_STEP_COUNT: f64 = 6.0 * TIME_CONSTANT;

/// How strongly release velocity is damped when converted into an amplitude.
pub(crate) const VELOCITY_DAMP: f64 = 8.0;

/// Velocities below this do not start momentum at all.
pub(crate) const START_VELOCITY_MINIMUM: f64 = 20.0;

/// 2D momentum decay, stepped once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MomentumState {
    pub did_start: bool,
    pub amplitude_x: f64,
    pub amplitude_y: f64,
    pub step_count: f64,
}

impl MomentumState {
    /// Begin a momentum phase from the release velocity. Returns false when
    /// the release was too slow to warrant momentum.
    pub fn start(&mut self, velocity_x: f64, velocity_y: f64) -> bool {
        if velocity_x.abs() < START_VELOCITY_MINIMUM && velocity_y.abs() < START_VELOCITY_MINIMUM {
            return false;
        }
        self.did_start = true;
        self.amplitude_x = velocity_x / VELOCITY_DAMP;
        self.amplitude_y = velocity_y / VELOCITY_DAMP;
        self.step_count = 0.0;
        true
    }

    /// One frame of decay. Returns the (dx, dy) to add to the position and
    /// whether the momentum phase has finished.
    pub fn run(&mut self) -> ((f64, f64), bool) {
        let delta_x = self.amplitude_x / TIME_CONSTANT;
        let delta_y = self.amplitude_y / TIME_CONSTANT;
        self.amplitude_x -= delta_x;
        self.amplitude_y -= delta_y;
        self.step_count += 1.0;

        let finished = self.step_count > END_STEP_COUNT
            || (self.amplitude_x.abs() < AMPLITUDE_MINIMUM
                && self.amplitude_y.abs() < AMPLITUDE_MINIMUM);
        if finished {
            self.reset();
        }
        ((delta_x, delta_y), finished)
    }

    pub fn reset(&mut self) {
        *self = MomentumState::default();
    }
}
