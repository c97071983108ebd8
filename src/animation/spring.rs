//! Damped-spring simulation and the parameter converters that express
//! springs in designer-friendly terms (duration + bounce, response +
//! damping ratio, or bounciness + speed).

use std::f64::consts::PI;

/// Velocities below this, combined with positional convergence, end the
/// simulation.
pub(crate) const SPRING_VELOCITY_EPSILON: f64 = 0.005;

/// Mass is fixed at 1; stiffness and damping fully describe the spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        // A half-second, no-bounce spring.
        SpringParams::from_duration_and_bounce(0.5, 0.0)
    }
}

impl SpringParams {
    /// `duration` is the perceptual settling time; `bounce` in [-1, 1] where
    /// 0 is critically damped, positive underdamps, negative overdamps.
    pub fn from_duration_and_bounce(duration: f64, bounce: f64) -> Self {
        let duration = duration.max(1e-3);
        let stiffness = (2.0 * PI / duration).powi(2);
        let damping = if bounce >= 0.0 {
            (1.0 - bounce) * 4.0 * PI / duration
        } else {
            4.0 * PI / (duration * (1.0 + bounce).max(1e-3))
        };
        SpringParams { stiffness, damping }
    }

    /// `response` is the period of one oscillation; `damping_ratio` 1 is
    /// critically damped, below 1 underdamped.
    pub fn from_response_and_damping_ratio(response: f64, damping_ratio: f64) -> Self {
        let response = response.max(1e-3);
        let stiffness = (2.0 * PI / response).powi(2);
        let damping = 4.0 * PI * damping_ratio / response;
        SpringParams { stiffness, damping }
    }

    /// Pop-style parameters: `bounciness` and `speed` both nominally in
    /// [0, 20]. Converted through normalized projections onto the
    /// tension/friction ranges the fits below were calibrated against.
    pub fn from_bounciness_and_speed(bounciness: f64, speed: f64) -> Self {
        let b = project_normal(bounciness / 1.7, 0.0, 0.8);
        let s = project_normal(speed / 1.7, 0.5, 200.0);
        let tension = s;
        let friction = quadratic_out_interpolation(b, b3_no_bounce(tension), 0.01);
        // Pop tension/friction map onto stiffness/damping with a frame-rate
        // bias baked into its solver; fold that into the coefficients.
        SpringParams {
            stiffness: tension * 3.62 + 194.0,
            damping: friction * 3.0,
        }
    }
}

fn project_normal(n: f64, start: f64, end: f64) -> f64 {
    start + n * (end - start)
}

fn linear_interpolation(t: f64, start: f64, end: f64) -> f64 {
    t * end + (1.0 - t) * start
}

fn quadratic_out_interpolation(t: f64, start: f64, end: f64) -> f64 {
    linear_interpolation(2.0 * t - t * t, start, end)
}

fn b3_friction1(x: f64) -> f64 {
    0.0007 * x.powi(3) - 0.031 * x.powi(2) + 0.64 * x + 1.28
}

fn b3_friction2(x: f64) -> f64 {
    0.000044 * x.powi(3) - 0.006 * x.powi(2) + 0.36 * x + 2.0
}

fn b3_friction3(x: f64) -> f64 {
    0.00000045 * x.powi(3) - 0.000332 * x.powi(2) + 0.1078 * x + 5.84
}

fn b3_no_bounce(tension: f64) -> f64 {
    if tension <= 18.0 {
        b3_friction1(tension)
    } else if tension <= 44.0 {
        b3_friction2(tension)
    } else {
        b3_friction3(tension)
    }
}

/// One scalar spring integration, semi-implicit Euler at the frame rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringSim {
    pub position: f64,
    pub velocity: f64,
    pub goal: f64,
    pub active: bool,
}

impl SpringSim {
    pub fn begin(&mut self, position: f64, goal: f64) {
        self.position = position;
        self.goal = goal;
        self.active = true;
    }

    /// Advance one frame. Returns true while the spring is still moving.
    pub fn step(&mut self, params: SpringParams, fps: f64) -> bool {
        if !self.active {
            return false;
        }
        let dt = 1.0 / fps.max(1.0);
        let accel = params.stiffness * (self.goal - self.position) - params.damping * self.velocity;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;

        if self.velocity.abs() < SPRING_VELOCITY_EPSILON
            && round5(self.position) == round5(self.goal)
        {
            self.position = self.goal;
            self.velocity = 0.0;
            self.active = false;
        }
        self.active
    }
}

fn round5(n: f64) -> f64 {
    (n * 100_000.0).round() / 100_000.0
}
