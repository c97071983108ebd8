//! Cubic bezier evaluation and the WebKit-style solver that maps
//! time-progress to progress-along-curve for two control points (the first
//! and last points are implicitly (0,0) and (1,1)).

/// One bezier coordinate at parameter `t` for control values n0..n3.
pub fn cubic_bezier_n(t: f64, n0: f64, n1: f64, n2: f64, n3: f64) -> f64 {
    (1.0 - t).powi(3) * n0
        + 3.0 * (1.0 - t).powi(2) * t * n1
        + 3.0 * (1.0 - t) * t.powi(2) * n2
        + t.powi(3) * n3
}

/// The longer the animation, the more precision the solve needs to avoid
/// visible discontinuities.
fn solve_epsilon(duration: f64) -> f64 {
    1.0 / (200.0 * duration.max(1e-6))
}

/// y-progress along the unit bezier at x-progress `x`, for an animation of
/// `duration` seconds.
pub fn unit_bezier(p1x: f64, p1y: f64, p2x: f64, p2y: f64, x: f64, duration: f64) -> f64 {
    let cx = 3.0 * p1x;
    let bx = 3.0 * (p2x - p1x) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * p1y;
    let by = 3.0 * (p2y - p1y) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |t: f64| ((ax * t + bx) * t + cx) * t;
    let sample_y = |t: f64| ((ay * t + by) * t + cy) * t;
    let sample_dx = |t: f64| (3.0 * ax * t + 2.0 * bx) * t + cx;

    let epsilon = solve_epsilon(duration);

    // Newton's method first.
    let mut t = x;
    for _ in 0..8 {
        let x2 = sample_x(t) - x;
        if x2.abs() < epsilon {
            return sample_y(t);
        }
        let d = sample_dx(t);
        if d.abs() < 1e-6 {
            break;
        }
        t -= x2 / d;
    }

    // Fall back to bisection, guaranteed monotone on [0, 1].
    let mut t0 = 0.0;
    let mut t1 = 1.0;
    t = x.clamp(t0, t1);
    while t0 < t1 {
        let x2 = sample_x(t);
        if (x2 - x).abs() < epsilon {
            return sample_y(t);
        }
        if x > x2 {
            t0 = t;
        } else {
            t1 = t;
        }
        t = (t1 - t0) / 2.0 + t0;
    }
    sample_y(t)
}

/// Progress outputs of a cubic-bezier animation step.
/// Returns (progress along curve mapped into start..end, the raw 2D point
/// on the curve mapped into start..end).
pub fn cubic_bezier_progress(
    start: f64,
    end: f64,
    cp1: (f64, f64),
    cp2: (f64, f64),
    duration: f64,
    step: f64,
) -> (f64, (f64, f64)) {
    let x = super::transition(cubic_bezier_n(step, 0.0, cp1.0, cp2.0, 1.0), start, end);
    let y = super::transition(cubic_bezier_n(step, 0.0, cp1.1, cp2.1, 1.0), start, end);

    let along = unit_bezier(cp1.0, cp1.1, cp2.0, cp2.1, step, duration * 1000.0);
    let value = super::transition(along, start, end);

    (value, (x, y))
}

#[cfg(test)]
mod tests_bezier {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        assert!((cubic_bezier_n(0.0, 0.0, 0.4, 0.6, 1.0)).abs() < 1e-12);
        assert!((cubic_bezier_n(1.0, 0.0, 0.4, 0.6, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_control_points_solve_to_identity() {
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            let y = unit_bezier(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, x, 1.0);
            assert!((y - x).abs() < 1e-3, "x={x} y={y}");
        }
    }

    #[test]
    fn ease_in_out_is_slow_at_the_start() {
        let y = unit_bezier(0.42, 0.0, 0.58, 1.0, 0.1, 1.0);
        assert!(y < 0.1, "y={y}");
    }
}
