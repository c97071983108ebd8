//! Classic easing formulae in t/b/c/d form: t = current time, b = start
//! value, c = change in value, d = duration.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AnimationCurve {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    SinusoidalIn,
    SinusoidalOut,
    SinusoidalInOut,
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
}

pub fn ease(curve: AnimationCurve, t: f64, b: f64, c: f64, d: f64) -> f64 {
    match curve {
        AnimationCurve::Linear => linear(t, b, c, d),
        AnimationCurve::QuadraticIn => quadratic_in(t, b, c, d),
        AnimationCurve::QuadraticOut => quadratic_out(t, b, c, d),
        AnimationCurve::QuadraticInOut => quadratic_in_out(t, b, c, d),
        AnimationCurve::SinusoidalIn => sinusoidal_in(t, b, c, d),
        AnimationCurve::SinusoidalOut => sinusoidal_out(t, b, c, d),
        AnimationCurve::SinusoidalInOut => sinusoidal_in_out(t, b, c, d),
        AnimationCurve::ExponentialIn => exponential_in(t, b, c, d),
        AnimationCurve::ExponentialOut => exponential_out(t, b, c, d),
        AnimationCurve::ExponentialInOut => exponential_in_out(t, b, c, d),
    }
}

fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

fn quadratic_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

fn quadratic_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

fn quadratic_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    t -= 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

fn sinusoidal_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c * (t / d * std::f64::consts::FRAC_PI_2).cos() + c + b
}

fn sinusoidal_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (t / d * std::f64::consts::FRAC_PI_2).sin() + b
}

fn sinusoidal_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((std::f64::consts::PI * t / d).cos() - 1.0) + b
}

fn exponential_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
}

fn exponential_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
}

fn exponential_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
    }
    t -= 1.0;
    c / 2.0 * (-(2f64.powf(-10.0 * t)) + 2.0) + b
}
