//! Total conversions between value kinds. `coerce` never fails: where no
//! semantic conversion exists it falls back to the target kind's default.

use super::{HttpMethod, Point3d, Point4d, Position, Rgba, ScrollMode, Size, Value, ValueKind};

pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Text(s) => s.trim().parse().unwrap_or(0.0),
        Value::Position(p) => p.x,
        Value::Point3d(p) => p.x,
        Value::Point4d(p) => p.x,
        Value::Size(s) => s.width,
        Value::Color(c) => c.red,
        Value::Pulse(t) => *t,
        Value::Json(j) => j.as_f64().unwrap_or(0.0),
        Value::Curve(_) | Value::Method(_) | Value::Scroll(_) | Value::Layer(_)
        | Value::Media(_) => 0.0,
    }
}

pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        Value::Text(s) => !s.is_empty(),
        Value::Pulse(t) => *t != 0.0,
        Value::Json(j) => j.as_bool().unwrap_or(!j.is_null()),
        Value::Layer(id) => id.is_some(),
        Value::Media(m) => m.is_some(),
        _ => to_number(value) != 0.0,
    }
}

pub fn to_text(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        other => super::display::display(other),
    }
}

pub fn to_position(value: &Value) -> Position {
    match value {
        Value::Position(p) => *p,
        Value::Size(s) => Position::new(s.width, s.height),
        Value::Point3d(p) => Position::new(p.x, p.y),
        Value::Point4d(p) => Position::new(p.x, p.y),
        Value::Number(n) => Position::new(*n, *n),
        Value::Bool(_) | Value::Text(_) => {
            let n = to_number(value);
            Position::new(n, n)
        }
        _ => Position::ZERO,
    }
}

pub fn to_size(value: &Value) -> Size {
    match value {
        Value::Size(s) => *s,
        Value::Position(p) => Size::new(p.x, p.y),
        Value::Number(n) => Size::new(*n, *n),
        _ => {
            let p = to_position(value);
            Size::new(p.x, p.y)
        }
    }
}

fn to_point3d(value: &Value) -> Point3d {
    match value {
        Value::Point3d(p) => *p,
        Value::Point4d(p) => Point3d {
            x: p.x,
            y: p.y,
            z: p.z,
        },
        Value::Position(p) => Point3d {
            x: p.x,
            y: p.y,
            z: 0.0,
        },
        Value::Number(n) => Point3d {
            x: *n,
            y: *n,
            z: *n,
        },
        _ => Point3d::default(),
    }
}

fn to_point4d(value: &Value) -> Point4d {
    match value {
        Value::Point4d(p) => *p,
        Value::Point3d(p) => Point4d {
            x: p.x,
            y: p.y,
            z: p.z,
            w: 0.0,
        },
        Value::Color(c) => Point4d {
            x: c.red,
            y: c.green,
            z: c.blue,
            w: c.alpha,
        },
        Value::Number(n) => Point4d {
            x: *n,
            y: *n,
            z: *n,
            w: *n,
        },
        _ => Point4d::default(),
    }
}

fn to_color(value: &Value) -> Rgba {
    match value {
        Value::Color(c) => *c,
        Value::Point4d(p) => Rgba {
            red: p.x.clamp(0.0, 1.0),
            green: p.y.clamp(0.0, 1.0),
            blue: p.z.clamp(0.0, 1.0),
            alpha: p.w.clamp(0.0, 1.0),
        },
        Value::Number(n) => {
            let v = n.clamp(0.0, 1.0);
            Rgba {
                red: v,
                green: v,
                blue: v,
                alpha: 1.0,
            }
        }
        _ => Rgba::default(),
    }
}

pub fn to_pulse(value: &Value) -> f64 {
    match value {
        Value::Pulse(t) => *t,
        Value::Number(n) => *n,
        _ => 0.0,
    }
}

pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Json(j) => j.clone(),
        Value::Text(s) => {
            serde_json::from_str(s).unwrap_or_else(|_| serde_json::Value::String(s.clone()))
        }
        Value::Number(n) => serde_json::json!(n),
        Value::Bool(b) => serde_json::json!(b),
        Value::Position(p) => serde_json::json!({ "x": p.x, "y": p.y }),
        Value::Size(s) => serde_json::json!({ "width": s.width, "height": s.height }),
        _ => serde_json::json!({}),
    }
}

/// Convert `value` to `kind`. Total: every pair of kinds produces a value
/// of the target kind. `graph_time` is needed for coercions into Pulse: a
/// truthy value becomes a pulse firing right now.
pub fn coerce(value: &Value, kind: ValueKind, graph_time: f64) -> Value {
    if value.kind() == kind {
        return value.clone();
    }
    match kind {
        ValueKind::Number => Value::Number(to_number(value)),
        ValueKind::Bool => Value::Bool(to_bool(value)),
        ValueKind::Text => Value::Text(to_text(value)),
        ValueKind::Position => Value::Position(to_position(value)),
        ValueKind::Point3d => Value::Point3d(to_point3d(value)),
        ValueKind::Point4d => Value::Point4d(to_point4d(value)),
        ValueKind::Size => Value::Size(to_size(value)),
        ValueKind::Color => Value::Color(to_color(value)),
        ValueKind::Pulse => {
            if to_bool(value) {
                Value::Pulse(graph_time)
            } else {
                Value::Pulse(0.0)
            }
        }
        ValueKind::Json => Value::Json(to_json(value)),
        ValueKind::Curve => match value {
            Value::Curve(c) => Value::Curve(*c),
            _ => ValueKind::Curve.default_value(),
        },
        ValueKind::Method => match value {
            Value::Method(m) => Value::Method(*m),
            Value::Text(s) if s.eq_ignore_ascii_case("post") => Value::Method(HttpMethod::Post),
            Value::Text(s) if s.eq_ignore_ascii_case("get") => Value::Method(HttpMethod::Get),
            _ => ValueKind::Method.default_value(),
        },
        ValueKind::Scroll => match value {
            Value::Scroll(m) => Value::Scroll(*m),
            Value::Bool(false) => Value::Scroll(ScrollMode::Disabled),
            _ => ValueKind::Scroll.default_value(),
        },
        ValueKind::Layer => match value {
            Value::Layer(id) => Value::Layer(*id),
            _ => Value::Layer(None),
        },
        ValueKind::Media => match value {
            Value::Media(m) => Value::Media(m.clone()),
            _ => Value::Media(None),
        },
    }
}

#[cfg(test)]
mod tests_coercion {
    use super::*;

    #[test]
    fn coercion_is_identity_on_matching_kind() {
        let values = [
            Value::Number(4.25),
            Value::Bool(true),
            Value::Text("hello".into()),
            Value::Position(Position::new(1.0, 2.0)),
            Value::Json(serde_json::json!({"key": 5})),
            Value::Pulse(3.0),
        ];
        for v in values {
            assert_eq!(coerce(&v, v.kind(), 9.0), v);
        }
    }

    #[test]
    fn number_text_round_trip() {
        let v = Value::Number(7.5);
        let text = coerce(&v, ValueKind::Text, 0.0);
        assert_eq!(coerce(&text, ValueKind::Number, 0.0), v);
    }

    #[test]
    fn unrelated_kinds_fall_back_to_target_default() {
        let media = coerce(&Value::Number(12.0), ValueKind::Media, 0.0);
        assert_eq!(media, Value::Media(None));
        let curve = coerce(&Value::Bool(true), ValueKind::Curve, 0.0);
        assert_eq!(curve, ValueKind::Curve.default_value());
    }

    #[test]
    fn truthy_number_coerces_to_pulse_at_current_time() {
        assert_eq!(coerce(&Value::Number(1.0), ValueKind::Pulse, 4.5), Value::Pulse(4.5));
        assert_eq!(coerce(&Value::Number(0.0), ValueKind::Pulse, 4.5), Value::Pulse(0.0));
    }
}
