//! Locale-independent value formatting, shared by logging, the host UI,
//! and content-hashing consumers.

use super::{HttpMethod, ScrollMode, Value};

fn fmt_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

pub fn display(value: &Value) -> String {
    match value {
        Value::Number(n) => fmt_number(*n),
        Value::Bool(b) => b.to_string(),
        Value::Text(s) => s.clone(),
        Value::Position(p) => format!("({}, {})", fmt_number(p.x), fmt_number(p.y)),
        Value::Point3d(p) => format!(
            "({}, {}, {})",
            fmt_number(p.x),
            fmt_number(p.y),
            fmt_number(p.z)
        ),
        Value::Point4d(p) => format!(
            "({}, {}, {}, {})",
            fmt_number(p.x),
            fmt_number(p.y),
            fmt_number(p.z),
            fmt_number(p.w)
        ),
        Value::Size(s) => format!("{} x {}", fmt_number(s.width), fmt_number(s.height)),
        Value::Color(c) => format!(
            "rgba({}, {}, {}, {})",
            fmt_number(c.red),
            fmt_number(c.green),
            fmt_number(c.blue),
            fmt_number(c.alpha)
        ),
        Value::Pulse(t) => format!("pulse@{}", fmt_number(*t)),
        Value::Json(j) => j.to_string(),
        Value::Curve(c) => format!("{c:?}"),
        Value::Method(HttpMethod::Get) => "GET".to_string(),
        Value::Method(HttpMethod::Post) => "POST".to_string(),
        Value::Scroll(ScrollMode::Free) => "free".to_string(),
        Value::Scroll(ScrollMode::Paging) => "paging".to_string(),
        Value::Scroll(ScrollMode::Disabled) => "disabled".to_string(),
        Value::Layer(Some(id)) => id.0.to_string(),
        Value::Layer(None) => "none".to_string(),
        Value::Media(Some(m)) => m.key.clone(),
        Value::Media(None) => "none".to_string(),
    }
}

#[cfg(test)]
mod tests_display {
    use super::*;
    use crate::value::Position;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(display(&Value::Number(3.0)), "3");
        assert_eq!(display(&Value::Number(3.5)), "3.5");
    }

    #[test]
    fn positions_render_as_pairs() {
        assert_eq!(
            display(&Value::Position(Position::new(1.0, -2.0))),
            "(1, -2)"
        );
    }
}
