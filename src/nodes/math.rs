//! Arithmetic on numbers, broadcast across loops.

use crate::eval::{looped_eval, EvalResult};
use crate::value::{to_number, Value, ValueKind, ValueLoop};

use super::{NodeKind, RowDefinitions};

pub fn rows(kind: NodeKind) -> RowDefinitions {
    let defs = RowDefinitions::default();
    let defs = match kind {
        NodeKind::SquareRoot | NodeKind::Abs => {
            defs.input("value", Value::Number(0.0), Some(ValueKind::Number))
        }
        NodeKind::Round => defs
            .input("value", Value::Number(0.0), Some(ValueKind::Number))
            .input("places", Value::Number(0.0), Some(ValueKind::Number)),
        NodeKind::Clamp => defs
            .input("value", Value::Number(0.0), Some(ValueKind::Number))
            .input("min", Value::Number(0.0), Some(ValueKind::Number))
            .input("max", Value::Number(1.0), Some(ValueKind::Number)),
        _ => defs
            .input("a", Value::Number(0.0), Some(ValueKind::Number))
            .input("b", Value::Number(0.0), Some(ValueKind::Number)),
    };
    defs.output("result", Value::Number(0.0))
}

pub fn evaluate(kind: NodeKind, inputs: &[ValueLoop]) -> EvalResult {
    let outputs = looped_eval(inputs, |lane| {
        let arg = |i: usize| lane.get(i).map(|v| to_number(v)).unwrap_or(0.0);
        let result = match kind {
            NodeKind::Add => arg(0) + arg(1),
            NodeKind::Subtract => arg(0) - arg(1),
            NodeKind::Multiply => arg(0) * arg(1),
            NodeKind::Divide => {
                let divisor = arg(1);
                if divisor == 0.0 {
                    0.0
                } else {
                    arg(0) / divisor
                }
            }
            NodeKind::Mod => {
                let divisor = arg(1);
                if divisor == 0.0 {
                    0.0
                } else {
                    arg(0).rem_euclid(divisor)
                }
            }
            NodeKind::Power => arg(0).powf(arg(1)),
            NodeKind::SquareRoot => arg(0).max(0.0).sqrt(),
            NodeKind::Abs => arg(0).abs(),
            NodeKind::Round => {
                let factor = 10_f64.powi(arg(1).max(0.0) as i32);
                (arg(0) * factor).round() / factor
            }
            NodeKind::Min => arg(0).min(arg(1)),
            NodeKind::Max => arg(0).max(arg(1)),
            NodeKind::Clamp => {
                let (min, max) = (arg(1), arg(2));
                arg(0).clamp(min.min(max), max.max(min))
            }
            _ => unreachable!("not a math kind"),
        };
        vec![Value::Number(result)]
    });
    EvalResult::just(outputs)
}
