//! Comparisons and boolean operators.

use crate::eval::{looped_eval, EvalResult};
use crate::value::{to_bool, to_number, Value, ValueKind, ValueLoop};

use super::{NodeKind, RowDefinitions};

pub fn rows(kind: NodeKind) -> RowDefinitions {
    let defs = RowDefinitions::default();
    match kind {
        NodeKind::Equals => defs
            .input("a", Value::Number(0.0), Some(ValueKind::Number))
            .input("b", Value::Number(0.0), Some(ValueKind::Number))
            .input("threshold", Value::Number(0.0), Some(ValueKind::Number))
            .output("equals", Value::Bool(false)),
        NodeKind::Not => defs
            .input("value", Value::Bool(false), Some(ValueKind::Bool))
            .output("result", Value::Bool(true)),
        NodeKind::And | NodeKind::Or => defs
            .input("a", Value::Bool(false), Some(ValueKind::Bool))
            .input("b", Value::Bool(false), Some(ValueKind::Bool))
            .output("result", Value::Bool(false)),
        _ => defs
            .input("a", Value::Number(0.0), Some(ValueKind::Number))
            .input("b", Value::Number(0.0), Some(ValueKind::Number))
            .output("result", Value::Bool(false)),
    }
}

pub fn evaluate(kind: NodeKind, inputs: &[ValueLoop]) -> EvalResult {
    let outputs = looped_eval(inputs, |lane| {
        let num = |i: usize| lane.get(i).map(|v| to_number(v)).unwrap_or(0.0);
        let flag = |i: usize| lane.get(i).map(|v| to_bool(v)).unwrap_or(false);
        let result = match kind {
            NodeKind::Equals => (num(0) - num(1)).abs() <= num(2),
            NodeKind::GreaterThan => num(0) > num(1),
            NodeKind::GreaterOrEqual => num(0) >= num(1),
            NodeKind::LessThan => num(0) < num(1),
            NodeKind::LessOrEqual => num(0) <= num(1),
            NodeKind::Not => !flag(0),
            NodeKind::And => flag(0) && flag(1),
            NodeKind::Or => flag(0) || flag(1),
            _ => unreachable!("not a logic kind"),
        };
        vec![Value::Bool(result)]
    });
    EvalResult::just(outputs)
}
