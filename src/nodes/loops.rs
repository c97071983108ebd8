//! Whole-loop operators. Unlike the broadcast families these consume and
//! produce entire loops, so they bypass `looped_eval`.

use crate::eval::EvalResult;
use crate::value::{to_number, Value, ValueKind, ValueLoop};

use super::{NodeKind, RowDefinitions};

/// How many literal rows a LoopBuilder exposes.
const LOOP_BUILDER_ARITY: usize = 5;

pub fn rows(kind: NodeKind, value_kind: Option<ValueKind>) -> RowDefinitions {
    let kind_default = value_kind.map(|k| k.default_value()).unwrap_or_default();
    let defs = RowDefinitions::default();
    match kind {
        NodeKind::LoopIndices => defs
            .input("count", Value::Number(3.0), Some(ValueKind::Number))
            .output("index", Value::Number(0.0)),
        NodeKind::LoopBuilder => {
            let mut defs = defs;
            for _ in 0..LOOP_BUILDER_ARITY {
                defs = defs.input("value", kind_default.clone(), value_kind);
            }
            defs.output("index", Value::Number(0.0))
                .output("loop", kind_default)
        }
        NodeKind::LoopSelect => defs
            .input("loop", kind_default.clone(), value_kind)
            .input("index", Value::Number(0.0), Some(ValueKind::Number))
            .output("loop", kind_default)
            .output("index", Value::Number(0.0)),
        NodeKind::LoopReverse => defs
            .input("loop", kind_default.clone(), value_kind)
            .output("loop", kind_default),
        _ => unreachable!("not a loop kind"),
    }
}

pub fn evaluate(kind: NodeKind, inputs: &[ValueLoop]) -> EvalResult {
    let outputs = match kind {
        NodeKind::LoopIndices => {
            let count = inputs
                .first()
                .map(|l| to_number(l.first()))
                .unwrap_or(0.0)
                .max(1.0) as usize;
            vec![ValueLoop::new(
                (0..count).map(|i| Value::Number(i as f64)).collect(),
            )]
        }
        NodeKind::LoopBuilder => {
            let values: Vec<Value> = inputs.iter().map(|l| l.first().clone()).collect();
            let indices = (0..values.len().max(1))
                .map(|i| Value::Number(i as f64))
                .collect();
            vec![ValueLoop::new(indices), ValueLoop::new(values)]
        }
        NodeKind::LoopSelect => {
            let source = inputs.first().cloned().unwrap_or_default();
            let indices = inputs.get(1).cloned().unwrap_or_default();
            let len = source.len() as i64;
            let selected: Vec<Value> = indices
                .iter()
                .map(|index| {
                    // Negative indices count back from the end.
                    let i = (to_number(index) as i64).rem_euclid(len) as usize;
                    source.at(i).clone()
                })
                .collect();
            let out_indices = (0..selected.len())
                .map(|i| Value::Number(i as f64))
                .collect();
            vec![ValueLoop::new(selected), ValueLoop::new(out_indices)]
        }
        NodeKind::LoopReverse => {
            let source = inputs.first().cloned().unwrap_or_default();
            let mut values: Vec<Value> = source.values().to_vec();
            values.reverse();
            vec![ValueLoop::new(values)]
        }
        _ => unreachable!("not a loop kind"),
    };
    EvalResult::just(outputs)
}
