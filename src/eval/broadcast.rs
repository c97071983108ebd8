//! Loop broadcasting: run a per-index operation across the longest input
//! loop, then transpose the per-index rows back into per-port loops.

use crate::effects::EffectRequest;
use crate::value::{lengthened_loops, longest_loop_length, Value, ValueLoop};

use super::{ComputedNodeState, EvalResult, ImpureOpResult};

/// Evaluate a pure operation at every loop index. `op` maps one lane of
/// input values to one lane of output values; all lanes must produce the
/// same number of outputs.
pub fn looped_eval<F>(inputs: &[ValueLoop], op: F) -> Vec<ValueLoop>
where
    F: Fn(&[&Value]) -> Vec<Value>,
{
    let length = longest_loop_length(inputs);
    let inputs = lengthened_loops(inputs, length);

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(length);
    for index in 0..length {
        let lane: Vec<&Value> = inputs.iter().map(|l| l.at(index)).collect();
        rows.push(op(&lane));
    }
    transpose(rows)
}

/// Evaluate an impure operation at every loop index. Each lane receives the
/// lengthened inputs followed by the node's previous output values for that
/// lane, plus a mutable per-index state. The state vector is resized to the
/// loop length first: surplus entries are dropped, missing ones start
/// fresh.
pub fn looped_eval_impure<F>(
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    mut op: F,
) -> EvalResult
where
    F: FnMut(&[&Value], &mut ComputedNodeState, usize) -> ImpureOpResult,
{
    let length = longest_loop_length(inputs);
    let inputs = lengthened_loops(inputs, length);
    ephemeral.resize_with(length, ComputedNodeState::default);

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(length);
    let mut run_again = false;
    let mut effects: Vec<EffectRequest> = Vec::new();

    for index in 0..length {
        let mut lane: Vec<&Value> = inputs.iter().map(|l| l.at(index)).collect();
        lane.extend(previous_outputs.iter().map(|l| l.at(index)));

        let result = op(&lane, &mut ephemeral[index], index);
        run_again |= result.run_again;
        if let Some(effect) = result.effect {
            effects.push(effect);
        }
        rows.push(result.outputs);
    }

    EvalResult {
        outputs: transpose(rows),
        run_again,
        effects,
    }
}

/// Per-index rows of outputs into per-port loops.
fn transpose(rows: Vec<Vec<Value>>) -> Vec<ValueLoop> {
    let ports = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut loops: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); ports];
    for row in rows {
        debug_assert_eq!(row.len(), ports, "lanes produced uneven output counts");
        for (port, value) in row.into_iter().enumerate() {
            loops[port].push(value);
        }
    }
    loops.into_iter().map(ValueLoop::new).collect()
}

#[cfg(test)]
mod tests_broadcast {
    use super::*;

    fn numbers(values: &[f64]) -> ValueLoop {
        ValueLoop::new(values.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn pure_eval_broadcasts_by_holding_last() {
        let a = numbers(&[1.0, 3.0, 5.0]);
        let b = numbers(&[10.0]);
        let out = looped_eval(&[a, b], |lane| {
            let sum = lane
                .iter()
                .map(|v| crate::value::to_number(v))
                .sum::<f64>();
            vec![Value::Number(sum)]
        });
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].values(),
            &[Value::Number(11.0), Value::Number(13.0), Value::Number(15.0)]
        );
    }

    #[test]
    fn impure_eval_resizes_ephemeral_and_ors_run_again() {
        let mut ephemeral = vec![ComputedNodeState::default(); 5];
        let inputs = [numbers(&[1.0, 2.0])];
        let outputs = [numbers(&[0.0])];
        let result = looped_eval_impure(&inputs, &outputs, &mut ephemeral, |lane, _, index| {
            ImpureOpResult {
                outputs: vec![lane[0].clone()],
                run_again: index == 1,
                effect: None,
            }
        });
        assert_eq!(ephemeral.len(), 2);
        assert!(result.run_again);
        assert_eq!(result.outputs[0].len(), 2);
    }

    #[test]
    fn impure_lane_sees_previous_outputs() {
        let mut ephemeral = Vec::new();
        let inputs = [numbers(&[1.0])];
        let outputs = [numbers(&[42.0])];
        looped_eval_impure(&inputs, &outputs, &mut ephemeral, |lane, _, _| {
            assert_eq!(lane.len(), 2);
            assert_eq!(lane[1], &Value::Number(42.0));
            ImpureOpResult::just(vec![Value::Number(0.0)])
        });
    }
}
