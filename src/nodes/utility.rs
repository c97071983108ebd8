//! Grab-bag family: value plumbing (Splitter, OptionPicker, pack/unpack),
//! spring parameter converters, and the clock-driven kinds (Time, pulses,
//! Random, Delay, Smoothing).

use rand::Rng;

use crate::animation::{are_equivalent, spring::SpringParams, transition};
use crate::eval::{looped_eval, looped_eval_impure, EvalContext, EvalResult, ImpureOpResult};
use crate::graph::should_pulse;
use crate::value::{coerce, to_number, to_position, to_pulse, to_size, Value, ValueKind, ValueLoop};

use super::{ComputedNodeState, NodeKind, RowDefinitions};

/// Choice rows an OptionPicker exposes.
const OPTION_PICKER_ARITY: usize = 3;

pub fn rows(kind: NodeKind, value_kind: Option<ValueKind>) -> RowDefinitions {
    let kind_default = value_kind.map(|k| k.default_value()).unwrap_or_default();
    let defs = RowDefinitions::default();
    match kind {
        NodeKind::Splitter => defs
            .input("value", kind_default.clone(), value_kind)
            .output("value", kind_default),
        NodeKind::Transition => defs
            .input("progress", Value::Number(0.0), Some(ValueKind::Number))
            .input("start", kind_default.clone(), value_kind)
            .input("end", kind_default.clone(), value_kind)
            .output("value", kind_default),
        NodeKind::OptionPicker => {
            let mut defs = defs.input("option", Value::Number(0.0), Some(ValueKind::Number));
            for _ in 0..OPTION_PICKER_ARITY {
                defs = defs.input("value", kind_default.clone(), value_kind);
            }
            defs.output("value", kind_default)
        }
        NodeKind::PackPosition => defs
            .input("x", Value::Number(0.0), Some(ValueKind::Number))
            .input("y", Value::Number(0.0), Some(ValueKind::Number))
            .output("position", ValueKind::Position.default_value()),
        NodeKind::UnpackPosition => defs
            .input("position", ValueKind::Position.default_value(), Some(ValueKind::Position))
            .output("x", Value::Number(0.0))
            .output("y", Value::Number(0.0)),
        NodeKind::PackSize => defs
            .input("width", Value::Number(0.0), Some(ValueKind::Number))
            .input("height", Value::Number(0.0), Some(ValueKind::Number))
            .output("size", ValueKind::Size.default_value()),
        NodeKind::UnpackSize => defs
            .input("size", ValueKind::Size.default_value(), Some(ValueKind::Size))
            .output("width", Value::Number(0.0))
            .output("height", Value::Number(0.0)),
        NodeKind::SpringFromDurationAndBounce => defs
            .input("duration", Value::Number(1.0), Some(ValueKind::Number))
            .input("bounce", Value::Number(0.5), Some(ValueKind::Number))
            .output("stiffness", Value::Number(0.0))
            .output("damping", Value::Number(0.0)),
        NodeKind::SpringFromResponseAndDampingRatio => defs
            .input("response", Value::Number(1.0), Some(ValueKind::Number))
            .input("dampingRatio", Value::Number(0.5), Some(ValueKind::Number))
            .output("stiffness", Value::Number(0.0))
            .output("damping", Value::Number(0.0)),
        NodeKind::Time => defs
            .output("time", Value::Number(0.0))
            .output("frame", Value::Number(0.0)),
        NodeKind::RepeatingPulse => defs
            .input("frequency", Value::Number(1.0), Some(ValueKind::Number))
            .output("pulse", ValueKind::Pulse.default_value()),
        NodeKind::Pulse => defs
            .input("on", Value::Bool(false), Some(ValueKind::Bool))
            .output("turnedOn", ValueKind::Pulse.default_value())
            .output("turnedOff", ValueKind::Pulse.default_value()),
        NodeKind::Random => defs
            .input("retrigger", ValueKind::Pulse.default_value(), Some(ValueKind::Pulse))
            .input("start", Value::Number(0.0), Some(ValueKind::Number))
            .input("end", Value::Number(1.0), Some(ValueKind::Number))
            .output("value", Value::Number(0.0)),
        NodeKind::Delay => defs
            .input("value", kind_default.clone(), value_kind)
            .input("delay", Value::Number(1.0), Some(ValueKind::Number))
            .output("value", kind_default),
        NodeKind::Smoothing => defs
            .input("value", Value::Number(0.0), Some(ValueKind::Number))
            .input("hysteresis", Value::Number(0.4), Some(ValueKind::Number))
            .output("value", Value::Number(0.0)),
        _ => unreachable!("not a utility kind"),
    }
}

pub fn evaluate(
    kind: NodeKind,
    value_kind: Option<ValueKind>,
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    let graph_time = ctx.step.graph_time;
    match kind {
        NodeKind::Splitter => EvalResult::just(looped_eval(inputs, |lane| {
            let value = lane.first().map(|v| (*v).clone()).unwrap_or_default();
            match value_kind {
                Some(kind) => vec![coerce(&value, kind, graph_time)],
                None => vec![value],
            }
        })),
        NodeKind::Transition => EvalResult::just(looped_eval(inputs, |lane| {
            let progress = lane.first().map(|v| to_number(v)).unwrap_or(0.0);
            let start = lane.get(1).copied().cloned().unwrap_or_default();
            let end = lane.get(2).copied().cloned().unwrap_or_default();
            vec![transition_value(progress, &start, &end)]
        })),
        NodeKind::OptionPicker => EvalResult::just(looped_eval(inputs, |lane| {
            let choices = lane.len().saturating_sub(1).max(1);
            let option = lane
                .first()
                .map(|v| to_number(v))
                .unwrap_or(0.0)
                .clamp(0.0, (choices - 1) as f64) as usize;
            vec![lane.get(1 + option).map(|v| (*v).clone()).unwrap_or_default()]
        })),
        NodeKind::PackPosition => EvalResult::just(looped_eval(inputs, |lane| {
            let x = lane.first().map(|v| to_number(v)).unwrap_or(0.0);
            let y = lane.get(1).map(|v| to_number(v)).unwrap_or(0.0);
            vec![Value::Position(crate::value::Position::new(x, y))]
        })),
        NodeKind::UnpackPosition => EvalResult::just(looped_eval(inputs, |lane| {
            let p = lane.first().map(|v| to_position(v)).unwrap_or_default();
            vec![Value::Number(p.x), Value::Number(p.y)]
        })),
        NodeKind::PackSize => EvalResult::just(looped_eval(inputs, |lane| {
            let width = lane.first().map(|v| to_number(v)).unwrap_or(0.0);
            let height = lane.get(1).map(|v| to_number(v)).unwrap_or(0.0);
            vec![Value::Size(crate::value::Size { width, height })]
        })),
        NodeKind::UnpackSize => EvalResult::just(looped_eval(inputs, |lane| {
            let s = lane.first().map(|v| to_size(v)).unwrap_or_default();
            vec![Value::Number(s.width), Value::Number(s.height)]
        })),
        NodeKind::SpringFromDurationAndBounce => EvalResult::just(looped_eval(inputs, |lane| {
            let duration = lane.first().map(|v| to_number(v)).unwrap_or(1.0);
            let bounce = lane.get(1).map(|v| to_number(v)).unwrap_or(0.5);
            let params = SpringParams::from_duration_and_bounce(duration, bounce);
            vec![Value::Number(params.stiffness), Value::Number(params.damping)]
        })),
        NodeKind::SpringFromResponseAndDampingRatio => {
            EvalResult::just(looped_eval(inputs, |lane| {
                let response = lane.first().map(|v| to_number(v)).unwrap_or(1.0);
                let ratio = lane.get(1).map(|v| to_number(v)).unwrap_or(0.5);
                let params = SpringParams::from_response_and_damping_ratio(response, ratio);
                vec![Value::Number(params.stiffness), Value::Number(params.damping)]
            }))
        }
        NodeKind::Time => EvalResult {
            outputs: vec![
                ValueLoop::from_value(Value::Number(graph_time)),
                ValueLoop::from_value(Value::Number(ctx.step.graph_frame_count as f64)),
            ],
            run_again: true,
            effects: Vec::new(),
        },
        NodeKind::RepeatingPulse => {
            let mut result =
                looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                    let frequency = lane.first().map(|v| to_number(v)).unwrap_or(1.0);
                    let previous = lane.get(1).map(|v| (*v).clone()).unwrap_or_default();
                    if frequency > 0.0 && graph_time - state.last_pulse_time >= frequency {
                        state.last_pulse_time = graph_time;
                        ImpureOpResult::just(vec![Value::Pulse(graph_time)])
                    } else {
                        ImpureOpResult::just(vec![previous])
                    }
                });
            result.run_again = true;
            result
        }
        NodeKind::Pulse => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                let on = matches!(lane.first(), Some(Value::Bool(true)));
                let was_on = matches!(state.previous_value, Some(Value::Bool(true)));
                state.previous_value = Some(Value::Bool(on));

                let previous_on = lane.get(1).map(|v| (*v).clone()).unwrap_or_default();
                let previous_off = lane.get(2).map(|v| (*v).clone()).unwrap_or_default();
                let turned_on = if on && !was_on {
                    Value::Pulse(graph_time)
                } else {
                    previous_on
                };
                let turned_off = if !on && was_on {
                    Value::Pulse(graph_time)
                } else {
                    previous_off
                };
                ImpureOpResult::just(vec![turned_on, turned_off])
            })
        }
        NodeKind::Random => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                let retrigger = lane.first().map(|v| to_pulse(v)).unwrap_or(0.0);
                let start = lane.get(1).map(|v| to_number(v)).unwrap_or(0.0);
                let end = lane.get(2).map(|v| to_number(v)).unwrap_or(1.0);
                let previous = lane.get(3).map(|v| (*v).clone());

                let fresh = state.previous_value.is_none();
                if fresh || should_pulse(retrigger, graph_time) {
                    let (lo, hi) = (start.min(end), start.max(end));
                    let value = if lo == hi {
                        lo
                    } else {
                        rand::thread_rng().gen_range(lo..hi)
                    };
                    state.previous_value = Some(Value::Number(value));
                    ImpureOpResult::just(vec![Value::Number(value)])
                } else {
                    ImpureOpResult::just(vec![previous.unwrap_or_default()])
                }
            })
        }
        NodeKind::Delay => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                let value = lane.first().map(|v| (*v).clone()).unwrap_or_default();
                let delay = lane.get(1).map(|v| to_number(v)).unwrap_or(1.0).max(0.0);
                let held = lane.get(2).map(|v| (*v).clone()).unwrap_or_default();

                if state.previous_value.as_ref() != Some(&value) {
                    state.previous_value = Some(value.clone());
                    state.delay_queue.push_back((graph_time + delay, value));
                }

                let mut output = held;
                while let Some((due, _)) = state.delay_queue.front() {
                    if *due <= graph_time {
                        output = state.delay_queue.pop_front().map(|(_, v)| v).unwrap_or(output);
                    } else {
                        break;
                    }
                }
                ImpureOpResult {
                    outputs: vec![output],
                    run_again: !state.delay_queue.is_empty(),
                    effect: None,
                }
            })
        }
        NodeKind::Smoothing => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, _, _| {
                let target = lane.first().map(|v| to_number(v)).unwrap_or(0.0);
                let hysteresis = lane
                    .get(1)
                    .map(|v| to_number(v))
                    .unwrap_or(0.4)
                    .clamp(0.0, 1.0);
                let previous = lane.get(2).map(|v| to_number(v)).unwrap_or(0.0);

                let next = hysteresis * previous + (1.0 - hysteresis) * target;
                if are_equivalent(next, target) {
                    ImpureOpResult::just(vec![Value::Number(target)])
                } else {
                    ImpureOpResult {
                        outputs: vec![Value::Number(next)],
                        run_again: true,
                        effect: None,
                    }
                }
            })
        }
        _ => unreachable!("not a utility kind"),
    }
}

/// Per-field interpolation between two values of the same animatable kind;
/// non-animatable kinds step from start to end at progress 1.
fn transition_value(progress: f64, start: &Value, end: &Value) -> Value {
    match (start.fields(), end.fields()) {
        (Some(from), Some(to)) if start.kind() == end.kind() => {
            let fields: Vec<f64> = from
                .iter()
                .zip(&to)
                .map(|(a, b)| transition(progress, *a, *b))
                .collect();
            Value::from_fields(start.kind(), &fields)
        }
        _ => {
            if progress < 1.0 {
                start.clone()
            } else {
                end.clone()
            }
        }
    }
}
