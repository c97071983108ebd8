//! Animated nodes: duration/curve interpolation, cubic beziers, and the
//! two spring flavors. All of them treat the node's current output as the
//! starting point of each step, so retargeting mid-flight is seamless.

use log::warn;

use crate::animation::{
    are_equivalent, bezier::cubic_bezier_progress, spring::SpringParams, step_field,
    AnimationCurve, AnimationField, SpringSim,
};
use crate::eval::{looped_eval_impure, EvalContext, EvalResult, ImpureOpResult};
use crate::value::{coerce, to_number, Value, ValueKind, ValueLoop};

use super::{ComputedNodeState, NodeKind, RowDefinitions};

pub fn rows(kind: NodeKind, value_kind: Option<ValueKind>) -> RowDefinitions {
    let animated_kind = animated_kind(value_kind);
    let animated_default = animated_kind.default_value();
    let defs = RowDefinitions::default();
    match kind {
        NodeKind::ClassicAnimation => defs
            .input("value", animated_default.clone(), Some(animated_kind))
            .input("duration", Value::Number(1.0), Some(ValueKind::Number))
            .input(
                "curve",
                Value::Curve(AnimationCurve::Linear),
                Some(ValueKind::Curve),
            )
            .output("value", animated_default),
        NodeKind::CubicBezierAnimation => defs
            .input("value", Value::Number(0.0), Some(ValueKind::Number))
            .input("duration", Value::Number(1.0), Some(ValueKind::Number))
            .input("firstControlPointX", Value::Number(0.17), Some(ValueKind::Number))
            .input("firstControlPointY", Value::Number(0.17), Some(ValueKind::Number))
            .input("secondControlPointX", Value::Number(0.0), Some(ValueKind::Number))
            .input("secondControlPointY", Value::Number(1.0), Some(ValueKind::Number))
            .output("value", Value::Number(0.0))
            .output("path", ValueKind::Position.default_value()),
        NodeKind::SpringAnimation => {
            let params = SpringParams::default();
            defs.input("value", animated_default.clone(), Some(animated_kind))
                .input("stiffness", Value::Number(params.stiffness), Some(ValueKind::Number))
                .input("damping", Value::Number(params.damping), Some(ValueKind::Number))
                .output("value", animated_default)
        }
        NodeKind::PopAnimation => defs
            .input("value", animated_default.clone(), Some(animated_kind))
            .input("bounciness", Value::Number(5.0), Some(ValueKind::Number))
            .input("speed", Value::Number(10.0), Some(ValueKind::Number))
            .output("value", animated_default),
        _ => unreachable!("not an animation kind"),
    }
}

fn animated_kind(value_kind: Option<ValueKind>) -> ValueKind {
    value_kind.unwrap_or(ValueKind::Number)
}

pub fn evaluate(
    kind: NodeKind,
    value_kind: Option<ValueKind>,
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    let animated = animated_kind(value_kind);
    if !animated.is_animatable() {
        warn!("animation node asked to animate {animated:?}; holding current outputs");
        return EvalResult::just(previous_outputs.to_vec());
    }
    let graph_time = ctx.step.graph_time;
    let fps = ctx.step.estimated_fps;

    match kind {
        NodeKind::ClassicAnimation => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                let goal_value = coerce(lane[0], animated, graph_time);
                let duration = lane.get(1).map(|v| to_number(v)).unwrap_or(1.0);
                let curve = lane
                    .get(2)
                    .and_then(|v| v.curve())
                    .unwrap_or(AnimationCurve::Linear);
                let current_value = lane
                    .get(3)
                    .map(|v| coerce(v, animated, graph_time))
                    .unwrap_or_else(|| animated.default_value());

                let goal = goal_value.fields().unwrap_or_default();
                let current = current_value.fields().unwrap_or_default();
                if fields_equivalent(&current, &goal) {
                    state.animation = None;
                    return ImpureOpResult::just(vec![goal_value]);
                }

                let fields = retargeted_fields(state, &current, &goal);
                let out: Vec<f64> = fields
                    .iter_mut()
                    .map(|field| step_field(field, duration, fps, curve))
                    .collect();
                ImpureOpResult {
                    outputs: vec![Value::from_fields(animated, &out)],
                    run_again: true,
                    effect: None,
                }
            })
        }
        NodeKind::CubicBezierAnimation => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                let goal = to_number(lane[0]);
                let duration = lane.get(1).map(|v| to_number(v)).unwrap_or(1.0).max(1e-3);
                let cp1 = (
                    lane.get(2).map(|v| to_number(v)).unwrap_or(0.17),
                    lane.get(3).map(|v| to_number(v)).unwrap_or(0.17),
                );
                let cp2 = (
                    lane.get(4).map(|v| to_number(v)).unwrap_or(0.0),
                    lane.get(5).map(|v| to_number(v)).unwrap_or(1.0),
                );
                let current = lane.get(6).map(|v| to_number(v)).unwrap_or(0.0);
                let previous_path = lane.get(7).map(|v| (*v).clone()).unwrap_or_default();

                if are_equivalent(current, goal) {
                    state.animation = None;
                    return ImpureOpResult::just(vec![Value::Number(goal), previous_path]);
                }

                let fields = retargeted_fields(state, &[current], &[goal]);
                let field = &mut fields[0];
                field.frame_count += 1;
                let t = (field.frame_count as f64 / (duration * fps.max(1.0))).min(1.0);
                if t >= 1.0 {
                    let path = Value::Position(crate::value::Position::new(goal, goal));
                    return ImpureOpResult {
                        outputs: vec![Value::Number(goal), path],
                        run_again: true,
                        effect: None,
                    };
                }
                let (value, (x, y)) =
                    cubic_bezier_progress(field.start, field.goal, cp1, cp2, duration, t);
                ImpureOpResult {
                    outputs: vec![
                        Value::Number(value),
                        Value::Position(crate::value::Position::new(x, y)),
                    ],
                    run_again: true,
                    effect: None,
                }
            })
        }
        NodeKind::SpringAnimation | NodeKind::PopAnimation => {
            looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
                let goal_value = coerce(lane[0], animated, graph_time);
                let params = if kind == NodeKind::SpringAnimation {
                    SpringParams {
                        stiffness: lane.get(1).map(|v| to_number(v)).unwrap_or(1.0).max(1e-6),
                        damping: lane.get(2).map(|v| to_number(v)).unwrap_or(0.0).max(0.0),
                    }
                } else {
                    let bounciness = lane.get(1).map(|v| to_number(v)).unwrap_or(5.0);
                    let speed = lane.get(2).map(|v| to_number(v)).unwrap_or(10.0);
                    SpringParams::from_bounciness_and_speed(bounciness, speed)
                };
                let current_value = lane
                    .get(3)
                    .map(|v| coerce(v, animated, graph_time))
                    .unwrap_or_else(|| animated.default_value());

                let goal = goal_value.fields().unwrap_or_default();
                let current = current_value.fields().unwrap_or_default();

                let springs = state
                    .springs
                    .get_or_insert_with(|| vec![SpringSim::default(); goal.len()]);
                springs.resize(goal.len(), SpringSim::default());

                let mut any_active = false;
                let mut out = Vec::with_capacity(goal.len());
                for ((sim, goal_field), current_field) in
                    springs.iter_mut().zip(&goal).zip(&current)
                {
                    if !sim.active {
                        if are_equivalent(*current_field, *goal_field) {
                            out.push(*goal_field);
                            continue;
                        }
                        sim.begin(*current_field, *goal_field);
                    } else if sim.goal != *goal_field {
                        // Retarget without resetting velocity.
                        sim.goal = *goal_field;
                    }
                    let active = sim.step(params, fps);
                    any_active |= active;
                    out.push(sim.position);
                }
                if !any_active {
                    state.springs = None;
                }
                ImpureOpResult {
                    outputs: vec![Value::from_fields(animated, &out)],
                    run_again: any_active,
                    effect: None,
                }
            })
        }
        _ => unreachable!("not an animation kind"),
    }
}

fn fields_equivalent(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| are_equivalent(*x, *y))
}

/// Fetch the per-field animation state, restarting any field whose goal
/// moved since the last frame.
fn retargeted_fields<'a>(
    state: &'a mut ComputedNodeState,
    current: &[f64],
    goal: &[f64],
) -> &'a mut Vec<AnimationField> {
    let fields = state.animation.get_or_insert_with(Vec::new);
    if fields.len() != goal.len() {
        *fields = current
            .iter()
            .zip(goal)
            .map(|(c, g)| AnimationField::begin(*c, *g))
            .collect();
        return fields;
    }
    for (i, field) in fields.iter_mut().enumerate() {
        if !are_equivalent(field.goal, goal[i]) {
            *field = AnimationField::begin(current[i], goal[i]);
        }
    }
    fields
}
