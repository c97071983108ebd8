//! Gesture-driven nodes. Each reads the pointer state the host pushed for
//! the layer named by its first input and turns it into positions,
//! velocities, and pulses. Drag and scroll keep moving after the finger
//! lifts (momentum, rubberband and reset glides, page snapping), so they
//! ask to run again until that motion settles.

use crate::animation::{LinearMotion, MomentumState};
use crate::eval::{looped_eval_impure, EvalContext, EvalResult, ImpureOpResult};
use crate::graph::should_pulse;
use crate::value::{
    to_bool, to_position, to_pulse, to_size, Position, ScrollMode, Size, Value, ValueKind,
    ValueLoop,
};

use super::{ComputedNodeState, NodeKind, RowDefinitions};

pub fn rows(kind: NodeKind) -> RowDefinitions {
    let defs = RowDefinitions::default();
    match kind {
        NodeKind::DragInteraction => defs
            .input("layer", Value::Layer(None), Some(ValueKind::Layer))
            .input("enabled", Value::Bool(true), Some(ValueKind::Bool))
            .input("momentum", Value::Bool(true), Some(ValueKind::Bool))
            .input("start", ValueKind::Position.default_value(), Some(ValueKind::Position))
            .input("reset", ValueKind::Pulse.default_value(), Some(ValueKind::Pulse))
            .input("clip", Value::Bool(false), Some(ValueKind::Bool))
            .input("min", ValueKind::Position.default_value(), Some(ValueKind::Position))
            .input("max", ValueKind::Position.default_value(), Some(ValueKind::Position))
            .output("position", ValueKind::Position.default_value())
            .output("velocity", ValueKind::Size.default_value())
            .output("translation", ValueKind::Size.default_value()),
        NodeKind::PressInteraction => defs
            .input("layer", Value::Layer(None), Some(ValueKind::Layer))
            .input("enabled", Value::Bool(true), Some(ValueKind::Bool))
            .output("down", Value::Bool(false))
            .output("tapped", ValueKind::Pulse.default_value())
            .output("doubleTapped", ValueKind::Pulse.default_value())
            .output("position", ValueKind::Position.default_value())
            .output("velocity", ValueKind::Size.default_value())
            .output("translation", ValueKind::Size.default_value()),
        NodeKind::ScrollInteraction => defs
            .input("layer", Value::Layer(None), Some(ValueKind::Layer))
            .input("scrollX", Value::Scroll(ScrollMode::Free), Some(ValueKind::Scroll))
            .input("scrollY", Value::Scroll(ScrollMode::Free), Some(ValueKind::Scroll))
            .input("contentSize", ValueKind::Size.default_value(), Some(ValueKind::Size))
            .input("pageSize", ValueKind::Size.default_value(), Some(ValueKind::Size))
            .output("position", ValueKind::Position.default_value()),
        _ => unreachable!("not an interaction kind"),
    }
}

pub fn evaluate(
    kind: NodeKind,
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    match kind {
        NodeKind::DragInteraction => drag(inputs, previous_outputs, ephemeral, ctx),
        NodeKind::PressInteraction => press(inputs, previous_outputs, ephemeral, ctx),
        NodeKind::ScrollInteraction => scroll(inputs, previous_outputs, ephemeral, ctx),
        _ => unreachable!("not an interaction kind"),
    }
}

fn drag(
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    let graph_time = ctx.step.graph_time;
    looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
        let interaction = ctx.interaction(lane[0].layer());
        let enabled = lane.get(1).map(|v| to_bool(v)).unwrap_or(true);
        let momentum_enabled = lane.get(2).map(|v| to_bool(v)).unwrap_or(true);
        let start = lane.get(3).map(|v| to_position(v)).unwrap_or_default();
        let reset = lane.get(4).map(|v| to_pulse(v)).unwrap_or(0.0);
        let clip = lane.get(5).map(|v| to_bool(v)).unwrap_or(false);
        let min = lane.get(6).map(|v| to_position(v)).unwrap_or_default();
        let max = lane.get(7).map(|v| to_position(v)).unwrap_or_default();
        let mut position = lane.get(8).map(|v| to_position(v)).unwrap_or_default();

        let clamp = |p: Position| -> Position {
            if clip {
                Position::new(
                    p.x.clamp(min.x.min(max.x), max.x.max(min.x)),
                    p.y.clamp(min.y.min(max.y), max.y.max(min.y)),
                )
            } else {
                p
            }
        };

        if !enabled {
            state.was_dragging = false;
            state.momentum = None;
            state.reset_motion = None;
            return ImpureOpResult::just(vec![
                Value::Position(position),
                Value::Size(Size::ZERO),
                Value::Size(Size::ZERO),
            ]);
        }

        if should_pulse(reset, graph_time) {
            state.momentum = None;
            state.was_dragging = false;
            if momentum_enabled {
                state.reset_motion = Some((
                    LinearMotion::new(position.x, start.x),
                    LinearMotion::new(position.y, start.y),
                ));
            } else {
                state.reset_motion = None;
                return ImpureOpResult::just(vec![
                    Value::Position(clamp(start)),
                    Value::Size(Size::ZERO),
                    Value::Size(Size::ZERO),
                ]);
            }
        }

        if let Some(interaction) = interaction.filter(|i| i.is_down) {
            if !state.was_dragging {
                state.was_dragging = true;
                state.drag_start = Some(position);
                state.momentum = None;
                state.reset_motion = None;
            }
            let origin = state.drag_start.unwrap_or(position);
            position = clamp(Position::new(
                origin.x + interaction.translation.width,
                origin.y + interaction.translation.height,
            ));
            return ImpureOpResult::just(vec![
                Value::Position(position),
                Value::Size(interaction.velocity),
                Value::Size(interaction.translation),
            ]);
        }

        // Pointer lifted this frame: hand the release velocity to momentum.
        if state.was_dragging {
            state.was_dragging = false;
            if momentum_enabled {
                let velocity = interaction.map(|i| i.velocity).unwrap_or(Size::ZERO);
                let mut momentum = MomentumState::default();
                if momentum.start(velocity.width, velocity.height) {
                    state.momentum = Some(momentum);
                }
            }
        }

        if let Some(momentum) = state.momentum.as_mut() {
            let ((dx, dy), finished) = momentum.run();
            position = clamp(Position::new(position.x + dx, position.y + dy));
            if finished {
                state.momentum = None;
            }
            return ImpureOpResult {
                outputs: vec![
                    Value::Position(position),
                    Value::Size(Size::ZERO),
                    Value::Size(Size::ZERO),
                ],
                run_again: !finished,
                effect: None,
            };
        }

        if let Some((x, y)) = state.reset_motion.as_mut() {
            let (out_x, done_x) = x.step();
            let (out_y, done_y) = y.step();
            position = clamp(Position::new(out_x, out_y));
            let finished = done_x && done_y;
            if finished {
                state.reset_motion = None;
            }
            return ImpureOpResult {
                outputs: vec![
                    Value::Position(position),
                    Value::Size(Size::ZERO),
                    Value::Size(Size::ZERO),
                ],
                run_again: !finished,
                effect: None,
            };
        }

        ImpureOpResult::just(vec![
            Value::Position(clamp(position)),
            Value::Size(Size::ZERO),
            Value::Size(Size::ZERO),
        ])
    })
}

fn press(
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    let graph_time = ctx.step.graph_time;
    looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, _, _| {
        let interaction = ctx.interaction(lane[0].layer());
        let enabled = lane.get(1).map(|v| to_bool(v)).unwrap_or(true);
        let previous_tapped = lane.get(3).map(|v| (*v).clone()).unwrap_or_default();
        let previous_double = lane.get(4).map(|v| (*v).clone()).unwrap_or_default();

        let Some(interaction) = interaction.filter(|_| enabled) else {
            return ImpureOpResult::just(vec![
                Value::Bool(false),
                previous_tapped,
                previous_double,
                Value::Position(Position::ZERO),
                Value::Size(Size::ZERO),
                Value::Size(Size::ZERO),
            ]);
        };

        let tapped = if interaction.tapped_at(graph_time) {
            Value::Pulse(graph_time)
        } else {
            previous_tapped
        };
        let double_tapped = if interaction.double_tapped_at(graph_time) {
            Value::Pulse(graph_time)
        } else {
            previous_double
        };
        ImpureOpResult::just(vec![
            Value::Bool(interaction.is_down),
            tapped,
            double_tapped,
            Value::Position(interaction.position),
            Value::Size(interaction.velocity),
            Value::Size(interaction.translation),
        ])
    })
}

/// Free-scroll offsets live in `[-extent, 0]`; an out-of-band position
/// yields the nearest edge to glide back to. A zero extent means the
/// content size is unset and the axis scrolls unbounded.
fn rubberband_target(value: f64, extent: f64) -> Option<f64> {
    if extent <= 0.0 {
        return None;
    }
    if value > 0.0 {
        Some(0.0)
    } else if value < -extent {
        Some(-extent)
    } else {
        None
    }
}

fn scroll(
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, state, _| {
        let interaction = ctx.interaction(lane[0].layer());
        let mode_x = lane.get(1).and_then(|v| v.scroll_mode()).unwrap_or_default();
        let mode_y = lane.get(2).and_then(|v| v.scroll_mode()).unwrap_or_default();
        let content = lane.get(3).map(|v| to_size(v)).unwrap_or_default();
        let page = lane.get(4).map(|v| to_size(v)).unwrap_or_default();
        let mut position = lane.get(5).map(|v| to_position(v)).unwrap_or_default();

        let page_x = if page.width > 0.0 { page.width } else { content.width };
        let page_y = if page.height > 0.0 { page.height } else { content.height };

        if let Some(interaction) = interaction.filter(|i| i.is_down) {
            if !state.was_dragging {
                state.was_dragging = true;
                state.drag_start = Some(position);
                state.momentum = None;
                state.reset_motion = None;
            }
            let origin = state.drag_start.unwrap_or(position);
            if mode_x != ScrollMode::Disabled {
                position.x = origin.x + interaction.translation.width;
            }
            if mode_y != ScrollMode::Disabled {
                position.y = origin.y + interaction.translation.height;
            }
            return ImpureOpResult::just(vec![Value::Position(position)]);
        }

        if state.was_dragging {
            state.was_dragging = false;
            let velocity = interaction.map(|i| i.velocity).unwrap_or(Size::ZERO);

            // Paging axes glide to the nearest page edge; free axes coast.
            let snap = |value: f64, page: f64| -> f64 {
                if page > 0.0 {
                    (value / page).round() * page
                } else {
                    value
                }
            };
            match (mode_x, mode_y) {
                (ScrollMode::Paging, _) | (_, ScrollMode::Paging) => {
                    let target_x = if mode_x == ScrollMode::Paging {
                        snap(position.x, page_x)
                    } else {
                        position.x
                    };
                    let target_y = if mode_y == ScrollMode::Paging {
                        snap(position.y, page_y)
                    } else {
                        position.y
                    };
                    state.reset_motion = Some((
                        LinearMotion::new(position.x, target_x),
                        LinearMotion::new(position.y, target_y),
                    ));
                }
                _ => {
                    let band_x = if mode_x == ScrollMode::Free {
                        rubberband_target(position.x, content.width)
                    } else {
                        None
                    };
                    let band_y = if mode_y == ScrollMode::Free {
                        rubberband_target(position.y, content.height)
                    } else {
                        None
                    };
                    if band_x.is_some() || band_y.is_some() {
                        state.reset_motion = Some((
                            LinearMotion::new(position.x, band_x.unwrap_or(position.x)),
                            LinearMotion::new(position.y, band_y.unwrap_or(position.y)),
                        ));
                    } else {
                        let vx = if mode_x == ScrollMode::Free { velocity.width } else { 0.0 };
                        let vy = if mode_y == ScrollMode::Free { velocity.height } else { 0.0 };
                        let mut momentum = MomentumState::default();
                        if momentum.start(vx, vy) {
                            state.momentum = Some(momentum);
                        }
                    }
                }
            }
        }

        if let Some(momentum) = state.momentum.as_mut() {
            let ((dx, dy), finished) = momentum.run();
            position.x += dx;
            position.y += dy;
            if finished {
                state.momentum = None;
                // Coasting can overshoot the content edge; glide back.
                let band_x = if mode_x == ScrollMode::Free {
                    rubberband_target(position.x, content.width)
                } else {
                    None
                };
                let band_y = if mode_y == ScrollMode::Free {
                    rubberband_target(position.y, content.height)
                } else {
                    None
                };
                if band_x.is_some() || band_y.is_some() {
                    state.reset_motion = Some((
                        LinearMotion::new(position.x, band_x.unwrap_or(position.x)),
                        LinearMotion::new(position.y, band_y.unwrap_or(position.y)),
                    ));
                    return ImpureOpResult {
                        outputs: vec![Value::Position(position)],
                        run_again: true,
                        effect: None,
                    };
                }
            }
            return ImpureOpResult {
                outputs: vec![Value::Position(position)],
                run_again: !finished,
                effect: None,
            };
        }

        if let Some((x, y)) = state.reset_motion.as_mut() {
            let (out_x, done_x) = x.step();
            let (out_y, done_y) = y.step();
            position = Position::new(out_x, out_y);
            let finished = done_x && done_y;
            if finished {
                state.reset_motion = None;
            }
            return ImpureOpResult {
                outputs: vec![Value::Position(position)],
                run_again: !finished,
                effect: None,
            };
        }

        ImpureOpResult::just(vec![Value::Position(position)])
    })
}

#[cfg(test)]
mod tests_interaction_nodes {
    use super::*;
    use crate::graph::GraphStepState;
    use crate::interaction::InteractionState;
    use crate::value::LayerId;
    use std::collections::HashMap;

    fn drag_inputs(layer: LayerId, momentum: bool, reset: f64) -> Vec<ValueLoop> {
        vec![
            ValueLoop::from_value(Value::Layer(Some(layer))),
            ValueLoop::from_value(Value::Bool(true)),
            ValueLoop::from_value(Value::Bool(momentum)),
            ValueLoop::from_value(Value::Position(Position::new(5.0, 5.0))),
            ValueLoop::from_value(Value::Pulse(reset)),
            ValueLoop::from_value(Value::Bool(false)),
            ValueLoop::from_value(ValueKind::Position.default_value()),
            ValueLoop::from_value(ValueKind::Position.default_value()),
        ]
    }

    fn held_outputs(position: Position) -> Vec<ValueLoop> {
        vec![
            ValueLoop::from_value(Value::Position(position)),
            ValueLoop::from_value(Value::Size(Size::ZERO)),
            ValueLoop::from_value(Value::Size(Size::ZERO)),
        ]
    }

    #[test]
    fn drag_follows_translation_from_drag_start() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let mut interactions = HashMap::new();
        interactions.insert(
            layer,
            InteractionState {
                is_down: true,
                translation: Size::new(12.0, -4.0),
                velocity: Size::new(100.0, 0.0),
                ..InteractionState::default()
            },
        );
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let inputs = drag_inputs(layer, true, 0.0);
        let held = held_outputs(Position::new(30.0, 40.0));
        let mut ephemeral = Vec::new();
        let result = drag(&inputs, &held, &mut ephemeral, &ctx);
        assert_eq!(
            result.outputs[0].first(),
            &Value::Position(Position::new(42.0, 36.0))
        );
        assert_eq!(
            result.outputs[2].first(),
            &Value::Size(Size::new(12.0, -4.0))
        );
        assert!(!result.run_again);
    }

    #[test]
    fn reset_without_momentum_jumps_to_start() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let interactions = HashMap::new();
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        // Reset pulse stamped with the current graph time fires this frame.
        let inputs = drag_inputs(layer, false, step.graph_time);
        let held = held_outputs(Position::new(80.0, 80.0));
        let mut ephemeral = Vec::new();
        let result = drag(&inputs, &held, &mut ephemeral, &ctx);
        assert_eq!(
            result.outputs[0].first(),
            &Value::Position(Position::new(5.0, 5.0))
        );
        assert!(!result.run_again);
    }

    #[test]
    fn reset_with_momentum_glides_back_to_start() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let interactions = HashMap::new();
        let inputs = drag_inputs(layer, true, step.graph_time);
        let mut ephemeral = Vec::new();

        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let mut held = held_outputs(Position::new(80.0, 80.0));
        let mut result = drag(&inputs, &held, &mut ephemeral, &ctx);
        assert!(result.run_again);

        // Subsequent frames (pulse no longer matching) keep gliding until
        // the motion lands exactly on start.
        let later_inputs = drag_inputs(layer, true, step.graph_time);
        let mut frames = 0;
        while result.run_again {
            step.advance(1.0 / 60.0);
            held = held_outputs(result.outputs[0].first().position().unwrap());
            let ctx = EvalContext {
                step: &step,
                interactions: &interactions,
            };
            result = drag(&later_inputs, &held, &mut ephemeral, &ctx);
            frames += 1;
            assert!(frames < 200, "reset glide never finished");
        }
        assert_eq!(
            result.outputs[0].first(),
            &Value::Position(Position::new(5.0, 5.0))
        );
    }

    #[test]
    fn release_with_momentum_keeps_moving() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let mut interactions = HashMap::new();
        interactions.insert(
            layer,
            InteractionState {
                is_down: true,
                translation: Size::new(50.0, 0.0),
                velocity: Size::new(600.0, 0.0),
                ..InteractionState::default()
            },
        );
        let inputs = drag_inputs(layer, true, 0.0);
        let mut ephemeral = Vec::new();
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let result = drag(&inputs, &held_outputs(Position::ZERO), &mut ephemeral, &ctx);
        let dragged_to = result.outputs[0].first().position().unwrap();

        // Finger lifts, velocity preserved in the interaction snapshot.
        step.advance(1.0 / 60.0);
        let mut lifted = interactions.get(&layer).unwrap().clone();
        lifted.is_down = false;
        let mut interactions = HashMap::new();
        interactions.insert(layer, lifted);
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let result = drag(&inputs, &held_outputs(dragged_to), &mut ephemeral, &ctx);
        let coasted_to = result.outputs[0].first().position().unwrap();
        assert!(coasted_to.x > dragged_to.x);
        assert!(result.run_again);
    }

    #[test]
    fn press_reports_down_and_tap_pulse() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let mut interactions = HashMap::new();
        interactions.insert(
            layer,
            InteractionState {
                is_down: false,
                first_press_ended: Some(step.graph_time),
                position: Position::new(3.0, 4.0),
                ..InteractionState::default()
            },
        );
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let inputs = vec![
            ValueLoop::from_value(Value::Layer(Some(layer))),
            ValueLoop::from_value(Value::Bool(true)),
        ];
        let held = vec![
            ValueLoop::from_value(Value::Bool(false)),
            ValueLoop::from_value(Value::Pulse(0.0)),
            ValueLoop::from_value(Value::Pulse(0.0)),
            ValueLoop::from_value(ValueKind::Position.default_value()),
            ValueLoop::from_value(ValueKind::Size.default_value()),
            ValueLoop::from_value(ValueKind::Size.default_value()),
        ];
        let mut ephemeral = Vec::new();
        let result = press(&inputs, &held, &mut ephemeral, &ctx);
        assert_eq!(result.outputs[0].first(), &Value::Bool(false));
        assert_eq!(result.outputs[1].first(), &Value::Pulse(step.graph_time));
        assert_eq!(
            result.outputs[3].first(),
            &Value::Position(Position::new(3.0, 4.0))
        );
    }

    #[test]
    fn scroll_free_release_beyond_content_rubberbands_to_the_edge() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let inputs = vec![
            ValueLoop::from_value(Value::Layer(Some(layer))),
            ValueLoop::from_value(Value::Scroll(ScrollMode::Free)),
            ValueLoop::from_value(Value::Scroll(ScrollMode::Free)),
            ValueLoop::from_value(Value::Size(Size::new(100.0, 100.0))),
            ValueLoop::from_value(ValueKind::Size.default_value()),
        ];

        // Drag far past the left content edge.
        let mut interactions = HashMap::new();
        interactions.insert(
            layer,
            InteractionState {
                is_down: true,
                translation: Size::new(-5000.0, 0.0),
                ..InteractionState::default()
            },
        );
        let mut ephemeral = Vec::new();
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let held = vec![ValueLoop::from_value(ValueKind::Position.default_value())];
        let result = scroll(&inputs, &held, &mut ephemeral, &ctx);
        assert_eq!(
            result.outputs[0].first(),
            &Value::Position(Position::new(-5000.0, 0.0))
        );

        // Release with no velocity: the position glides back to -content.
        let mut interactions = HashMap::new();
        interactions.insert(layer, InteractionState::default());
        let mut position = Position::new(-5000.0, 0.0);
        let mut frames = 0;
        loop {
            step.advance(1.0 / 60.0);
            let ctx = EvalContext {
                step: &step,
                interactions: &interactions,
            };
            let held = vec![ValueLoop::from_value(Value::Position(position))];
            let result = scroll(&inputs, &held, &mut ephemeral, &ctx);
            position = result.outputs[0].first().position().unwrap();
            frames += 1;
            if !result.run_again {
                break;
            }
            assert!(frames < 240, "rubberband glide never finished");
        }
        assert_eq!(position, Position::new(-100.0, 0.0));
    }

    #[test]
    fn scroll_paging_snaps_to_page_multiple() {
        let layer = LayerId::new();
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let mut interactions = HashMap::new();
        interactions.insert(
            layer,
            InteractionState {
                is_down: true,
                translation: Size::new(-170.0, 0.0),
                ..InteractionState::default()
            },
        );
        let inputs = vec![
            ValueLoop::from_value(Value::Layer(Some(layer))),
            ValueLoop::from_value(Value::Scroll(ScrollMode::Paging)),
            ValueLoop::from_value(Value::Scroll(ScrollMode::Disabled)),
            ValueLoop::from_value(Value::Size(Size::new(400.0, 700.0))),
            ValueLoop::from_value(Value::Size(Size::new(200.0, 0.0))),
        ];
        let mut ephemeral = Vec::new();
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let held = vec![ValueLoop::from_value(ValueKind::Position.default_value())];
        let result = scroll(&inputs, &held, &mut ephemeral, &ctx);
        assert_eq!(
            result.outputs[0].first(),
            &Value::Position(Position::new(-170.0, 0.0))
        );

        // Release: glide to the nearest multiple of the page width.
        let mut interactions = HashMap::new();
        interactions.insert(layer, InteractionState::default());
        let mut position = Position::new(-170.0, 0.0);
        let mut frames = 0;
        loop {
            step.advance(1.0 / 60.0);
            let ctx = EvalContext {
                step: &step,
                interactions: &interactions,
            };
            let held = vec![ValueLoop::from_value(Value::Position(position))];
            let result = scroll(&inputs, &held, &mut ephemeral, &ctx);
            position = result.outputs[0].first().position().unwrap();
            frames += 1;
            if !result.run_again {
                break;
            }
            assert!(frames < 200, "paging glide never finished");
        }
        assert_eq!(position, Position::new(-200.0, 0.0));
    }
}
