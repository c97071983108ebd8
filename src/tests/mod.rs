//! End-to-end engine tests: build a graph, tick it, assert on outputs.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::effects::{NetworkRequest, NetworkResponse, NetworkTransport};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::graph::{Graph, InputCoordinate, NodeId, OutputCoordinate};
use crate::interaction::InteractionState;
use crate::nodes::NodeKind;
use crate::value::{LayerId, Position, ScrollMode, Size, Value, ValueKind, ValueLoop};

const FRAME: f64 = 1.0 / 60.0;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn out(node: NodeId) -> OutputCoordinate {
    OutputCoordinate { node, port: 0 }
}

fn input(node: NodeId, port: usize) -> InputCoordinate {
    InputCoordinate { node, port }
}

fn numbers(values: &[f64]) -> ValueLoop {
    ValueLoop::new(values.iter().map(|n| Value::Number(*n)).collect())
}

#[test]
fn add_node_sums_its_inputs() {
    init_logs();
    let mut engine = Engine::new(Graph::new());
    let add = engine.add_node(NodeKind::Add, None);
    engine.set_input(input(add, 0), numbers(&[3.0])).unwrap();
    engine.set_input(input(add, 1), numbers(&[4.0])).unwrap();

    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(add)).unwrap().values(),
        &[Value::Number(7.0)]
    );
}

#[test]
fn edges_propagate_in_dependency_order() {
    let mut engine = Engine::new(Graph::new());
    let a = engine.add_node(NodeKind::Add, None);
    let b = engine.add_node(NodeKind::Multiply, None);
    engine.set_input(input(a, 0), numbers(&[2.0])).unwrap();
    engine.set_input(input(a, 1), numbers(&[3.0])).unwrap();
    engine.connect(out(a), input(b, 0)).unwrap();
    engine.set_input(input(b, 1), numbers(&[10.0])).unwrap();

    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(b)).unwrap().values(),
        &[Value::Number(50.0)]
    );

    // Changing only the head re-runs the chain.
    engine.set_input(input(a, 0), numbers(&[8.0])).unwrap();
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.evaluated, vec![a, b]);
    assert_eq!(
        engine.output_values(out(b)).unwrap().values(),
        &[Value::Number(110.0)]
    );
}

#[test]
fn loops_broadcast_by_holding_the_last_value() {
    let mut engine = Engine::new(Graph::new());
    let add = engine.add_node(NodeKind::Add, None);
    engine
        .set_input(input(add, 0), numbers(&[1.0, 3.0, 5.0]))
        .unwrap();
    engine.set_input(input(add, 1), numbers(&[10.0, 20.0])).unwrap();

    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(add)).unwrap().values(),
        &[Value::Number(11.0), Value::Number(23.0), Value::Number(25.0)]
    );
}

#[test]
fn quiescent_graph_evaluates_nothing() {
    let mut engine = Engine::new(Graph::new());
    let add = engine.add_node(NodeKind::Add, None);
    engine.set_input(input(add, 0), numbers(&[1.0])).unwrap();

    engine.tick(FRAME).unwrap();
    let report = engine.tick(FRAME).unwrap();
    assert!(report.evaluated.is_empty());
}

#[test]
fn time_node_runs_every_frame() {
    let mut engine = Engine::new(Graph::new());
    let time = engine.add_node(NodeKind::Time, None);

    engine.tick(FRAME).unwrap();
    engine.tick(FRAME).unwrap();
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.evaluated, vec![time]);
    assert_eq!(
        engine.output_values(out(time)).unwrap().first(),
        &Value::Number(3.0 * FRAME)
    );
}

#[test]
fn classic_animation_settles_then_stops_scheduling() {
    let mut engine = Engine::new(Graph::new());
    let anim = engine.add_node(NodeKind::ClassicAnimation, None);
    engine.set_input(input(anim, 0), numbers(&[10.0])).unwrap();
    engine.set_input(input(anim, 1), numbers(&[0.25])).unwrap();

    let mut frames = 0;
    loop {
        let report = engine.tick(FRAME).unwrap();
        if report.evaluated.is_empty() {
            break;
        }
        frames += 1;
        assert!(frames < 60, "animation never quiesced");
    }
    assert_eq!(
        engine.output_values(out(anim)).unwrap().first(),
        &Value::Number(10.0)
    );
}

#[test]
fn ephemeral_state_follows_loop_length() {
    let mut engine = Engine::new(Graph::new());
    let anim = engine.add_node(NodeKind::ClassicAnimation, None);
    engine
        .set_input(input(anim, 0), numbers(&[1.0, 2.0, 3.0]))
        .unwrap();
    engine.tick(FRAME).unwrap();
    assert_eq!(engine.graph.node(anim).unwrap().ephemeral.len(), 3);

    engine.set_input(input(anim, 0), numbers(&[1.0])).unwrap();
    engine.tick(FRAME).unwrap();
    assert_eq!(engine.graph.node(anim).unwrap().ephemeral.len(), 1);
}

#[test]
fn upstream_values_are_coerced_to_the_row_kind() {
    let mut engine = Engine::new(Graph::new());
    let source = engine.add_node(NodeKind::Add, None);
    engine.set_input(input(source, 0), numbers(&[4.0])).unwrap();
    let splitter = engine.add_node(NodeKind::Splitter, Some(ValueKind::Text));
    engine.connect(out(source), input(splitter, 0)).unwrap();

    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(splitter)).unwrap().first(),
        &Value::Text("4".into())
    );
}

#[test]
fn cycle_fails_the_tick() {
    let mut engine = Engine::new(Graph::new());
    let a = engine.add_node(NodeKind::Add, None);
    let b = engine.add_node(NodeKind::Add, None);
    engine.connect(out(a), input(b, 0)).unwrap();
    engine.connect(out(b), input(a, 0)).unwrap();

    let err = engine.tick(FRAME).unwrap_err();
    assert!(matches!(err, EngineError::CycleDetected(_)));
}

#[test]
fn pulse_input_fires_on_the_next_frame() {
    let mut engine = Engine::new(Graph::new());
    let random = engine.add_node(NodeKind::Random, None);
    engine.set_input(input(random, 1), numbers(&[5.0])).unwrap();
    engine.set_input(input(random, 2), numbers(&[5.0])).unwrap();

    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(random)).unwrap().first(),
        &Value::Number(5.0)
    );

    // Widen the range, then retrigger; the stamp matches the next frame.
    engine.set_input(input(random, 1), numbers(&[100.0])).unwrap();
    engine.set_input(input(random, 2), numbers(&[200.0])).unwrap();
    engine.tick(FRAME).unwrap();
    engine.pulse_input(input(random, 0));
    engine.tick(FRAME).unwrap();
    let value = engine
        .output_values(out(random))
        .unwrap()
        .first()
        .number()
        .unwrap();
    assert!((100.0..200.0).contains(&value));
}

#[test]
fn restart_rewinds_clock_outputs_and_state() {
    let mut engine = Engine::new(Graph::new());
    let time = engine.add_node(NodeKind::Time, None);
    let anim = engine.add_node(NodeKind::ClassicAnimation, None);
    engine.set_input(input(anim, 0), numbers(&[10.0])).unwrap();
    for _ in 0..5 {
        engine.tick(FRAME).unwrap();
    }
    assert!(!engine.graph.node(anim).unwrap().ephemeral.is_empty());

    engine.restart();
    assert_eq!(engine.step_state().graph_time, 0.0);
    assert!(engine.graph.node(anim).unwrap().ephemeral.is_empty());
    assert_eq!(
        engine.output_values(out(time)).unwrap().first(),
        &Value::Number(0.0)
    );
    assert_eq!(
        engine.output_values(out(anim)).unwrap().first(),
        &Value::Number(0.0)
    );

    // First tick after restart re-runs everything from scratch.
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.evaluated.len(), 2);
}

#[test]
fn drag_interaction_tracks_the_pointer_through_the_engine() {
    init_logs();
    let mut engine = Engine::new(Graph::new());
    let layer = LayerId::new();
    let drag = engine.add_node(NodeKind::DragInteraction, None);
    engine
        .set_input(
            input(drag, 0),
            ValueLoop::from_value(Value::Layer(Some(layer))),
        )
        .unwrap();
    engine.tick(FRAME).unwrap();

    engine.update_interaction(
        layer,
        InteractionState {
            is_down: true,
            translation: Size::new(25.0, 10.0),
            ..InteractionState::default()
        },
    );
    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(drag)).unwrap().first(),
        &Value::Position(Position::new(25.0, 10.0))
    );

    // Without new pointer state the node is not rescheduled.
    let report = engine.tick(FRAME).unwrap();
    assert!(report.evaluated.is_empty());
}

#[test]
fn scroll_interaction_freezes_disabled_axes() {
    let mut engine = Engine::new(Graph::new());
    let layer = LayerId::new();
    let scroll = engine.add_node(NodeKind::ScrollInteraction, None);
    engine
        .set_input(
            input(scroll, 0),
            ValueLoop::from_value(Value::Layer(Some(layer))),
        )
        .unwrap();
    engine
        .set_input(
            input(scroll, 2),
            ValueLoop::from_value(Value::Scroll(ScrollMode::Disabled)),
        )
        .unwrap();
    engine.tick(FRAME).unwrap();

    engine.update_interaction(
        layer,
        InteractionState {
            is_down: true,
            translation: Size::new(-40.0, -90.0),
            ..InteractionState::default()
        },
    );
    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(scroll)).unwrap().first(),
        &Value::Position(Position::new(-40.0, 0.0))
    );
}

struct StubTransport {
    body: serde_json::Value,
}

#[async_trait]
impl NetworkTransport for StubTransport {
    async fn perform(&self, request: NetworkRequest) -> NetworkResponse {
        NetworkResponse {
            status: 200,
            body: json!({ "echo": self.body, "url": request.url }),
            headers: json!({ "content-type": "application/json" }),
            error: None,
        }
    }
}

#[tokio::test]
async fn network_request_round_trips_through_the_bridge() {
    init_logs();
    let transport = Arc::new(StubTransport { body: json!(42) });
    let mut engine = Engine::with_transport(Graph::new(), transport);
    let request = engine.add_node(NodeKind::NetworkRequest, None);
    engine
        .set_input(
            input(request, 0),
            ValueLoop::from_value(Value::Text("api.test/value".into())),
        )
        .unwrap();
    engine.tick(FRAME).unwrap();

    engine.pulse_input(input(request, 4));
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.effects_dispatched, 1);
    assert_eq!(
        engine.output_values(out(request)).unwrap().first(),
        &Value::Bool(true)
    );

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.responses_applied, 1);
    assert_eq!(
        engine.output_values(out(request)).unwrap().first(),
        &Value::Bool(false)
    );
    let result = engine
        .output_values(OutputCoordinate {
            node: request,
            port: 1,
        })
        .unwrap()
        .first()
        .clone();
    assert_eq!(
        result,
        Value::Json(json!({ "echo": 42, "url": "https://api.test/value" }))
    );
}

#[tokio::test]
async fn restart_discards_responses_from_the_previous_run() {
    init_logs();
    let transport = Arc::new(StubTransport { body: json!(1) });
    let mut engine = Engine::with_transport(Graph::new(), transport);
    let request = engine.add_node(NodeKind::NetworkRequest, None);
    engine
        .set_input(
            input(request, 0),
            ValueLoop::from_value(Value::Text("api.test".into())),
        )
        .unwrap();
    engine.tick(FRAME).unwrap();
    engine.pulse_input(input(request, 4));
    engine.tick(FRAME).unwrap();

    engine.restart();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.responses_applied, 0);
    assert_eq!(
        engine
            .output_values(OutputCoordinate {
                node: request,
                port: 1,
            })
            .unwrap()
            .first(),
        &Value::Json(json!({}))
    );
}

#[test]
fn disconnect_restores_the_row_default_and_reruns() {
    let mut engine = Engine::new(Graph::new());
    let a = engine.add_node(NodeKind::Add, None);
    let b = engine.add_node(NodeKind::Add, None);
    engine.set_input(input(a, 0), numbers(&[9.0])).unwrap();
    engine.connect(out(a), input(b, 0)).unwrap();
    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(b)).unwrap().first(),
        &Value::Number(9.0)
    );

    engine.disconnect(input(b, 0)).unwrap();
    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(b)).unwrap().first(),
        &Value::Number(0.0)
    );
}

#[test]
fn schema_snapshot_survives_an_engine_rebuild() {
    let mut engine = Engine::new(Graph::new());
    let indices = engine.add_node(NodeKind::LoopIndices, None);
    let add = engine.add_node(NodeKind::Add, None);
    engine.set_input(input(indices, 0), numbers(&[4.0])).unwrap();
    engine.connect(out(indices), input(add, 0)).unwrap();
    engine.set_input(input(add, 1), numbers(&[10.0])).unwrap();
    engine.tick(FRAME).unwrap();

    let schema = engine.graph.snapshot();
    let restored = Graph::from_schema(&schema).unwrap();
    let mut engine = Engine::new(restored);
    engine.tick(FRAME).unwrap();
    assert_eq!(
        engine.output_values(out(add)).unwrap().values(),
        &[
            Value::Number(10.0),
            Value::Number(11.0),
            Value::Number(12.0),
            Value::Number(13.0)
        ]
    );
}

#[test]
fn interactions_only_wake_nodes_watching_that_layer() {
    let mut engine = Engine::new(Graph::new());
    let watched = LayerId::new();
    let other = LayerId::new();
    let press = engine.add_node(NodeKind::PressInteraction, None);
    engine
        .set_input(
            input(press, 0),
            ValueLoop::from_value(Value::Layer(Some(watched))),
        )
        .unwrap();
    engine.tick(FRAME).unwrap();

    engine.update_interaction(other, InteractionState::default());
    let report = engine.tick(FRAME).unwrap();
    assert!(report.evaluated.is_empty());

    let mut down = InteractionState::default();
    down.is_down = true;
    engine.update_interaction(watched, down);
    let report = engine.tick(FRAME).unwrap();
    assert_eq!(report.evaluated, vec![press]);
    assert_eq!(
        engine.output_values(out(press)).unwrap().first(),
        &Value::Bool(true)
    );
}

#[test]
fn unknown_node_lookup_is_an_error() {
    let engine = Engine::new(Graph::new());
    let missing = NodeId::new();
    assert_eq!(
        engine.output_values(out(missing)).unwrap_err(),
        EngineError::UnknownNode(missing)
    );
}
