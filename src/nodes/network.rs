//! HTTP request node. Firing the request pulse hands an effect to the
//! bridge; the engine writes the response back onto this node's outputs
//! when it completes, keyed by node and loop index so a newer request
//! always wins.

use serde_json::json;

use crate::effects::{EffectKey, EffectRequest, NetworkRequest, NetworkResponse};
use crate::eval::{looped_eval_impure, ComputedNodeState, EvalContext, EvalResult, ImpureOpResult};
use crate::graph::{should_pulse, Node, NodeId};
use crate::value::{to_json, to_text, HttpMethod, Value, ValueKind, ValueLoop};

use super::RowDefinitions;

/// Output port order; `apply_response` writes by these indices.
pub const PORT_LOADING: usize = 0;
pub const PORT_RESULT: usize = 1;
pub const PORT_ERRORED: usize = 2;
pub const PORT_ERROR: usize = 3;
pub const PORT_HEADERS: usize = 4;

pub fn rows() -> RowDefinitions {
    RowDefinitions::default()
        .input("url", Value::Text(String::new()), Some(ValueKind::Text))
        .input("body", ValueKind::Json.default_value(), Some(ValueKind::Json))
        .input("headers", ValueKind::Json.default_value(), Some(ValueKind::Json))
        .input("method", Value::Method(HttpMethod::Get), Some(ValueKind::Method))
        .input("request", ValueKind::Pulse.default_value(), Some(ValueKind::Pulse))
        .output("loading", Value::Bool(false))
        .output("result", ValueKind::Json.default_value())
        .output("errored", Value::Bool(false))
        .output("error", ValueKind::Json.default_value())
        .output("headers", ValueKind::Json.default_value())
}

pub fn evaluate(
    id: NodeId,
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    let graph_time = ctx.step.graph_time;
    looped_eval_impure(inputs, previous_outputs, ephemeral, |lane, _, index| {
        let request_pulse = lane.get(4).and_then(|v| v.pulse()).unwrap_or(0.0);
        let held: Vec<Value> = lane[5..].iter().map(|v| (*v).clone()).collect();
        if !should_pulse(request_pulse, graph_time) {
            return ImpureOpResult::just(held);
        }

        let url = normalized_url(&lane.first().map(|v| to_text(v)).unwrap_or_default());
        let body = lane.get(1).map(|v| to_json(v)).unwrap_or_default();
        let headers = lane.get(2).map(|v| to_json(v)).unwrap_or_default();
        let method = lane.get(3).and_then(|v| v.method()).unwrap_or_default();

        let mut outputs = held;
        if let Some(loading) = outputs.get_mut(PORT_LOADING) {
            *loading = Value::Bool(true);
        }
        ImpureOpResult {
            outputs,
            run_again: false,
            effect: Some(EffectRequest {
                key: EffectKey { node: id, index },
                request: NetworkRequest {
                    method,
                    url,
                    headers,
                    body,
                },
            }),
        }
    })
}

/// Write a completed response onto the node's output lanes.
pub fn apply_response(node: &mut Node, index: usize, response: &NetworkResponse) {
    let errored = response.error.is_some() || response.status >= 400;
    let error = match &response.error {
        Some(message) => json!({ "error": message }),
        None if errored => json!({ "status": response.status }),
        None => json!({}),
    };
    let lanes = [
        (PORT_LOADING, Value::Bool(false)),
        (PORT_RESULT, Value::Json(response.body.clone())),
        (PORT_ERRORED, Value::Bool(errored)),
        (PORT_ERROR, Value::Json(error)),
        (PORT_HEADERS, Value::Json(response.headers.clone())),
    ];
    for (port, value) in lanes {
        if let Some(output) = node.outputs.get_mut(port) {
            let mut lengthened = output.values.lengthened(index + 1);
            lengthened.set_at(index, value);
            output.values = lengthened;
        }
    }
}

/// Bare hosts get an https scheme so designers can type "example.com".
fn normalized_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests_network {
    use super::*;
    use crate::graph::GraphStepState;
    use crate::nodes::NodeKind;
    use std::collections::HashMap;

    #[test]
    fn url_normalization_adds_scheme_once() {
        assert_eq!(normalized_url("example.com"), "https://example.com");
        assert_eq!(normalized_url("http://example.com"), "http://example.com");
        assert_eq!(normalized_url(""), "");
    }

    #[test]
    fn pulse_emits_effect_and_sets_loading() {
        let mut step = GraphStepState::default();
        step.advance(1.0 / 60.0);
        let interactions = HashMap::new();
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let id = NodeId::new();
        let inputs = vec![
            ValueLoop::from_value(Value::Text("example.com/api".into())),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(Value::Method(HttpMethod::Get)),
            ValueLoop::from_value(Value::Pulse(step.graph_time)),
        ];
        let held = vec![
            ValueLoop::from_value(Value::Bool(false)),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(Value::Bool(false)),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(ValueKind::Json.default_value()),
        ];
        let mut ephemeral = Vec::new();
        let result = evaluate(id, &inputs, &held, &mut ephemeral, &ctx);
        assert_eq!(result.outputs[PORT_LOADING].first(), &Value::Bool(true));
        assert_eq!(result.effects.len(), 1);
        let effect = &result.effects[0];
        assert_eq!(effect.key, EffectKey { node: id, index: 0 });
        assert_eq!(effect.request.url, "https://example.com/api");
    }

    #[test]
    fn no_pulse_means_no_effect() {
        let step = GraphStepState::default();
        let interactions = HashMap::new();
        let ctx = EvalContext {
            step: &step,
            interactions: &interactions,
        };
        let inputs = vec![
            ValueLoop::from_value(Value::Text("example.com".into())),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(Value::Method(HttpMethod::Get)),
            ValueLoop::from_value(Value::Pulse(0.0)),
        ];
        let held = vec![
            ValueLoop::from_value(Value::Bool(false)),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(Value::Bool(false)),
            ValueLoop::from_value(ValueKind::Json.default_value()),
            ValueLoop::from_value(ValueKind::Json.default_value()),
        ];
        let result = evaluate(NodeId::new(), &inputs, &held, &mut Vec::new(), &ctx);
        assert!(result.effects.is_empty());
        assert_eq!(result.outputs[PORT_LOADING].first(), &Value::Bool(false));
    }

    #[test]
    fn apply_response_writes_all_output_lanes() {
        let mut node = Node::new(NodeKind::NetworkRequest, None);
        let response = NetworkResponse {
            status: 200,
            body: json!({ "ok": true }),
            headers: json!({ "content-type": "application/json" }),
            error: None,
        };
        apply_response(&mut node, 0, &response);
        assert_eq!(
            node.outputs[PORT_RESULT].values.first(),
            &Value::Json(json!({ "ok": true }))
        );
        assert_eq!(node.outputs[PORT_ERRORED].values.first(), &Value::Bool(false));

        let failure = NetworkResponse::failed("timed out");
        apply_response(&mut node, 0, &failure);
        assert_eq!(node.outputs[PORT_ERRORED].values.first(), &Value::Bool(true));
        assert_eq!(
            node.outputs[PORT_ERROR].values.first(),
            &Value::Json(json!({ "error": "timed out" }))
        );
    }
}
