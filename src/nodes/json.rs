//! JSON construction and traversal.

use serde_json::json;

use crate::eval::{looped_eval, EvalResult};
use crate::value::{to_json, to_text, Value, ValueKind, ValueLoop};

use super::{NodeKind, RowDefinitions};

pub fn rows(kind: NodeKind) -> RowDefinitions {
    let defs = RowDefinitions::default();
    match kind {
        NodeKind::JsonObject => defs
            .input("key", Value::Text(String::new()), Some(ValueKind::Text))
            .input("value", Value::Number(0.0), None)
            .output("object", ValueKind::Json.default_value()),
        NodeKind::JsonArray => defs
            .input("loop", Value::Number(0.0), None)
            .output("array", Value::Json(json!([]))),
        NodeKind::ValueAtPath => defs
            .input("object", ValueKind::Json.default_value(), Some(ValueKind::Json))
            .input("path", Value::Text(String::new()), Some(ValueKind::Text))
            .output("value", ValueKind::Json.default_value()),
        NodeKind::ValueForKey => defs
            .input("object", ValueKind::Json.default_value(), Some(ValueKind::Json))
            .input("key", Value::Text(String::new()), Some(ValueKind::Text))
            .output("value", ValueKind::Json.default_value()),
        _ => unreachable!("not a json kind"),
    }
}

pub fn evaluate(kind: NodeKind, inputs: &[ValueLoop]) -> EvalResult {
    match kind {
        // Whole-loop: collapses its input loop into one array document.
        NodeKind::JsonArray => {
            let items: Vec<serde_json::Value> = inputs
                .first()
                .map(|l| l.iter().map(to_json).collect())
                .unwrap_or_default();
            EvalResult::just(vec![ValueLoop::from_value(Value::Json(json!(items)))])
        }
        _ => {
            let outputs = looped_eval(inputs, |lane| {
                let out = match kind {
                    NodeKind::JsonObject => {
                        let key = lane.first().map(|v| to_text(v)).unwrap_or_default();
                        let value = lane.get(1).map(|v| to_json(v)).unwrap_or_default();
                        let mut map = serde_json::Map::new();
                        map.insert(key, value);
                        serde_json::Value::Object(map)
                    }
                    NodeKind::ValueAtPath => {
                        let object = lane.first().map(|v| to_json(v)).unwrap_or_default();
                        let path = lane.get(1).map(|v| to_text(v)).unwrap_or_default();
                        value_at_path(&object, &path)
                    }
                    NodeKind::ValueForKey => {
                        let object = lane.first().map(|v| to_json(v)).unwrap_or_default();
                        let key = lane.get(1).map(|v| to_text(v)).unwrap_or_default();
                        object.get(&key).cloned().unwrap_or(serde_json::Value::Null)
                    }
                    _ => unreachable!("not a json kind"),
                };
                vec![Value::Json(out)]
            });
            EvalResult::just(outputs)
        }
    }
}

/// Dot-and-bracket paths: `a.b[2].c`. Missing segments read as null.
fn value_at_path(document: &serde_json::Value, path: &str) -> serde_json::Value {
    let mut current = document.clone();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (key, indices) = split_indices(segment);
        if !key.is_empty() {
            current = current.get(key).cloned().unwrap_or(serde_json::Value::Null);
        }
        for index in indices {
            current = current
                .get(index)
                .cloned()
                .unwrap_or(serde_json::Value::Null);
        }
    }
    current
}

fn split_indices(segment: &str) -> (&str, Vec<usize>) {
    match segment.find('[') {
        None => (segment, Vec::new()),
        Some(open) => {
            let key = &segment[..open];
            let indices = segment[open..]
                .split(['[', ']'])
                .filter_map(|s| s.parse::<usize>().ok())
                .collect();
            (key, indices)
        }
    }
}
