use serde::{Deserialize, Serialize};

use crate::graph::NodeId;
use crate::nodes::NodeKind;
use crate::value::{Value, ValueKind};

/// Serialized form of a whole patch graph.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphSchema {
    pub nodes: Vec<NodeSchema>,
    pub edges: Vec<EdgeSchema>,
}

/// One node: its kind, optional value kind, and the literal values sitting
/// in each input row. Outputs and ephemeral state are not persisted; they
/// are recomputed on load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSchema {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    pub inputs: Vec<Vec<Value>>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSchema {
    pub from_node: NodeId,
    pub from_port: usize,
    pub to_node: NodeId,
    pub to_port: usize,
}
