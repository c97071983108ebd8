//! The patch graph: nodes, ports, edges, and the mutations the engine and
//! host perform on them.

mod step;

pub use step::{should_pulse, GraphStepState};

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::eval::ComputedNodeState;
use crate::models::{EdgeSchema, GraphSchema, NodeSchema};
use crate::nodes::{self, NodeKind};
use crate::value::{Value, ValueKind, ValueLoop};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        NodeId(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies one output port on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputCoordinate {
    pub node: NodeId,
    pub port: usize,
}

/// Identifies one input port on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCoordinate {
    pub node: NodeId,
    pub port: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: OutputCoordinate,
    pub to: InputCoordinate,
}

/// An input row: its current values, an optional fixed kind the row coerces
/// incoming values to, and where the values come from if connected.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPort {
    pub values: ValueLoop,
    pub kind: Option<ValueKind>,
    pub upstream: Option<OutputCoordinate>,
    /// What the row resets to on disconnect.
    pub default: Value,
}

impl InputPort {
    pub fn new(default: Value, kind: Option<ValueKind>) -> Self {
        InputPort {
            values: ValueLoop::from_value(default.clone()),
            kind,
            upstream: None,
            default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputPort {
    pub values: ValueLoop,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// For kind-polymorphic nodes (Splitter, OptionPicker, LoopBuilder...),
    /// the value kind the node currently operates on.
    pub value_kind: Option<ValueKind>,
    pub inputs: Vec<InputPort>,
    pub outputs: Vec<OutputPort>,
    /// Per-loop-index persistent evaluation state.
    pub ephemeral: Vec<ComputedNodeState>,
}

impl Node {
    pub fn new(kind: NodeKind, value_kind: Option<ValueKind>) -> Self {
        let rows = nodes::rows(kind, value_kind);
        let inputs = rows
            .inputs
            .into_iter()
            .map(|row| InputPort::new(row.default, row.kind))
            .collect();
        let outputs = rows
            .outputs
            .into_iter()
            .map(|row| OutputPort {
                values: ValueLoop::from_value(row.default),
            })
            .collect();
        Node {
            id: NodeId::new(),
            kind,
            value_kind,
            inputs,
            outputs,
            ephemeral: Vec::new(),
        }
    }

    /// The loops currently sitting in the input rows, in port order.
    pub fn input_loops(&self) -> Vec<ValueLoop> {
        self.inputs.iter().map(|p| p.values.clone()).collect()
    }

    pub fn output_loops(&self) -> Vec<ValueLoop> {
        self.outputs.iter().map(|p| p.values.clone()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Insert a fresh node of `kind` and return its id.
    pub fn add_node(&mut self, kind: NodeKind, value_kind: Option<ValueKind>) -> NodeId {
        let node = Node::new(kind, value_kind);
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, EngineError> {
        self.nodes.get(&id).ok_or(EngineError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, EngineError> {
        self.nodes.get_mut(&id).ok_or(EngineError::UnknownNode(id))
    }

    /// Connect an output to an input. Replaces any existing edge into the
    /// same input; connecting the same edge twice is a no-op.
    pub fn connect(
        &mut self,
        from: OutputCoordinate,
        to: InputCoordinate,
    ) -> Result<(), EngineError> {
        let source = self.node(from.node)?;
        if from.port >= source.outputs.len() {
            return Err(EngineError::PortOutOfRange {
                node: from.node,
                port: from.port,
            });
        }
        let dest = self.node(to.node)?;
        if to.port >= dest.inputs.len() {
            return Err(EngineError::PortOutOfRange {
                node: to.node,
                port: to.port,
            });
        }

        self.edges.retain(|e| e.to != to);
        self.edges.push(Edge { from, to });
        self.node_mut(to.node)?.inputs[to.port].upstream = Some(from);
        Ok(())
    }

    /// Remove the edge into `to`, if any, and reset the row to its default.
    pub fn disconnect(&mut self, to: InputCoordinate) -> Result<(), EngineError> {
        self.edges.retain(|e| e.to != to);
        let node = self.node_mut(to.node)?;
        let port = node
            .inputs
            .get_mut(to.port)
            .ok_or(EngineError::PortOutOfRange {
                node: to.node,
                port: to.port,
            })?;
        port.upstream = None;
        port.values = ValueLoop::from_value(port.default.clone());
        Ok(())
    }

    /// Overwrite a (disconnected) input row with a literal loop.
    pub fn set_input(
        &mut self,
        at: InputCoordinate,
        values: ValueLoop,
    ) -> Result<(), EngineError> {
        let node = self.node_mut(at.node)?;
        let port = node
            .inputs
            .get_mut(at.port)
            .ok_or(EngineError::PortOutOfRange {
                node: at.node,
                port: at.port,
            })?;
        port.values = values;
        Ok(())
    }

    /// Write evaluated output loops back onto a node. Fewer loops than
    /// ports leaves the remaining ports untouched.
    pub fn set_outputs(&mut self, id: NodeId, loops: Vec<ValueLoop>) -> Result<(), EngineError> {
        let node = self.node_mut(id)?;
        for (port, values) in node.outputs.iter_mut().zip(loops) {
            port.values = values;
        }
        Ok(())
    }

    /// Node ids whose inputs read from `id`'s outputs.
    pub fn downstream_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .edges
            .iter()
            .filter(|e| e.from.node == id)
            .map(|e| e.to.node)
            .collect();
        out.dedup();
        out
    }

    pub fn from_schema(schema: &GraphSchema) -> Result<Self, EngineError> {
        let mut graph = Graph::new();
        for node_schema in &schema.nodes {
            let mut node = Node::new(node_schema.kind, node_schema.value_kind);
            node.id = node_schema.id;
            for (port, values) in node.inputs.iter_mut().zip(&node_schema.inputs) {
                if !values.is_empty() {
                    port.values = ValueLoop::new(values.clone());
                }
            }
            graph.nodes.insert(node.id, node);
        }
        for edge in &schema.edges {
            graph.connect(
                OutputCoordinate {
                    node: edge.from_node,
                    port: edge.from_port,
                },
                InputCoordinate {
                    node: edge.to_node,
                    port: edge.to_port,
                },
            )?;
        }
        Ok(graph)
    }

    pub fn snapshot(&self) -> GraphSchema {
        let mut nodes: Vec<NodeSchema> = self
            .nodes
            .values()
            .map(|node| NodeSchema {
                id: node.id,
                kind: node.kind,
                value_kind: node.value_kind,
                inputs: node
                    .inputs
                    .iter()
                    .map(|p| p.values.iter().cloned().collect())
                    .collect(),
            })
            .collect();
        nodes.sort_by_key(|n| n.id.0);
        let edges = self
            .edges
            .iter()
            .map(|e| EdgeSchema {
                from_node: e.from.node,
                from_port: e.from.port,
                to_node: e.to.node,
                to_port: e.to.port,
            })
            .collect();
        GraphSchema { nodes, edges }
    }
}
