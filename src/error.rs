use thiserror::Error;

use crate::graph::NodeId;

/// Errors surfaced by graph mutation and evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("cycle detected involving node {0}")]
    CycleDetected(NodeId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("port {port} out of range for node {node}")]
    PortOutOfRange { node: NodeId, port: usize },
}
