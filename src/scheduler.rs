//! Recompute planning: grow the dirty set into its downstream closure,
//! then order it so every node runs after the nodes feeding it.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

use crate::error::EngineError;
use crate::graph::{Graph, NodeId};

/// Evaluation order for one tick. Nodes outside the closure are untouched;
/// a cycle anywhere in the closure aborts the tick.
pub fn plan(graph: &Graph, dirty: &HashSet<NodeId>) -> Result<Vec<NodeId>, EngineError> {
    let mut closure: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = dirty
        .iter()
        .copied()
        .filter(|id| graph.nodes.contains_key(id))
        .collect();
    while let Some(id) = stack.pop() {
        if closure.insert(id) {
            stack.extend(graph.downstream_of(id));
        }
    }

    let mut dag: DiGraph<NodeId, ()> = DiGraph::new();
    let mut indices: HashMap<NodeId, _> = HashMap::with_capacity(closure.len());
    for id in &closure {
        indices.insert(*id, dag.add_node(*id));
    }
    for edge in &graph.edges {
        if let (Some(&from), Some(&to)) =
            (indices.get(&edge.from.node), indices.get(&edge.to.node))
        {
            dag.add_edge(from, to, ());
        }
    }

    match toposort(&dag, None) {
        Ok(order) => Ok(order.into_iter().map(|index| dag[index]).collect()),
        Err(cycle) => Err(EngineError::CycleDetected(dag[cycle.node_id()])),
    }
}
