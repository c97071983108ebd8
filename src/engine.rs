//! The engine owns a graph, a frame clock, the dirty set, and the effect
//! bridge, and advances the whole prototype one frame per `tick`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;

use crate::effects::{EffectBridge, EffectRequest, HttpTransport, NetworkTransport};
use crate::error::EngineError;
use crate::eval::EvalContext;
use crate::graph::{Graph, GraphStepState, InputCoordinate, NodeId, OutputCoordinate};
use crate::interaction::InteractionState;
use crate::nodes::{self, network, NodeKind};
use crate::scheduler;
use crate::value::{coerce, LayerId, Value, ValueKind, ValueLoop};

/// What one tick did, mostly for hosts that want to log or assert on it.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub evaluated: Vec<NodeId>,
    pub responses_applied: usize,
    pub effects_dispatched: usize,
}

pub struct Engine {
    pub graph: Graph,
    step: GraphStepState,
    dirty: HashSet<NodeId>,
    pending_pulses: Vec<InputCoordinate>,
    effects: EffectBridge,
    interactions: HashMap<LayerId, InteractionState>,
}

/// One connection pool shared by every engine in the process.
static DEFAULT_TRANSPORT: Lazy<Arc<HttpTransport>> = Lazy::new(|| Arc::new(HttpTransport::new()));

impl Engine {
    pub fn new(graph: Graph) -> Self {
        Self::with_transport(graph, DEFAULT_TRANSPORT.clone())
    }

    pub fn with_transport(graph: Graph, transport: Arc<dyn NetworkTransport>) -> Self {
        let dirty = graph.nodes.keys().copied().collect();
        Engine {
            graph,
            step: GraphStepState::default(),
            dirty,
            pending_pulses: Vec::new(),
            effects: EffectBridge::new(transport),
            interactions: HashMap::new(),
        }
    }

    pub fn step_state(&self) -> &GraphStepState {
        &self.step
    }

    pub fn add_node(&mut self, kind: NodeKind, value_kind: Option<ValueKind>) -> NodeId {
        let id = self.graph.add_node(kind, value_kind);
        self.dirty.insert(id);
        id
    }

    pub fn connect(
        &mut self,
        from: OutputCoordinate,
        to: InputCoordinate,
    ) -> Result<(), EngineError> {
        self.graph.connect(from, to)?;
        self.dirty.insert(to.node);
        Ok(())
    }

    pub fn disconnect(&mut self, to: InputCoordinate) -> Result<(), EngineError> {
        self.graph.disconnect(to)?;
        self.dirty.insert(to.node);
        Ok(())
    }

    /// Write a literal loop into an input row and schedule the node.
    pub fn set_input(&mut self, at: InputCoordinate, values: ValueLoop) -> Result<(), EngineError> {
        self.graph.set_input(at, values)?;
        self.dirty.insert(at.node);
        Ok(())
    }

    /// Fire a pulse into an input row. Applied at the start of the next
    /// tick, after the clock advances, so the stamp matches that frame.
    pub fn pulse_input(&mut self, at: InputCoordinate) {
        self.pending_pulses.push(at);
    }

    /// Push fresh pointer state for a layer and wake every interaction
    /// node watching it.
    pub fn update_interaction(&mut self, layer: LayerId, state: InteractionState) {
        self.interactions.insert(layer, state);
        for node in self.graph.nodes.values() {
            if !node.kind.is_interaction() {
                continue;
            }
            let watches = node
                .inputs
                .first()
                .map(|port| {
                    port.values
                        .iter()
                        .any(|v| v.layer() == Some(layer))
                })
                .unwrap_or(false);
            if watches {
                self.dirty.insert(node.id);
            }
        }
    }

    pub fn output_values(&self, at: OutputCoordinate) -> Result<&ValueLoop, EngineError> {
        let node = self.graph.node(at.node)?;
        node.outputs
            .get(at.port)
            .map(|port| &port.values)
            .ok_or(EngineError::PortOutOfRange {
                node: at.node,
                port: at.port,
            })
    }

    /// Advance one frame: apply finished effects, move the clock, stamp
    /// pending pulses, then evaluate the dirty closure in dependency order.
    pub fn tick(&mut self, delta: f64) -> Result<TickReport, EngineError> {
        let mut report = TickReport::default();

        for (key, response) in self.effects.drain() {
            if let Ok(node) = self.graph.node_mut(key.node) {
                network::apply_response(node, key.index, &response);
                report.responses_applied += 1;
                self.dirty.insert(key.node);
                let downstream = self.graph.downstream_of(key.node);
                self.dirty.extend(downstream);
            }
        }

        self.step.advance(delta);

        for at in std::mem::take(&mut self.pending_pulses) {
            let pulse = ValueLoop::from_value(Value::Pulse(self.step.graph_time));
            self.graph.set_input(at, pulse)?;
            self.dirty.insert(at.node);
        }

        let order = scheduler::plan(&self.graph, &self.dirty)?;
        self.dirty.clear();

        let mut effects: Vec<EffectRequest> = Vec::new();
        for id in order {
            self.pull_upstream_inputs(id)?;

            let node = self.graph.node_mut(id)?;
            let kind = node.kind;
            let value_kind = node.value_kind;
            let inputs = node.input_loops();
            let previous = node.output_loops();
            let mut ephemeral = std::mem::take(&mut node.ephemeral);

            let ctx = EvalContext {
                step: &self.step,
                interactions: &self.interactions,
            };
            let result = nodes::evaluate(
                id,
                kind,
                value_kind,
                &inputs,
                &previous,
                &mut ephemeral,
                &ctx,
            );

            let node = self.graph.node_mut(id)?;
            node.ephemeral = ephemeral;
            self.graph.set_outputs(id, result.outputs)?;

            if result.run_again {
                self.dirty.insert(id);
            }
            effects.extend(result.effects);
            report.evaluated.push(id);
        }

        report.effects_dispatched = effects.len();
        for effect in effects {
            self.effects.dispatch(effect);
        }
        debug!(
            "frame {}: evaluated {} nodes, {} responses, {} effects",
            self.step.graph_frame_count,
            report.evaluated.len(),
            report.responses_applied,
            report.effects_dispatched
        );
        Ok(report)
    }

    /// Copy upstream output loops into this node's input rows, coercing to
    /// each row's declared kind.
    fn pull_upstream_inputs(&mut self, id: NodeId) -> Result<(), EngineError> {
        let graph_time = self.step.graph_time;
        let pulls: Vec<(usize, OutputCoordinate, Option<ValueKind>)> = self
            .graph
            .node(id)?
            .inputs
            .iter()
            .enumerate()
            .filter_map(|(port, input)| input.upstream.map(|up| (port, up, input.kind)))
            .collect();

        for (port, upstream, row_kind) in pulls {
            let source = self.graph.node(upstream.node)?;
            let values = source
                .outputs
                .get(upstream.port)
                .map(|p| p.values.clone())
                .ok_or(EngineError::PortOutOfRange {
                    node: upstream.node,
                    port: upstream.port,
                })?;
            let values = match row_kind {
                Some(kind) => ValueLoop::new(
                    values.iter().map(|v| coerce(v, kind, graph_time)).collect(),
                ),
                None => values,
            };
            self.graph.node_mut(id)?.inputs[port].values = values;
        }
        Ok(())
    }

    /// Reset the prototype to frame zero: clock, per-index state, outputs,
    /// and in-flight effects. Input literals and topology survive.
    pub fn restart(&mut self) {
        self.step = GraphStepState::default();
        self.pending_pulses.clear();
        self.effects.clear();
        self.dirty = self.graph.nodes.keys().copied().collect();

        for node in self.graph.nodes.values_mut() {
            node.ephemeral.clear();
            let rows = nodes::rows(node.kind, node.value_kind);
            for (port, row) in node.outputs.iter_mut().zip(rows.outputs) {
                port.values = ValueLoop::from_value(row.default);
            }
        }
    }
}
