//! Evaluation plumbing shared by every node family: result types, the
//! per-index persistent state, and loop broadcasting.

mod broadcast;
mod state;

pub use broadcast::{looped_eval, looped_eval_impure};
pub use state::ComputedNodeState;

use std::collections::HashMap;

use crate::effects::EffectRequest;
use crate::graph::GraphStepState;
use crate::interaction::InteractionState;
use crate::value::{LayerId, Value, ValueLoop};

/// Everything one node evaluation produces.
#[derive(Debug, Clone, Default)]
pub struct EvalResult {
    /// One loop per output port. Fewer loops than ports leaves the missing
    /// ports unchanged.
    pub outputs: Vec<ValueLoop>,
    /// The node wants to run next frame even without new inputs (animation
    /// in flight, timers...).
    pub run_again: bool,
    /// Side effects to hand to the effect bridge after the pass.
    pub effects: Vec<EffectRequest>,
}

impl EvalResult {
    pub fn just(outputs: Vec<ValueLoop>) -> Self {
        EvalResult {
            outputs,
            ..EvalResult::default()
        }
    }
}

/// One loop index worth of an impure evaluation.
#[derive(Debug, Clone, Default)]
pub struct ImpureOpResult {
    pub outputs: Vec<Value>,
    pub run_again: bool,
    pub effect: Option<EffectRequest>,
}

impl ImpureOpResult {
    pub fn just(outputs: Vec<Value>) -> Self {
        ImpureOpResult {
            outputs,
            ..ImpureOpResult::default()
        }
    }
}

/// Read-only context handed to impure nodes.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub step: &'a GraphStepState,
    /// Pointer state per interactive layer, looked up by the node's layer
    /// input lane by lane.
    pub interactions: &'a HashMap<LayerId, InteractionState>,
}

impl<'a> EvalContext<'a> {
    pub fn interaction(&self, layer: Option<LayerId>) -> Option<&'a InteractionState> {
        layer.and_then(|id| self.interactions.get(&id))
    }
}
