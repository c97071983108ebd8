//! Node kinds and their evaluators, grouped by family. `rows` describes a
//! kind's ports; `evaluate` dispatches one node's inputs (plus its previous
//! outputs and per-index state) to the family that owns the kind.

use serde::{Deserialize, Serialize};

use crate::eval::{ComputedNodeState, EvalContext, EvalResult};
use crate::graph::NodeId;
use crate::value::{Value, ValueKind, ValueLoop};

pub mod animation;
pub mod interaction;
pub mod json;
pub mod logic;
pub mod loops;
pub mod math;
pub mod network;
pub mod utility;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    // math
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    Power,
    SquareRoot,
    Abs,
    Round,
    Min,
    Max,
    Clamp,
    // logic
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Not,
    And,
    Or,
    // loops
    LoopIndices,
    LoopBuilder,
    LoopSelect,
    LoopReverse,
    // json
    JsonObject,
    JsonArray,
    ValueAtPath,
    ValueForKey,
    // utility, pure
    Splitter,
    Transition,
    OptionPicker,
    PackPosition,
    UnpackPosition,
    PackSize,
    UnpackSize,
    SpringFromDurationAndBounce,
    SpringFromResponseAndDampingRatio,
    // utility, stateful
    Time,
    RepeatingPulse,
    Pulse,
    Random,
    Delay,
    Smoothing,
    // animation
    ClassicAnimation,
    CubicBezierAnimation,
    SpringAnimation,
    PopAnimation,
    // interaction
    DragInteraction,
    PressInteraction,
    ScrollInteraction,
    // network
    NetworkRequest,
}

impl NodeKind {
    /// Kinds that read the graph clock or other ambient state, so a change
    /// of inputs is not the only reason to re-run them.
    pub fn is_impure(self) -> bool {
        matches!(
            self,
            NodeKind::Time
                | NodeKind::RepeatingPulse
                | NodeKind::Pulse
                | NodeKind::Random
                | NodeKind::Delay
                | NodeKind::Smoothing
                | NodeKind::ClassicAnimation
                | NodeKind::CubicBezierAnimation
                | NodeKind::SpringAnimation
                | NodeKind::PopAnimation
                | NodeKind::DragInteraction
                | NodeKind::PressInteraction
                | NodeKind::ScrollInteraction
                | NodeKind::NetworkRequest
        )
    }

    /// Kinds whose first input names the layer they observe.
    pub fn is_interaction(self) -> bool {
        matches!(
            self,
            NodeKind::DragInteraction | NodeKind::PressInteraction | NodeKind::ScrollInteraction
        )
    }
}

/// One input row description.
#[derive(Debug, Clone)]
pub struct InputRow {
    pub label: &'static str,
    pub default: Value,
    /// A fixed kind coerces everything arriving on the row; `None` rows
    /// accept any value (Splitter, Delay, OptionPicker choices...).
    pub kind: Option<ValueKind>,
}

#[derive(Debug, Clone)]
pub struct OutputRow {
    pub label: &'static str,
    pub default: Value,
}

#[derive(Debug, Clone, Default)]
pub struct RowDefinitions {
    pub inputs: Vec<InputRow>,
    pub outputs: Vec<OutputRow>,
}

impl RowDefinitions {
    fn input(mut self, label: &'static str, default: Value, kind: Option<ValueKind>) -> Self {
        self.inputs.push(InputRow {
            label,
            default,
            kind,
        });
        self
    }

    fn output(mut self, label: &'static str, default: Value) -> Self {
        self.outputs.push(OutputRow { label, default });
        self
    }
}

/// Port layout for one node kind. Kind-polymorphic nodes take the value
/// kind their rows should carry; others ignore it.
pub fn rows(kind: NodeKind, value_kind: Option<ValueKind>) -> RowDefinitions {
    use NodeKind::*;
    match kind {
        Add | Subtract | Multiply | Divide | Mod | Power | SquareRoot | Abs | Round | Min
        | Max | Clamp => math::rows(kind),
        Equals | GreaterThan | GreaterOrEqual | LessThan | LessOrEqual | Not | And | Or => {
            logic::rows(kind)
        }
        LoopIndices | LoopBuilder | LoopSelect | LoopReverse => loops::rows(kind, value_kind),
        JsonObject | JsonArray | ValueAtPath | ValueForKey => json::rows(kind),
        Splitter | Transition | OptionPicker | PackPosition | UnpackPosition | PackSize
        | UnpackSize | SpringFromDurationAndBounce | SpringFromResponseAndDampingRatio | Time
        | RepeatingPulse | Pulse | Random | Delay | Smoothing => utility::rows(kind, value_kind),
        ClassicAnimation | CubicBezierAnimation | SpringAnimation | PopAnimation => {
            animation::rows(kind, value_kind)
        }
        DragInteraction | PressInteraction | ScrollInteraction => interaction::rows(kind),
        NetworkRequest => network::rows(),
    }
}

/// Evaluate one node. `previous_outputs` are the loops currently on the
/// node's output ports; stateful kinds use them as their starting point.
pub fn evaluate(
    id: NodeId,
    kind: NodeKind,
    value_kind: Option<ValueKind>,
    inputs: &[ValueLoop],
    previous_outputs: &[ValueLoop],
    ephemeral: &mut Vec<ComputedNodeState>,
    ctx: &EvalContext<'_>,
) -> EvalResult {
    use NodeKind::*;
    match kind {
        Add | Subtract | Multiply | Divide | Mod | Power | SquareRoot | Abs | Round | Min
        | Max | Clamp => math::evaluate(kind, inputs),
        Equals | GreaterThan | GreaterOrEqual | LessThan | LessOrEqual | Not | And | Or => {
            logic::evaluate(kind, inputs)
        }
        LoopIndices | LoopBuilder | LoopSelect | LoopReverse => loops::evaluate(kind, inputs),
        JsonObject | JsonArray | ValueAtPath | ValueForKey => json::evaluate(kind, inputs),
        Splitter | Transition | OptionPicker | PackPosition | UnpackPosition | PackSize
        | UnpackSize | SpringFromDurationAndBounce | SpringFromResponseAndDampingRatio | Time
        | RepeatingPulse | Pulse | Random | Delay | Smoothing => {
            utility::evaluate(kind, value_kind, inputs, previous_outputs, ephemeral, ctx)
        }
        ClassicAnimation | CubicBezierAnimation | SpringAnimation | PopAnimation => {
            animation::evaluate(kind, value_kind, inputs, previous_outputs, ephemeral, ctx)
        }
        DragInteraction | PressInteraction | ScrollInteraction => {
            interaction::evaluate(kind, inputs, previous_outputs, ephemeral, ctx)
        }
        NetworkRequest => network::evaluate(id, inputs, previous_outputs, ephemeral, ctx),
    }
}
