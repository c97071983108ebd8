use std::collections::VecDeque;

use crate::animation::{AnimationField, LinearMotion, MomentumState, SpringSim};
use crate::value::{Position, Value};

/// State one node keeps for one loop index between frames. Every field is
/// optional or defaulted; each node family touches only the fields it uses.
/// When a node's loop length changes, trailing entries are dropped and new
/// ones start fresh.
#[derive(Debug, Clone, Default)]
pub struct ComputedNodeState {
    /// One entry per animated field of the value (x/y, width/height, rgba...).
    pub animation: Option<Vec<AnimationField>>,
    /// Spring integrations, also one per field.
    pub springs: Option<Vec<SpringSim>>,
    /// Inertia after a drag release.
    pub momentum: Option<MomentumState>,
    /// Linear glide back to the start position after a reset pulse.
    pub reset_motion: Option<(LinearMotion, LinearMotion)>,
    pub was_dragging: bool,
    /// Where the dragged value was when the gesture began.
    pub drag_start: Option<Position>,
    /// Last value seen, for change detection (Delay, Smoothing, Pulse).
    pub previous_value: Option<Value>,
    /// Buffered (due_time, value) pairs awaiting release.
    pub delay_queue: VecDeque<(f64, Value)>,
    /// When this node last emitted a pulse (RepeatingPulse, Random).
    pub last_pulse_time: f64,
}
