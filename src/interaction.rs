//! Pointer state reported by the host layer system, consumed by the
//! interaction nodes.

use serde::{Deserialize, Serialize};

use crate::value::{Position, Size};

/// A snapshot of one layer's pointer interaction, pushed into the engine by
/// the host each time it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    /// Whether the pointer is currently down on the layer.
    pub is_down: bool,
    /// Layer position at the moment the current drag began.
    pub drag_origin: Option<Position>,
    /// Current pointer position in the layer's parent coordinates.
    pub position: Position,
    /// Instantaneous pointer velocity.
    pub velocity: Size,
    /// Accumulated translation since the gesture began.
    pub translation: Size,
    /// Graph time at which the most recent press ended.
    pub first_press_ended: Option<f64>,
    /// Graph time at which the press before that ended.
    pub second_press_ended: Option<f64>,
    /// Where the last completed tap landed.
    pub last_tapped_location: Option<Position>,
}

/// Two presses ending within this window count as a double tap.
pub(crate) const DOUBLE_TAP_WINDOW: f64 = 0.3;

impl InteractionState {
    /// True when the most recent press ended at `graph_time` this frame.
    pub fn tapped_at(&self, graph_time: f64) -> bool {
        self.first_press_ended == Some(graph_time)
    }

    /// True when the two most recent presses both ended within the
    /// double-tap window, the latest of them this frame.
    pub fn double_tapped_at(&self, graph_time: f64) -> bool {
        match (self.first_press_ended, self.second_press_ended) {
            (Some(first), Some(second)) => {
                first == graph_time && (first - second) <= DOUBLE_TAP_WINDOW
            }
            _ => false,
        }
    }
}
