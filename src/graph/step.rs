use serde::{Deserialize, Serialize};

/// Clock and frame bookkeeping for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStepState {
    /// Seconds since the graph started (or was last restarted).
    pub graph_time: f64,
    /// Frames evaluated since start.
    pub graph_frame_count: u64,
    /// Frame-rate estimate derived from the most recent tick delta.
    pub estimated_fps: f64,
}

impl Default for GraphStepState {
    fn default() -> Self {
        GraphStepState {
            graph_time: 0.0,
            graph_frame_count: 0,
            estimated_fps: 60.0,
        }
    }
}

impl GraphStepState {
    pub fn advance(&mut self, delta: f64) {
        self.graph_time += delta;
        self.graph_frame_count += 1;
        if delta > 0.0 {
            self.estimated_fps = 1.0 / delta;
        }
    }

    /// Time zero means the graph has not ticked yet; pulses at 0.0 are
    /// "never pulsed", not "pulsed at startup".
    pub fn graph_just_started(&self) -> bool {
        self.graph_time == 0.0
    }
}

/// A pulse fires on the frame whose time it carries. Both-zero means the
/// pulse has never fired.
pub fn should_pulse(input_pulse_time: f64, graph_time: f64) -> bool {
    input_pulse_time == graph_time && !(input_pulse_time == 0.0 && graph_time == 0.0)
}
