//! Dataflow engine for interactive prototypes: a patch graph of typed
//! value loops, evaluated frame by frame with dirty-set scheduling,
//! per-index animation state, and asynchronous network effects.

pub mod animation;
pub mod effects;
pub mod engine;
pub mod error;
pub mod eval;
pub mod graph;
pub mod interaction;
pub mod models;
pub mod nodes;
pub mod scheduler;
pub mod value;

pub use engine::{Engine, TickReport};
pub use error::EngineError;
pub use graph::{Graph, GraphStepState, InputCoordinate, Node, NodeId, OutputCoordinate};
pub use interaction::InteractionState;
pub use models::{EdgeSchema, GraphSchema, NodeSchema};
pub use nodes::NodeKind;
pub use value::{LayerId, Value, ValueKind, ValueLoop};

#[cfg(test)]
mod tests;
