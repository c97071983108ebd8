mod schema;

pub use schema::{EdgeSchema, GraphSchema, NodeSchema};
