mod component;
mod render;
pub mod scene;
pub mod scheduler;
pub mod simulation;
mod types;
pub mod viewport;

pub use component::MemoryGraphCanvas;
pub use types::{GraphData, GraphEdge, GraphNode, NodeCategory};
