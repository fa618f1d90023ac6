//! Knowledge-graph exploration: graph model, loading, and the view pipeline
//! that decides which nodes are drawn and how.

pub mod error;
pub mod graph;
pub mod pipeline;
pub mod settings;

pub use error::{GraphError, Result};
pub use graph::{Category, Edge, Endpoint, KnowledgeGraph, Node, load_graph, parse_graph};
pub use pipeline::{PipelineOutput, run_pipeline};
pub use settings::{DetailThresholds, ScaleSettings, VisibilitySettings};
