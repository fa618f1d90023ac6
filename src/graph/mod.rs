mod load;
mod model;

pub use load::{load_graph, parse_graph};
pub use model::{Category, Edge, Endpoint, KnowledgeGraph, Node, NodeRef};
