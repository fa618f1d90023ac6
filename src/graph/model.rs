use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Model,
    Dataset,
    Algorithm,
    Paper,
    Author,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Model,
        Self::Dataset,
        Self::Algorithm,
        Self::Paper,
        Self::Author,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Dataset => "dataset",
            Self::Algorithm => "algorithm",
            Self::Paper => "paper",
            Self::Author => "author",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type")]
    pub category: Category,
    #[serde(default)]
    pub importance: Option<f32>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Node {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            importance: None,
            year: None,
        }
    }

    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Reference to a node that upstream code has already resolved into an object.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NodeRef {
    pub id: String,
}

/// One end of an edge, either a bare node id or a resolved node reference.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Endpoint {
    Id(String),
    Node(NodeRef),
}

impl Endpoint {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Node(node) => &node.id,
        }
    }
}

impl From<&str> for Endpoint {
    fn from(value: &str) -> Self {
        Self::Id(value.to_owned())
    }
}

fn default_relationship() -> String {
    "related_to".to_owned()
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Edge {
    pub source: Endpoint,
    pub target: Endpoint,
    #[serde(default = "default_relationship", alias = "type")]
    pub relationship: String,
    #[serde(default)]
    pub weight: Option<f32>,
}

impl Edge {
    pub fn new(source: impl Into<Endpoint>, target: impl Into<Endpoint>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: default_relationship(),
            weight: None,
        }
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = relationship.into();
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct KnowledgeGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

impl KnowledgeGraph {
    /// Builds a graph, keeping the first node when an id repeats.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.entry(node.id.clone()).or_insert(index);
        }

        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    /// Edges touching `id` in either direction, paired with the id on the far end.
    pub fn incident_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = (&'a Edge, &'a str)> {
        self.edges.iter().filter_map(move |edge| {
            let source = edge.source.id();
            let target = edge.target.id();
            if source == id {
                Some((edge, target))
            } else if target == id {
                Some((edge, source))
            } else {
                None
            }
        })
    }
}
