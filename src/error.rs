use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("node id `{0}` appears more than once")]
    DuplicateNodeId(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
