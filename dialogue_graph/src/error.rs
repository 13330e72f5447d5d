//! Errors raised while loading, saving or validating graphs.

use thiserror::Error;

use crate::node::{Guid, PortIndex};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graph has no entry node guid")]
    MissingEntry,

    #[error("node {0} would be a second entry node")]
    MultipleEntries(Guid),

    #[error("node guid {0} is used more than once")]
    DuplicateGuid(Guid),

    #[error("link {out_node} -> {in_node} (port {port}) references a node that does not exist")]
    DanglingLink {
        out_node: Guid,
        in_node: Guid,
        port: PortIndex,
    },

    #[error("node {node} has more than one link on port {port}")]
    DuplicatePortBinding { node: Guid, port: PortIndex },

    #[error("node {node} has invalid focus choice {choice}")]
    InvalidFocusChoice { node: Guid, choice: i32 },
}
