//! Error types for the dialogue runtime.

use dialogue_graph::{GraphError, GraphId, Guid, PropertyKind};
use thiserror::Error;

/// Property lookup and write failures. Always returned to the caller, never
/// retried or defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlackboardError {
    #[error("there is no property named '{0}'")]
    PropertyNotFound(String),

    #[error("ambiguous property name '{name}': {count} properties share it")]
    PropertyAmbiguous { name: String, count: usize },

    #[error("property '{name}' is declared as {expected}, got {found}")]
    PropertyTypeMismatch {
        name: String,
        expected: PropertyKind,
        found: PropertyKind,
    },
}

/// Session lifecycle failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("a dialogue session is already running")]
    SessionRejected,

    #[error("graph {0} is not registered with the runtime")]
    GraphNotRegistered(GraphId),

    #[error("condition node {node} checks '{variable}', which is not a bool property of its graph")]
    UnknownConditionVariable { node: Guid, variable: String },

    #[error("more than {limit} nodes advanced without pausing for input")]
    AutoAdvanceLimit { limit: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any error surfaced by [`crate::Runtime`].
#[derive(Error, Debug)]
pub enum DialogueError {
    #[error(transparent)]
    Blackboard(#[from] BlackboardError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl DialogueError {
    /// The session error, if this is one.
    pub fn as_session(&self) -> Option<&SessionError> {
        match self {
            DialogueError::Session(err) => Some(err),
            _ => None,
        }
    }
}
