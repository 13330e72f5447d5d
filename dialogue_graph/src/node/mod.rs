//! Node definitions for dialogue graphs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Index of an output socket on a node. Single-output kinds only use port 0.
pub type PortIndex = u32;

/// Port taken by a condition node when its variable is `true`.
pub const PORT_TRUE: PortIndex = 0;

/// Port taken by a condition node when its variable is `false`.
pub const PORT_FALSE: PortIndex = 1;

/// Stable string identifier shared by nodes and properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(pub String);

impl Guid {
    /// Create a new random guid.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Guid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Guid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authoring position of a node. Display only; never affects execution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (f32, f32) {
    fn from(position: Position) -> Self {
        (position.x, position.y)
    }
}

/// Who the host should focus its viewpoint on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusTarget {
    /// The player (focus A).
    Player,
    /// The actor the dialogue was started with (focus B).
    Actor,
}

/// The closed set of node kinds and their payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Sole traversal starting point. Exactly one per graph.
    Entry,

    /// Line of text with a single "continue" output.
    Basic { focus: Option<FocusTarget> },

    /// Line of text offering options, keyed by output port.
    Choice { choices: BTreeMap<PortIndex, String> },

    /// Branches on a boolean property: port 0 when true, port 1 when false.
    Condition { variable: String },

    /// Moves the host viewpoint, then continues.
    Focus { target: FocusTarget },

    /// Broadcasts a named event to listeners, then continues.
    Event { event_name: String },

    /// Ends the dialogue.
    Exit,
}

impl NodeKind {
    /// Short name of the kind, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Entry => "entry",
            NodeKind::Basic { .. } => "basic",
            NodeKind::Choice { .. } => "choice",
            NodeKind::Condition { .. } => "condition",
            NodeKind::Focus { .. } => "focus",
            NodeKind::Event { .. } => "event",
            NodeKind::Exit => "exit",
        }
    }
}

/// A single step in a dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub guid: Guid,
    pub position: Position,

    /// Authoring text. Only basic and choice nodes render it.
    pub text: String,

    pub kind: NodeKind,
}

impl Node {
    fn with_kind(guid: impl Into<Guid>, text: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            guid: guid.into(),
            position: Position::default(),
            text: text.into(),
            kind,
        }
    }

    pub(crate) fn entry(guid: impl Into<Guid>, position: Position) -> Self {
        Self::with_kind(guid, "", NodeKind::Entry).at(position)
    }

    /// Create a basic node with no focus directive.
    pub fn basic(guid: impl Into<Guid>, text: impl Into<String>) -> Self {
        Self::with_kind(guid, text, NodeKind::Basic { focus: None })
    }

    /// Create a choice node from `(port, label)` pairs.
    pub fn choice(
        guid: impl Into<Guid>,
        text: impl Into<String>,
        choices: impl IntoIterator<Item = (PortIndex, impl Into<String>)>,
    ) -> Self {
        let choices = choices
            .into_iter()
            .map(|(port, label)| (port, label.into()))
            .collect();
        Self::with_kind(guid, text, NodeKind::Choice { choices })
    }

    /// Create a condition node on a boolean property.
    pub fn condition(guid: impl Into<Guid>, variable: impl Into<String>) -> Self {
        Self::with_kind(
            guid,
            "",
            NodeKind::Condition {
                variable: variable.into(),
            },
        )
    }

    /// Create a focus node.
    pub fn focus(guid: impl Into<Guid>, target: FocusTarget) -> Self {
        Self::with_kind(guid, "", NodeKind::Focus { target })
    }

    /// Create an event node.
    pub fn event(guid: impl Into<Guid>, event_name: impl Into<String>) -> Self {
        Self::with_kind(
            guid,
            "",
            NodeKind::Event {
                event_name: event_name.into(),
            },
        )
    }

    /// Create an exit node.
    pub fn exit(guid: impl Into<Guid>) -> Self {
        Self::with_kind(guid, "", NodeKind::Exit)
    }

    /// Attach a focus directive to a basic node. Other kinds are unchanged.
    pub fn with_focus(mut self, target: FocusTarget) -> Self {
        if let NodeKind::Basic { focus } = &mut self.kind {
            *focus = Some(target);
        }
        self
    }

    /// Set the authoring position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn is_entry(&self) -> bool {
        matches!(self.kind, NodeKind::Entry)
    }
}
