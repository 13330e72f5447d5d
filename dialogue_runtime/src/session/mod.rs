//! Session state - the cursor and presentation of the one running dialogue.

mod host;

pub use host::*;

use dialogue_graph::{GraphId, Guid, PortIndex};
use serde::{Deserialize, Serialize};

use crate::template::TemplateEngine;

/// Where the session state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session.
    Idle,
    /// Advancing through auto-advancing nodes.
    Active,
    /// Paused on a basic or choice node until the host selects a port.
    AwaitingInput,
    /// Reached a terminal; cleanup returns the runtime to `Idle`.
    Ended,
}

/// Opaque reference to the actor a dialogue is held with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: String,
    pub display_name: Option<String>,
}

impl ActorRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// One selectable option shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentedOption {
    pub port: PortIndex,
    pub label: String,
}

impl PresentedOption {
    pub fn new(port: PortIndex, label: impl Into<String>) -> Self {
        Self {
            port,
            label: label.into(),
        }
    }
}

/// A rendered line waiting for the host's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub node: Guid,
    pub text: String,
    pub options: Vec<PresentedOption>,
    pub actor_name: Option<String>,
}

impl Presentation {
    /// Whether `port` is one of the offered options.
    pub fn offers(&self, port: PortIndex) -> bool {
        self.options.iter().any(|option| option.port == port)
    }
}

/// The active session.
#[derive(Debug)]
pub(crate) struct Session {
    pub graph: GraphId,
    pub cursor: Guid,
    pub state: SessionState,
    pub template: TemplateEngine,
    pub actor: Option<ActorRef>,
    pub presentation: Option<Presentation>,
}

impl Session {
    pub fn new(
        graph: GraphId,
        entry: Guid,
        template: TemplateEngine,
        actor: Option<ActorRef>,
    ) -> Self {
        Self {
            graph,
            cursor: entry,
            state: SessionState::Active,
            template,
            actor,
            presentation: None,
        }
    }
}
