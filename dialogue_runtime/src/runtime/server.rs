//! Dialogue servers - a graph paired with the actor who speaks it.

use dialogue_graph::GraphId;
use serde::{Deserialize, Serialize};

use super::Runtime;
use crate::error::DialogueError;
use crate::session::{ActorRef, DialogueHost, SessionState};

/// Binds one registered graph to an actor, so an interaction trigger can
/// start "this NPC's dialogue" without knowing the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueServer {
    graph: GraphId,
    actor: Option<ActorRef>,
}

impl DialogueServer {
    pub fn new(graph: GraphId) -> Self {
        Self { graph, actor: None }
    }

    pub fn with_actor(mut self, actor: ActorRef) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn graph(&self) -> GraphId {
        self.graph
    }

    pub fn actor(&self) -> Option<&ActorRef> {
        self.actor.as_ref()
    }
}

impl<H: DialogueHost> Runtime<H> {
    /// Start the server's dialogue with its actor.
    pub fn serve(&mut self, server: &DialogueServer) -> Result<SessionState, DialogueError> {
        self.start_session(server.graph, server.actor.clone())
    }
}
