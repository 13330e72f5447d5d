//! Host collaborator - the rendering and camera side of a dialogue.

use dialogue_graph::{FocusTarget, GraphId};

use super::{ActorRef, Presentation};
use crate::error::SessionError;

/// Callbacks from the runtime into the embedding application.
///
/// Only [`DialogueHost::present`] is required; the rest default to no-ops.
pub trait DialogueHost {
    /// Show a line and its options. Called on every pause for input.
    fn present(&mut self, presentation: &Presentation);

    fn on_session_start(&mut self, _graph: GraphId) {}

    fn on_session_end(&mut self, _graph: GraphId) {}

    /// Point the viewpoint at the player or the actor.
    fn focus(&mut self, _target: FocusTarget, _actor: Option<&ActorRef>) {}

    /// Remember the current viewpoint. Called before a session starts.
    fn snapshot_viewpoint(&mut self) {}

    /// Go back to the viewpoint remembered by `snapshot_viewpoint`.
    fn restore_viewpoint(&mut self) {}

    /// A fatal session error, reported just before the session ends.
    fn on_error(&mut self, _error: &SessionError) {}
}

/// Host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl DialogueHost for NullHost {
    fn present(&mut self, _presentation: &Presentation) {}
}
