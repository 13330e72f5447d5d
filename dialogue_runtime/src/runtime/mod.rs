//! Runtime - owns the blackboard, the listener registry and the one active
//! session, and drives the session state machine.
//!
//! The state machine:
//! 1. **Start**: `Idle -> Active`, rejected while another session runs
//! 2. **Advance**: follow the link on the selected port and act on the node
//!    - exit, or nothing connected: end the session
//!    - event: dispatch, continue on port 0
//!    - focus: move the viewpoint, continue on port 0
//!    - condition: continue on port 0 (true) or 1 (false); unknown variable is fatal
//!    - basic / choice: render, present, pause in `AwaitingInput`
//! 3. **Select**: `AwaitingInput -> Active` with the host's chosen port
//! 4. **Cleanup**: `Ended -> Idle`, restoring the host viewpoint
//!
//! Auto-advancing nodes are followed in a loop, never by recursion, so long
//! event/focus/condition chains run in constant stack space.

mod server;

pub use server::*;

use dialogue_graph::{
    FocusTarget, Graph, GraphId, Guid, NodeKind, PortIndex, PropertyValue, PORT_FALSE, PORT_TRUE,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::blackboard::{Blackboard, PropertyScope};
use crate::config::RuntimeConfig;
use crate::error::{BlackboardError, DialogueError, SessionError};
use crate::events::{DialogueListener, EventDispatcher};
use crate::session::{
    ActorRef, DialogueHost, NullHost, Presentation, PresentedOption, Session, SessionState,
};
use crate::template::{ConditionResult, TemplateEngine};
use crate::traversal;

/// What one advance step decided.
enum Step {
    /// Keep advancing on this port.
    Continue(PortIndex),
    /// Paused for input.
    Pause,
    /// Reached a terminal.
    Finish,
    /// Fatal error; the session must end.
    Fail(SessionError),
}

/// The dialogue runtime. At most one session runs at a time.
pub struct Runtime<H: DialogueHost = NullHost> {
    config: RuntimeConfig,
    blackboard: Blackboard,
    dispatcher: EventDispatcher,
    session: Option<Session>,
    host: H,
}

impl Runtime<NullHost> {
    /// Create a runtime with default configuration and no host.
    pub fn with_defaults() -> Self {
        Self::new(RuntimeConfig::default(), NullHost)
    }
}

impl<H: DialogueHost> Runtime<H> {
    pub fn new(config: RuntimeConfig, host: H) -> Self {
        Self {
            config,
            blackboard: Blackboard::new(),
            dispatcher: EventDispatcher::new(),
            session: None,
            host,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    /// Add a graph to the blackboard scope. With `strict_links` set, graphs
    /// with dangling links or doubly bound ports are rejected.
    pub fn register_graph(&mut self, graph: Graph) -> Result<GraphId, DialogueError> {
        if self.config.strict_links {
            graph.validate()?;
        }
        Ok(self.blackboard.register(graph))
    }

    /// Remove a graph from the blackboard scope. Stops the session first if
    /// it is running on that graph.
    pub fn unregister_graph(&mut self, id: GraphId) -> Option<Graph> {
        if self.active_graph() == Some(id) {
            self.force_stop();
        }
        self.blackboard.unregister(id)
    }

    pub fn register_listener(&mut self, listener: Arc<dyn DialogueListener>) -> bool {
        self.dispatcher.register(listener)
    }

    pub fn deregister_listener(&mut self, listener: Arc<dyn DialogueListener>) -> bool {
        self.dispatcher.deregister(listener)
    }

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|session| session.state)
            .unwrap_or(SessionState::Idle)
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_graph(&self) -> Option<GraphId> {
        self.session.as_ref().map(|session| session.graph)
    }

    /// Guid of the node the session is on.
    pub fn current_node(&self) -> Option<&Guid> {
        self.session.as_ref().map(|session| &session.cursor)
    }

    /// The line currently waiting for input.
    pub fn presentation(&self) -> Option<&Presentation> {
        self.session
            .as_ref()
            .and_then(|session| session.presentation.as_ref())
    }

    /// Start a dialogue on a registered graph and run it to its first pause.
    ///
    /// Returns `AwaitingInput` when a line is presented, or `Ended` when the
    /// graph finished without one.
    pub fn start_session(
        &mut self,
        graph: GraphId,
        actor: Option<ActorRef>,
    ) -> Result<SessionState, DialogueError> {
        if let Some(active) = &self.session {
            warn!(active = %active.graph, requested = %graph, "a dialogue session is already running");
            return Err(SessionError::SessionRejected.into());
        }

        let Some(dialogue) = self.blackboard.graph(graph) else {
            return Err(SessionError::GraphNotRegistered(graph).into());
        };

        if actor.is_none() {
            warn!(graph = %graph, "no actor specified, actor focus will be skipped");
        }

        let template = TemplateEngine::build(dialogue);
        let entry = dialogue.entry_guid().clone();

        self.host.snapshot_viewpoint();
        self.session = Some(Session::new(graph, entry, template, actor));

        info!(graph = %graph, "dialogue session started");
        self.host.on_session_start(graph);

        self.run(0)
    }

    /// Resume a paused session with the host's chosen port (0 to continue a
    /// basic node). Does nothing unless the session is awaiting input or the
    /// port is not one of the presented options.
    pub fn select_option(&mut self, port: PortIndex) -> Result<SessionState, DialogueError> {
        let Some(session) = self.session.as_mut() else {
            debug!(port, "option selected with no running session");
            return Ok(SessionState::Idle);
        };

        if session.state != SessionState::AwaitingInput {
            return Ok(session.state);
        }

        if let Some(presentation) = &session.presentation {
            if !presentation.offers(port) {
                warn!(node = %presentation.node, port, "selected port was not offered");
                return Ok(SessionState::AwaitingInput);
            }
        }

        session.presentation = None;
        session.state = SessionState::Active;
        self.run(port)
    }

    /// Stop the running session immediately, skipping any remaining nodes.
    pub fn force_stop(&mut self) {
        if let Some(session) = &self.session {
            info!(graph = %session.graph, node = %session.cursor, "dialogue session stopped by host");
            self.end_session();
        }
    }

    /// Property access that refreshes the active session's template.
    pub fn properties(&mut self) -> PropertyScope<'_> {
        let scope = PropertyScope::new(&mut self.blackboard);
        match self.session.as_mut() {
            Some(session) => scope.with_active_template(session.graph, &mut session.template),
            None => scope,
        }
    }

    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), BlackboardError> {
        self.properties().set(name, value)
    }

    pub fn get_property(&self, name: &str) -> Result<&PropertyValue, BlackboardError> {
        self.blackboard.get(name)
    }

    pub fn get_int_property(&self, name: &str) -> Result<i32, BlackboardError> {
        self.blackboard.get_int(name)
    }

    pub fn get_string_property(&self, name: &str) -> Result<&str, BlackboardError> {
        self.blackboard.get_string(name)
    }

    pub fn get_bool_property(&self, name: &str) -> Result<bool, BlackboardError> {
        self.blackboard.get_bool(name)
    }

    /// Advance until the session pauses, ends or fails.
    fn run(&mut self, mut port: PortIndex) -> Result<SessionState, DialogueError> {
        let mut auto_steps = 0usize;

        loop {
            match self.step(port) {
                Step::Continue(next) => {
                    auto_steps += 1;
                    if auto_steps > self.config.max_auto_advance {
                        let limit = self.config.max_auto_advance;
                        return Err(self.abort(SessionError::AutoAdvanceLimit { limit }));
                    }
                    port = next;
                }
                Step::Pause => return Ok(SessionState::AwaitingInput),
                Step::Finish => {
                    self.end_session();
                    return Ok(SessionState::Ended);
                }
                Step::Fail(err) => return Err(self.abort(err)),
            }
        }
    }

    /// Follow one link and act on the node it leads to.
    fn step(&mut self, port: PortIndex) -> Step {
        let Some(session) = self.session.as_mut() else {
            return Step::Finish;
        };
        session.state = SessionState::Active;

        let Some(graph) = self.blackboard.graph(session.graph) else {
            warn!(graph = %session.graph, "session graph is no longer registered");
            return Step::Finish;
        };

        let node = match traversal::next(graph, &session.cursor, port) {
            Some(node) => node.clone(),
            None => {
                debug!(node = %session.cursor, port, "nothing connected, ending dialogue");
                return Step::Finish;
            }
        };

        debug!(node = %node.guid, kind = node.kind.name(), "entering node");
        session.cursor = node.guid.clone();

        match node.kind {
            NodeKind::Exit => Step::Finish,

            // Only reachable through a link back to the start.
            NodeKind::Entry => Step::Continue(0),

            NodeKind::Event { event_name } => {
                let mut properties = PropertyScope::new(&mut self.blackboard)
                    .with_active_template(session.graph, &mut session.template);
                self.dispatcher.dispatch(&event_name, &mut properties);
                Step::Continue(0)
            }

            NodeKind::Focus { target } => {
                apply_focus(&mut self.host, &self.config, session.actor.as_ref(), target);
                Step::Continue(0)
            }

            NodeKind::Condition { variable } => match session.template.check_condition(&variable) {
                ConditionResult::True => Step::Continue(PORT_TRUE),
                ConditionResult::False => Step::Continue(PORT_FALSE),
                ConditionResult::Unknown => Step::Fail(SessionError::UnknownConditionVariable {
                    node: node.guid,
                    variable,
                }),
            },

            NodeKind::Basic { focus } => {
                if let Some(target) = focus {
                    apply_focus(&mut self.host, &self.config, session.actor.as_ref(), target);
                }

                let options = vec![PresentedOption::new(0, self.config.continue_label.clone())];
                let presentation = Presentation {
                    node: node.guid,
                    text: session.template.render(&node.text),
                    options,
                    actor_name: actor_name(&self.config, session.actor.as_ref()),
                };

                self.host.present(&presentation);
                session.presentation = Some(presentation);
                session.state = SessionState::AwaitingInput;
                Step::Pause
            }

            NodeKind::Choice { choices } => {
                let options = choices
                    .into_iter()
                    .map(|(port, label)| PresentedOption::new(port, label))
                    .collect();
                let presentation = Presentation {
                    node: node.guid,
                    text: session.template.render(&node.text),
                    options,
                    actor_name: actor_name(&self.config, session.actor.as_ref()),
                };

                self.host.present(&presentation);
                session.presentation = Some(presentation);
                session.state = SessionState::AwaitingInput;
                Step::Pause
            }
        }
    }

    /// Report a fatal error to the host and end the session.
    fn abort(&mut self, err: SessionError) -> DialogueError {
        error!(error = %err, "dialogue session aborted");
        self.host.on_error(&err);
        self.end_session();
        err.into()
    }

    /// Cleanup: `Ended -> Idle`.
    fn end_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.state = SessionState::Ended;
        session.presentation = None;

        if self.config.restore_viewpoint_on_exit {
            self.host.restore_viewpoint();
        }

        info!(graph = %session.graph, node = %session.cursor, "dialogue session ended");
        self.host.on_session_end(session.graph);
    }
}

impl<H: DialogueHost + Default> Default for Runtime<H> {
    fn default() -> Self {
        Self::new(RuntimeConfig::default(), H::default())
    }
}

fn apply_focus<H: DialogueHost>(
    host: &mut H,
    config: &RuntimeConfig,
    actor: Option<&ActorRef>,
    target: FocusTarget,
) {
    if !config.focus_on_actor {
        return;
    }
    if target == FocusTarget::Actor && actor.is_none() {
        warn!("actor focus requested but the session has no actor");
        return;
    }
    host.focus(target, actor);
}

fn actor_name(config: &RuntimeConfig, actor: Option<&ActorRef>) -> Option<String> {
    if !config.display_actor_names {
        return None;
    }
    actor.map(|actor| actor.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_graph::{Node, Property};

    #[derive(Default)]
    struct Recording {
        presented: Vec<Presentation>,
        focused: Vec<FocusTarget>,
        restored: usize,
        errors: Vec<SessionError>,
    }

    impl DialogueHost for Recording {
        fn present(&mut self, presentation: &Presentation) {
            self.presented.push(presentation.clone());
        }

        fn focus(&mut self, target: FocusTarget, _actor: Option<&ActorRef>) {
            self.focused.push(target);
        }

        fn restore_viewpoint(&mut self) {
            self.restored += 1;
        }

        fn on_error(&mut self, error: &SessionError) {
            self.errors.push(error.clone());
        }
    }

    fn runtime() -> Runtime<Recording> {
        Runtime::default()
    }

    #[test]
    fn test_basic_line_pauses_then_ends() {
        let mut rt = runtime();
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::basic("hello", "Hello"))
                    .with_link("entry", "hello", 0),
            )
            .unwrap();

        assert_eq!(rt.start_session(id, None).unwrap(), SessionState::AwaitingInput);
        let shown = rt.presentation().unwrap();
        assert_eq!(shown.text, "Hello");
        assert_eq!(shown.options, vec![PresentedOption::new(0, "Continue")]);

        assert_eq!(rt.select_option(0).unwrap(), SessionState::Ended);
        assert_eq!(rt.state(), SessionState::Idle);
        assert_eq!(rt.host().restored, 1);
    }

    #[test]
    fn test_second_session_rejected() {
        let mut rt = runtime();
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::basic("hello", "Hello"))
                    .with_link("entry", "hello", 0),
            )
            .unwrap();

        rt.start_session(id, None).unwrap();
        let err = rt.start_session(id, None).unwrap_err();
        assert_eq!(err.as_session(), Some(&SessionError::SessionRejected));
        assert_eq!(rt.state(), SessionState::AwaitingInput);
    }

    #[test]
    fn test_unregistered_graph() {
        let mut rt = runtime();
        let missing = GraphId::new();
        let err = rt.start_session(missing, None).unwrap_err();
        assert_eq!(
            err.as_session(),
            Some(&SessionError::GraphNotRegistered(missing))
        );
    }

    #[test]
    fn test_unoffered_port_is_ignored() {
        let mut rt = runtime();
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::choice("ask", "Pick", [(0, "A"), (1, "B")]))
                    .with_link("entry", "ask", 0),
            )
            .unwrap();

        rt.start_session(id, None).unwrap();
        assert_eq!(rt.select_option(5).unwrap(), SessionState::AwaitingInput);
        assert_eq!(rt.current_node(), Some(&Guid::from("ask")));

        // Port 1 is offered but nothing is connected to it.
        assert_eq!(rt.select_option(1).unwrap(), SessionState::Ended);
    }

    #[test]
    fn test_focus_requires_actor() {
        let mut rt = runtime();
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::focus("look", FocusTarget::Actor))
                    .with_node(Node::focus("back", FocusTarget::Player))
                    .with_link("entry", "look", 0)
                    .with_link("look", "back", 0),
            )
            .unwrap();

        assert_eq!(rt.start_session(id, None).unwrap(), SessionState::Ended);
        assert_eq!(rt.host().focused, vec![FocusTarget::Player]);

        rt.start_session(id, Some(ActorRef::new("npc"))).unwrap();
        assert_eq!(
            rt.host().focused,
            vec![FocusTarget::Player, FocusTarget::Actor, FocusTarget::Player]
        );
    }

    #[test]
    fn test_focus_disabled_by_config() {
        let config = RuntimeConfig {
            focus_on_actor: false,
            ..RuntimeConfig::default()
        };
        let mut rt = Runtime::new(config, Recording::default());
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::basic("hi", "Hi").with_focus(FocusTarget::Actor))
                    .with_link("entry", "hi", 0),
            )
            .unwrap();

        rt.start_session(id, Some(ActorRef::new("npc"))).unwrap();
        assert!(rt.host().focused.is_empty());
    }

    #[test]
    fn test_event_cycle_hits_limit() {
        let config = RuntimeConfig {
            max_auto_advance: 50,
            ..RuntimeConfig::default()
        };
        let mut rt = Runtime::new(config, Recording::default());
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::event("ping", "ping"))
                    .with_node(Node::event("pong", "pong"))
                    .with_link("entry", "ping", 0)
                    .with_link("ping", "pong", 0)
                    .with_link("pong", "ping", 0),
            )
            .unwrap();

        let err = rt.start_session(id, None).unwrap_err();
        assert_eq!(
            err.as_session(),
            Some(&SessionError::AutoAdvanceLimit { limit: 50 })
        );
        assert_eq!(rt.state(), SessionState::Idle);
        assert_eq!(rt.host().errors.len(), 1);
    }

    #[test]
    fn test_actor_names_when_enabled() {
        let config = RuntimeConfig {
            display_actor_names: true,
            continue_label: "Next".to_string(),
            ..RuntimeConfig::default()
        };
        let mut rt = Runtime::new(config, Recording::default());
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::basic("hi", "Hi"))
                    .with_link("entry", "hi", 0),
            )
            .unwrap();

        rt.start_session(id, Some(ActorRef::new("npc-1").with_display_name("Greta")))
            .unwrap();
        let shown = rt.presentation().unwrap();
        assert_eq!(shown.actor_name.as_deref(), Some("Greta"));
        assert_eq!(shown.options[0].label, "Next");
    }

    #[test]
    fn test_strict_links_rejects_dangling() {
        let config = RuntimeConfig {
            strict_links: true,
            ..RuntimeConfig::default()
        };
        let mut rt = Runtime::new(config, Recording::default());
        let result = rt.register_graph(Graph::new("entry").with_link("entry", "ghost", 0));
        assert!(matches!(result, Err(DialogueError::Graph(_))));
        assert!(rt.blackboard().is_empty());
    }

    #[test]
    fn test_unregister_active_graph_stops_session() {
        let mut rt = runtime();
        let id = rt
            .register_graph(
                Graph::new("entry")
                    .with_node(Node::basic("hi", "Hi"))
                    .with_link("entry", "hi", 0)
                    .with_property(Property::int("COUNT", 0)),
            )
            .unwrap();

        rt.start_session(id, None).unwrap();
        assert!(rt.unregister_graph(id).is_some());
        assert_eq!(rt.state(), SessionState::Idle);
        assert!(rt.get_int_property("COUNT").is_err());
    }
}
