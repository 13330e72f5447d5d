//! # Dialogue Runtime
//!
//! Executes dialogue graphs built with `dialogue_graph`. The runtime walks a
//! graph node by node, substitutes blackboard properties into text, routes
//! condition nodes on bool properties and broadcasts event nodes to
//! registered listeners. Rendering and camera work are left to the host.
//!
//! ## Core Components
//!
//! - **blackboard**: name-resolved property storage spanning every registered graph
//! - **template**: `{NAME}` substitution and condition lookup for the active graph
//! - **traversal**: link resolution from a node and port to the next node
//! - **events**: listener registry and synchronous event dispatch
//! - **session**: session state, presentations and the host callback trait
//! - **runtime**: the session state machine tying the above together
//!
//! ## Usage
//!
//! ```no_run
//! use dialogue_graph::Graph;
//! use dialogue_runtime::{ActorRef, Runtime};
//!
//! let graph = Graph::load("greeting.json")?;
//! let mut runtime = Runtime::with_defaults();
//! let id = runtime.register_graph(graph)?;
//! runtime.start_session(id, Some(ActorRef::new("innkeeper")))?;
//! runtime.select_option(0)?;
//! # Ok::<(), dialogue_runtime::DialogueError>(())
//! ```

pub mod blackboard;
pub mod config;
pub mod error;
pub mod events;
pub mod runtime;
pub mod session;
pub mod template;
pub mod traversal;

pub use blackboard::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use runtime::*;
pub use session::*;
pub use template::*;
