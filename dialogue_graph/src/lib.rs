//! # Dialogue Graph
//!
//! The data model for branching dialogue: nodes, links and blackboard
//! properties. This crate holds no execution logic; it is the single source of
//! truth for what a finished dialogue asset contains.
//!
//! ## Core Components
//!
//! - **node**: node identifiers, positions and the closed set of node kinds
//! - **property**: typed story properties declared on a graph
//! - **graph**: the graph container, its link list and the persisted format

pub mod error;
pub mod graph;
pub mod node;
pub mod property;

pub use error::*;
pub use graph::*;
pub use node::*;
pub use property::*;
