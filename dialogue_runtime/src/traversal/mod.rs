//! Traversal Engine - pure graph navigation.

use dialogue_graph::{Graph, Guid, Node, PortIndex};

/// Resolve the node connected to `port` of `current`.
///
/// Takes the first link (in declaration order) leaving `current` on `port`.
/// Returns `None` when no link matches or its target does not exist; `None`
/// is the "nothing connected here" terminal, distinct from an exit node.
pub fn next<'g>(graph: &'g Graph, current: &Guid, port: PortIndex) -> Option<&'g Node> {
    let link = graph
        .outgoing(current)
        .find(|link| link.port_index == port)?;
    graph.node(&link.in_node_guid)
}
