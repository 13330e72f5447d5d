//! Strict structural checks for graphs.
//!
//! Traversal tolerates both problems checked here (a dangling link behaves as
//! if absent, the first of several links on one port wins). Hosts that prefer
//! to reject such graphs up front call [`Graph::validate`].

use std::collections::HashSet;

use super::Graph;
use crate::error::GraphError;

impl Graph {
    /// Check that every link resolves and no output port is bound twice.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut bound = HashSet::new();

        for link in self.links() {
            if !self.contains_node(&link.out_node_guid) || !self.contains_node(&link.in_node_guid) {
                return Err(GraphError::DanglingLink {
                    out_node: link.out_node_guid.clone(),
                    in_node: link.in_node_guid.clone(),
                    port: link.port_index,
                });
            }

            if !bound.insert((&link.out_node_guid, link.port_index)) {
                return Err(GraphError::DuplicatePortBinding {
                    node: link.out_node_guid.clone(),
                    port: link.port_index,
                });
            }
        }

        Ok(())
    }
}
