//! Dialogue Graph - the node table, link list and declared properties of one
//! dialogue asset.

mod document;
mod validate;

pub use document::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

use crate::error::GraphError;
use crate::node::{Guid, Node, PortIndex, Position};
use crate::property::Property;

/// Runtime identity of a loaded graph. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Create a new random graph ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directed edge from one output port of a node to the input of another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub out_node_guid: Guid,
    pub in_node_guid: Guid,
    pub port_index: PortIndex,
}

impl Link {
    pub fn new(out_node: impl Into<Guid>, in_node: impl Into<Guid>, port: PortIndex) -> Self {
        Self {
            out_node_guid: out_node.into(),
            in_node_guid: in_node.into(),
            port_index: port,
        }
    }
}

/// One dialogue asset.
///
/// Nodes live in an arena indexed by guid; links refer to nodes by guid only.
/// Traversal never mutates a graph. The only runtime mutation is writing new
/// property values through [`Graph::properties_mut`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "GraphDocument", try_from = "GraphDocument")]
pub struct Graph {
    id: GraphId,
    entry_guid: Guid,

    /// Every node including the entry, in insertion order.
    nodes: Vec<Node>,

    /// Index: guid -> position in `nodes`.
    node_index: HashMap<Guid, usize>,

    links: Vec<Link>,

    /// Int, string and bool properties in declaration order.
    properties: Vec<Property>,
}

impl Graph {
    /// Create a graph holding only its entry node.
    pub fn new(entry_guid: impl Into<Guid>) -> Self {
        let entry = Node::entry(entry_guid, Position::default());
        let entry_guid = entry.guid.clone();
        let mut node_index = HashMap::new();
        node_index.insert(entry_guid.clone(), 0);

        Self {
            id: GraphId::new(),
            entry_guid,
            nodes: vec![entry],
            node_index,
            links: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Load a graph from its persisted JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Graph::try_from(document)
    }

    /// Read and parse a graph file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(&GraphDocument::from(self))?)
    }

    /// Write the graph in its persisted JSON form.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        std::fs::write(path, self.to_json_string_pretty()?)?;
        Ok(())
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn entry_guid(&self) -> &Guid {
        &self.entry_guid
    }

    /// The entry node. Always present.
    pub fn entry(&self) -> &Node {
        &self.nodes[self.node_index[&self.entry_guid]]
    }

    /// Move the entry node in the authoring view.
    pub fn with_entry_position(mut self, position: Position) -> Self {
        let index = self.node_index[&self.entry_guid];
        self.nodes[index].position = position;
        self
    }

    /// Add a node. Fails on a reused guid or a second entry node.
    pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if node.is_entry() {
            return Err(GraphError::MultipleEntries(node.guid));
        }
        if self.node_index.contains_key(&node.guid) {
            return Err(GraphError::DuplicateGuid(node.guid));
        }

        self.node_index.insert(node.guid.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Builder form of [`Graph::insert_node`]. Rejected nodes are logged and dropped.
    pub fn with_node(mut self, node: Node) -> Self {
        if let Err(err) = self.insert_node(node) {
            warn!(graph = %self.id, error = %err, "ignoring node");
        }
        self
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn with_link(
        mut self,
        out_node: impl Into<Guid>,
        in_node: impl Into<Guid>,
        port: PortIndex,
    ) -> Self {
        self.add_link(Link::new(out_node, in_node, port));
        self
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.add_property(property);
        self
    }

    /// Get node by guid.
    pub fn node(&self, guid: &Guid) -> Option<&Node> {
        self.node_index.get(guid).map(|&index| &self.nodes[index])
    }

    pub fn contains_node(&self, guid: &Guid) -> bool {
        self.node_index.contains_key(guid)
    }

    /// Get all nodes, entry first.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Links leaving `guid`, in declaration order.
    pub fn outgoing<'a>(&'a self, guid: &'a Guid) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |link| &link.out_node_guid == guid)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Property entries, for writing new values. The set itself is fixed.
    pub fn properties_mut(&mut self) -> &mut [Property] {
        &mut self.properties
    }
}
