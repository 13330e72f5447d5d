//! Blackboard - typed story properties shared across every registered graph.
//!
//! Properties are resolved by name alone, across all registered graphs, so
//! one dialogue can flip a flag that another dialogue later checks. A name
//! must therefore be unique across the whole scope to be usable: zero matches
//! is [`BlackboardError::PropertyNotFound`], more than one (of any type, in any
//! graph) is [`BlackboardError::PropertyAmbiguous`].

mod scope;

pub use scope::*;

use dialogue_graph::{Graph, GraphId, PropertyKind, PropertyValue};
use tracing::{debug, warn};

use crate::error::BlackboardError;

/// Location of a property: (graph index, property index).
type Slot = (usize, usize);

/// Registered graphs, in registration order.
#[derive(Debug, Default)]
pub struct Blackboard {
    graphs: Vec<Graph>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graph to the resolution scope. Registering the same graph twice
    /// is a no-op.
    pub fn register(&mut self, graph: Graph) -> GraphId {
        let id = graph.id();
        if self.contains(id) {
            debug!(graph = %id, "graph already registered");
            return id;
        }

        debug!(graph = %id, properties = graph.properties().len(), "graph registered");
        self.graphs.push(graph);
        id
    }

    /// Remove a graph from the resolution scope, handing it back.
    pub fn unregister(&mut self, id: GraphId) -> Option<Graph> {
        let index = self.graphs.iter().position(|g| g.id() == id)?;
        debug!(graph = %id, "graph unregistered");
        Some(self.graphs.remove(index))
    }

    pub fn contains(&self, id: GraphId) -> bool {
        self.graphs.iter().any(|g| g.id() == id)
    }

    pub fn graph(&self, id: GraphId) -> Option<&Graph> {
        self.graphs.iter().find(|g| g.id() == id)
    }

    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.iter()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Find the single property called `name`.
    fn resolve(&self, name: &str) -> Result<Slot, BlackboardError> {
        let mut found = None;
        let mut count = 0;

        for (graph_index, graph) in self.graphs.iter().enumerate() {
            for (property_index, property) in graph.properties().iter().enumerate() {
                if property.name == name {
                    count += 1;
                    found.get_or_insert((graph_index, property_index));
                }
            }
        }

        match found {
            None => {
                warn!(property = name, "no property with that name");
                Err(BlackboardError::PropertyNotFound(name.to_string()))
            }
            Some(slot) if count == 1 => Ok(slot),
            Some(_) => {
                warn!(property = name, count, "ambiguous property name");
                Err(BlackboardError::PropertyAmbiguous {
                    name: name.to_string(),
                    count,
                })
            }
        }
    }

    /// Get the current value of a property.
    pub fn get(&self, name: &str) -> Result<&PropertyValue, BlackboardError> {
        let (graph_index, property_index) = self.resolve(name)?;
        Ok(&self.graphs[graph_index].properties()[property_index].value)
    }

    pub fn get_int(&self, name: &str) -> Result<i32, BlackboardError> {
        let value = self.get(name)?;
        value
            .as_int()
            .ok_or_else(|| mismatch(name, PropertyKind::Int, value.kind()))
    }

    pub fn get_string(&self, name: &str) -> Result<&str, BlackboardError> {
        let value = self.get(name)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(name, PropertyKind::String, value.kind()))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, BlackboardError> {
        let value = self.get(name)?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(name, PropertyKind::Bool, value.kind()))
    }

    /// Write a new value into the property called `name`.
    ///
    /// Returns the graph that owns the property so callers can refresh any
    /// state derived from that graph.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<GraphId, BlackboardError> {
        let value = value.into();
        let (graph_index, property_index) = self.resolve(name)?;
        let graph = &mut self.graphs[graph_index];
        let id = graph.id();
        let property = &mut graph.properties_mut()[property_index];

        if property.kind() != value.kind() {
            warn!(property = name, expected = %property.kind(), found = %value.kind(), "property type mismatch");
            return Err(mismatch(name, property.kind(), value.kind()));
        }

        debug!(graph = %id, property = name, value = %value, "property set");
        property.value = value;
        Ok(id)
    }
}

fn mismatch(name: &str, expected: PropertyKind, found: PropertyKind) -> BlackboardError {
    BlackboardError::PropertyTypeMismatch {
        name: name.to_string(),
        expected,
        found,
    }
}
