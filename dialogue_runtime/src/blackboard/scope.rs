//! Property access handed to hosts and event listeners.

use dialogue_graph::{GraphId, PropertyValue};

use super::Blackboard;
use crate::error::BlackboardError;
use crate::template::TemplateEngine;

/// Read/write view over the blackboard that keeps the active session's
/// template in step with property writes.
///
/// Listeners receive one during dispatch, so an event handler can bump a
/// counter that the very next line of dialogue displays.
pub struct PropertyScope<'a> {
    blackboard: &'a mut Blackboard,
    active: Option<(GraphId, &'a mut TemplateEngine)>,
}

impl<'a> PropertyScope<'a> {
    pub fn new(blackboard: &'a mut Blackboard) -> Self {
        Self {
            blackboard,
            active: None,
        }
    }

    /// Refresh `template` whenever a property of `graph` is written.
    pub fn with_active_template(mut self, graph: GraphId, template: &'a mut TemplateEngine) -> Self {
        self.active = Some((graph, template));
        self
    }

    pub fn get(&self, name: &str) -> Result<&PropertyValue, BlackboardError> {
        self.blackboard.get(name)
    }

    pub fn get_int(&self, name: &str) -> Result<i32, BlackboardError> {
        self.blackboard.get_int(name)
    }

    pub fn get_string(&self, name: &str) -> Result<&str, BlackboardError> {
        self.blackboard.get_string(name)
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, BlackboardError> {
        self.blackboard.get_bool(name)
    }

    /// Write a property and, if the active session's graph owns it, patch
    /// the session's template.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<(), BlackboardError> {
        let value = value.into();
        let owner = self.blackboard.set(name, value.clone())?;

        if let Some((active, template)) = self.active.as_mut() {
            if *active == owner {
                template.update(name, &value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_graph::{Graph, Property};

    #[test]
    fn test_set_refreshes_active_template() {
        let mut blackboard = Blackboard::new();
        let graph = Graph::new("entry").with_property(Property::int("COUNT", 1));
        let mut template = TemplateEngine::build(&graph);
        let id = blackboard.register(graph);

        let mut scope = PropertyScope::new(&mut blackboard).with_active_template(id, &mut template);
        scope.set("COUNT", 2).unwrap();
        assert_eq!(scope.get_int("COUNT"), Ok(2));

        assert_eq!(template.render("{COUNT}"), "2");
    }

    #[test]
    fn test_set_in_other_graph_leaves_template() {
        let mut blackboard = Blackboard::new();
        let active = Graph::new("a").with_property(Property::string("NAME", "Ava"));
        let mut template = TemplateEngine::build(&active);
        let active_id = blackboard.register(active);
        blackboard.register(Graph::new("b").with_property(Property::int("OTHER", 0)));

        let mut scope =
            PropertyScope::new(&mut blackboard).with_active_template(active_id, &mut template);
        scope.set("OTHER", 9).unwrap();

        assert_eq!(blackboard.get_int("OTHER"), Ok(9));
        assert_eq!(template.render("{NAME} {OTHER}"), "Ava {OTHER}");
    }

    #[test]
    fn test_errors_pass_through() {
        let mut blackboard = Blackboard::new();
        let mut scope = PropertyScope::new(&mut blackboard);

        assert_eq!(
            scope.set("missing", true),
            Err(BlackboardError::PropertyNotFound("missing".to_string()))
        );
    }
}
