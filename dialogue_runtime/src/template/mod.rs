//! Template Engine - substitutes `{name}` tokens in dialogue text.
//!
//! A template is built once per session from the session graph's own
//! properties. Properties declared by other registered graphs are not
//! substitutable, even though the blackboard can read and write them.

use dialogue_graph::{Graph, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of checking a condition variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionResult {
    True,
    False,
    /// No bool property with that name is declared on the graph.
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    /// Property name -> displayed text.
    replacements: HashMap<String, String>,

    /// Bool property name -> current value.
    conditions: HashMap<String, bool>,
}

impl TemplateEngine {
    /// Build the token and condition tables from a graph's properties.
    ///
    /// When a graph declares a name twice, the first declaration wins.
    pub fn build(graph: &Graph) -> Self {
        let mut template = Self::default();

        for property in graph.properties() {
            template
                .replacements
                .entry(property.name.clone())
                .or_insert_with(|| property.value.to_string());

            if let PropertyValue::Bool(value) = property.value {
                template
                    .conditions
                    .entry(property.name.clone())
                    .or_insert(value);
            }
        }

        template
    }

    /// Replace every known `{name}` token in `text`. Unknown tokens are kept
    /// verbatim.
    pub fn render(&self, text: &str) -> String {
        let mut rendered = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match after.find(['{', '}']) {
                Some(close) if after.as_bytes()[close] == b'}' => {
                    let name = &after[..close];
                    match self.replacements.get(name) {
                        Some(value) => rendered.push_str(value),
                        None => {
                            rendered.push('{');
                            rendered.push_str(name);
                            rendered.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                // Unterminated, or another brace opens first.
                _ => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }

    /// Patch a single token after its property changed.
    pub fn update(&mut self, name: &str, value: &PropertyValue) {
        if let Some(slot) = self.replacements.get_mut(name) {
            *slot = value.to_string();
        }

        if let (PropertyValue::Bool(value), Some(slot)) = (value, self.conditions.get_mut(name)) {
            *slot = *value;
        }
    }

    pub fn check_condition(&self, name: &str) -> ConditionResult {
        match self.conditions.get(name) {
            Some(true) => ConditionResult::True,
            Some(false) => ConditionResult::False,
            None => ConditionResult::Unknown,
        }
    }
}
