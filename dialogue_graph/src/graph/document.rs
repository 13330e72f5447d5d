//! Persisted graph format, as read and written by the graph editor.
//!
//! Nodes are grouped into one list per kind and properties into one list per
//! type. Focus directives are stored as integers: basic nodes use
//! `0 = none, 1 = player, 2 = actor`, focus nodes use `0 = player, 1 = actor`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Graph, Link};
use crate::error::GraphError;
use crate::node::{FocusTarget, Guid, Node, NodeKind, PortIndex, Position};
use crate::property::{Property, PropertyValue};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub entry_guid: Guid,
    #[serde(default)]
    pub entry_position: Position,
    #[serde(default)]
    pub basic_nodes: Vec<BasicNodeRecord>,
    #[serde(default)]
    pub choice_nodes: Vec<ChoiceNodeRecord>,
    #[serde(default)]
    pub condition_nodes: Vec<ConditionNodeRecord>,
    #[serde(default)]
    pub focus_nodes: Vec<FocusNodeRecord>,
    #[serde(default)]
    pub event_nodes: Vec<EventNodeRecord>,
    #[serde(default)]
    pub exit_nodes: Vec<ExitNodeRecord>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub int_properties: Vec<PropertyRecord<i32>>,
    #[serde(default)]
    pub string_properties: Vec<PropertyRecord<String>>,
    #[serde(default)]
    pub bool_properties: Vec<PropertyRecord<bool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicNodeRecord {
    pub guid: Guid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub focus_choice: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceNodeRecord {
    pub guid: Guid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub choices: BTreeMap<PortIndex, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNodeRecord {
    pub guid: Guid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    pub variable_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusNodeRecord {
    pub guid: Guid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub focus_choice: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNodeRecord {
    pub guid: Guid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    pub event_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitNodeRecord {
    pub guid: Guid,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord<T> {
    pub guid: Guid,
    pub property_name: String,
    pub value: T,
}

fn basic_focus_from_choice(node: &Guid, choice: i32) -> Result<Option<FocusTarget>, GraphError> {
    match choice {
        0 => Ok(None),
        1 => Ok(Some(FocusTarget::Player)),
        2 => Ok(Some(FocusTarget::Actor)),
        _ => Err(GraphError::InvalidFocusChoice {
            node: node.clone(),
            choice,
        }),
    }
}

fn basic_focus_to_choice(focus: Option<FocusTarget>) -> i32 {
    match focus {
        None => 0,
        Some(FocusTarget::Player) => 1,
        Some(FocusTarget::Actor) => 2,
    }
}

fn focus_target_from_choice(node: &Guid, choice: i32) -> Result<FocusTarget, GraphError> {
    match choice {
        0 => Ok(FocusTarget::Player),
        1 => Ok(FocusTarget::Actor),
        _ => Err(GraphError::InvalidFocusChoice {
            node: node.clone(),
            choice,
        }),
    }
}

fn focus_target_to_choice(target: FocusTarget) -> i32 {
    match target {
        FocusTarget::Player => 0,
        FocusTarget::Actor => 1,
    }
}

impl TryFrom<GraphDocument> for Graph {
    type Error = GraphError;

    fn try_from(document: GraphDocument) -> Result<Self, Self::Error> {
        if document.entry_guid.as_str().is_empty() {
            return Err(GraphError::MissingEntry);
        }

        let mut graph = Graph::new(document.entry_guid).with_entry_position(document.entry_position);

        for record in document.basic_nodes {
            let focus = basic_focus_from_choice(&record.guid, record.focus_choice)?;
            graph.insert_node(Node {
                guid: record.guid,
                position: record.position,
                text: record.text,
                kind: NodeKind::Basic { focus },
            })?;
        }

        for record in document.choice_nodes {
            graph.insert_node(Node {
                guid: record.guid,
                position: record.position,
                text: record.text,
                kind: NodeKind::Choice {
                    choices: record.choices,
                },
            })?;
        }

        for record in document.condition_nodes {
            graph.insert_node(Node {
                guid: record.guid,
                position: record.position,
                text: record.text,
                kind: NodeKind::Condition {
                    variable: record.variable_name,
                },
            })?;
        }

        for record in document.focus_nodes {
            let target = focus_target_from_choice(&record.guid, record.focus_choice)?;
            graph.insert_node(Node {
                guid: record.guid,
                position: record.position,
                text: record.text,
                kind: NodeKind::Focus { target },
            })?;
        }

        for record in document.event_nodes {
            graph.insert_node(Node {
                guid: record.guid,
                position: record.position,
                text: record.text,
                kind: NodeKind::Event {
                    event_name: record.event_name,
                },
            })?;
        }

        for record in document.exit_nodes {
            graph.insert_node(Node::exit(record.guid).at(record.position))?;
        }

        for link in document.links {
            graph.add_link(link);
        }

        let ints = document
            .int_properties
            .into_iter()
            .map(|r| (r.guid, r.property_name, PropertyValue::Int(r.value)));
        let strings = document
            .string_properties
            .into_iter()
            .map(|r| (r.guid, r.property_name, PropertyValue::String(r.value)));
        let bools = document
            .bool_properties
            .into_iter()
            .map(|r| (r.guid, r.property_name, PropertyValue::Bool(r.value)));

        for (guid, name, value) in ints.chain(strings).chain(bools) {
            graph.add_property(Property { guid, name, value });
        }

        Ok(graph)
    }
}

impl From<&Graph> for GraphDocument {
    fn from(graph: &Graph) -> Self {
        let mut document = GraphDocument {
            entry_guid: graph.entry_guid().clone(),
            entry_position: graph.entry().position,
            links: graph.links().to_vec(),
            ..Default::default()
        };

        for node in graph.nodes() {
            let guid = node.guid.clone();
            let text = node.text.clone();
            let position = node.position;

            match &node.kind {
                NodeKind::Entry => {}
                NodeKind::Basic { focus } => document.basic_nodes.push(BasicNodeRecord {
                    guid,
                    text,
                    position,
                    focus_choice: basic_focus_to_choice(*focus),
                }),
                NodeKind::Choice { choices } => document.choice_nodes.push(ChoiceNodeRecord {
                    guid,
                    text,
                    position,
                    choices: choices.clone(),
                }),
                NodeKind::Condition { variable } => {
                    document.condition_nodes.push(ConditionNodeRecord {
                        guid,
                        text,
                        position,
                        variable_name: variable.clone(),
                    })
                }
                NodeKind::Focus { target } => document.focus_nodes.push(FocusNodeRecord {
                    guid,
                    text,
                    position,
                    focus_choice: focus_target_to_choice(*target),
                }),
                NodeKind::Event { event_name } => document.event_nodes.push(EventNodeRecord {
                    guid,
                    text,
                    position,
                    event_name: event_name.clone(),
                }),
                NodeKind::Exit => document.exit_nodes.push(ExitNodeRecord { guid, position }),
            }
        }

        for property in graph.properties() {
            let guid = property.guid.clone();
            let property_name = property.name.clone();
            match &property.value {
                PropertyValue::Int(value) => document.int_properties.push(PropertyRecord {
                    guid,
                    property_name,
                    value: *value,
                }),
                PropertyValue::String(value) => document.string_properties.push(PropertyRecord {
                    guid,
                    property_name,
                    value: value.clone(),
                }),
                PropertyValue::Bool(value) => document.bool_properties.push(PropertyRecord {
                    guid,
                    property_name,
                    value: *value,
                }),
            }
        }

        document
    }
}

impl From<Graph> for GraphDocument {
    fn from(graph: Graph) -> Self {
        GraphDocument::from(&graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = r#"{
        "entryGuid": "entry",
        "entryPosition": [0.0, 0.0],
        "basicNodes": [
            {"guid": "hello", "text": "Hi {NAME}", "position": [100.0, 0.0], "focusChoice": 2}
        ],
        "choiceNodes": [
            {"guid": "ask", "text": "Again?", "position": [200.0, 0.0], "choices": {"0": "Yes", "1": "No"}}
        ],
        "conditionNodes": [
            {"guid": "met", "text": "", "position": [300.0, 0.0], "variableName": "met"}
        ],
        "focusNodes": [
            {"guid": "look", "text": "", "position": [400.0, 0.0], "focusChoice": 0}
        ],
        "eventNodes": [
            {"guid": "spawn", "text": "", "position": [500.0, 0.0], "eventName": "spawn"}
        ],
        "exitNodes": [
            {"guid": "end", "position": [600.0, 0.0]}
        ],
        "links": [
            {"outNodeGuid": "entry", "inNodeGuid": "hello", "portIndex": 0},
            {"outNodeGuid": "hello", "inNodeGuid": "ask", "portIndex": 0},
            {"outNodeGuid": "ask", "inNodeGuid": "end", "portIndex": 1}
        ],
        "intProperties": [{"guid": "p1", "propertyName": "CUBE_COUNT", "value": 0}],
        "stringProperties": [{"guid": "p2", "propertyName": "NAME", "value": "Ava"}],
        "boolProperties": [{"guid": "p3", "propertyName": "met", "value": false}]
    }"#;

    #[test]
    fn test_load_document() {
        let graph = Graph::from_json_str(GREETING).unwrap();

        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.links().len(), 3);
        assert_eq!(graph.properties().len(), 3);

        let hello = graph.node(&Guid::from("hello")).unwrap();
        assert_eq!(
            hello.kind,
            NodeKind::Basic {
                focus: Some(FocusTarget::Actor)
            }
        );

        let look = graph.node(&Guid::from("look")).unwrap();
        assert_eq!(
            look.kind,
            NodeKind::Focus {
                target: FocusTarget::Player
            }
        );

        match &graph.node(&Guid::from("ask")).unwrap().kind {
            NodeKind::Choice { choices } => assert_eq!(choices[&1], "No"),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_save_and_reload_keeps_content() {
        let graph = Graph::from_json_str(GREETING).unwrap();
        let json = graph.to_json_string_pretty().unwrap();
        let reloaded = Graph::from_json_str(&json).unwrap();

        assert_eq!(reloaded.node_count(), graph.node_count());
        assert_eq!(reloaded.links(), graph.links());
        assert_eq!(reloaded.properties(), graph.properties());
        assert_ne!(reloaded.id(), graph.id());
    }

    #[test]
    fn test_missing_entry() {
        let result = Graph::from_json_str(r#"{"entryGuid": ""}"#);
        assert!(matches!(result, Err(GraphError::MissingEntry)));
    }

    #[test]
    fn test_invalid_focus_choice() {
        let json = r#"{
            "entryGuid": "entry",
            "focusNodes": [{"guid": "f", "focusChoice": 2}]
        }"#;

        match Graph::from_json_str(json) {
            Err(GraphError::InvalidFocusChoice { node, choice }) => {
                assert_eq!(node, Guid::from("f"));
                assert_eq!(choice, 2);
            }
            other => panic!("expected invalid focus choice, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_guid_across_kinds() {
        let json = r#"{
            "entryGuid": "entry",
            "basicNodes": [{"guid": "n", "text": "a"}],
            "exitNodes": [{"guid": "n"}]
        }"#;

        assert!(matches!(
            Graph::from_json_str(json),
            Err(GraphError::DuplicateGuid(_))
        ));
    }

    #[test]
    fn test_entry_guid_reused_by_node() {
        let json = r#"{
            "entryGuid": "entry",
            "exitNodes": [{"guid": "entry"}]
        }"#;

        assert!(matches!(
            Graph::from_json_str(json),
            Err(GraphError::DuplicateGuid(_))
        ));
    }

    #[test]
    fn test_graph_serde_uses_document_shape() {
        let graph = Graph::new("entry")
            .with_node(Node::exit("end"))
            .with_link("entry", "end", 0);

        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["entryGuid"], "entry");
        assert_eq!(value["exitNodes"][0]["guid"], "end");
        assert_eq!(value["links"][0]["outNodeGuid"], "entry");

        let back: Graph = serde_json::from_value(value).unwrap();
        assert_eq!(back.links(), graph.links());
    }
}
