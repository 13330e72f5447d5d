//! Blackboard property definitions.

use serde::{Deserialize, Serialize};

use crate::node::Guid;

/// Declared type of a blackboard property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Int,
    String,
    Bool,
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropertyKind::Int => "int",
            PropertyKind::String => "string",
            PropertyKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Int(i32),
    String(String),
    Bool(bool),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Bool(_) => PropertyKind::Bool,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// Text substituted for the property's token in dialogue lines.
impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::String(v) => f.write_str(v),
            PropertyValue::Bool(true) => f.write_str("True"),
            PropertyValue::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

/// A named story property declared on a graph.
///
/// Names are not unique: two properties, even of different kinds or in
/// different graphs, may share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub guid: Guid,
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    /// Create a property with a fresh guid.
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            guid: Guid::new(),
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, value)
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value.into())
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, value)
    }

    /// Use a specific guid instead of a generated one.
    pub fn with_guid(mut self, guid: impl Into<Guid>) -> Self {
        self.guid = guid.into();
        self
    }

    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_constructors() {
        assert_eq!(Property::int("COUNT", 3).kind(), PropertyKind::Int);
        assert_eq!(Property::string("NAME", "Ava").kind(), PropertyKind::String);
        assert_eq!(Property::bool("met", false).kind(), PropertyKind::Bool);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(PropertyValue::Int(-4).to_string(), "-4");
        assert_eq!(PropertyValue::from("Ava").to_string(), "Ava");
        assert_eq!(PropertyValue::Bool(true).to_string(), "True");
        assert_eq!(PropertyValue::Bool(false).to_string(), "False");
    }

    #[test]
    fn test_value_accessors() {
        let value = PropertyValue::Int(7);
        assert_eq!(value.as_int(), Some(7));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_str(), None);

        assert_eq!(PropertyValue::from("x").as_str(), Some("x"));
        assert_eq!(PropertyValue::from(false).as_bool(), Some(false));
    }

    #[test]
    fn test_with_guid() {
        let property = Property::bool("met", true).with_guid("p-1");
        assert_eq!(property.guid, Guid::from("p-1"));
    }
}
