//! Graph tuples produced by the extractors
//!
//! Every source is normalized into two shapes: nodes keyed by a primary id
//! and edges between two primary ids. Attribute maps are ordered so that the
//! serialized output is stable between runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered attribute mapping carried by nodes and edges
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        AttributeValue::List(value)
    }
}

/// A node: primary id, node type label, display name and attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTuple {
    pub id: String,
    pub label: String,
    pub name: String,
    pub attributes: Attributes,
}

impl NodeTuple {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        name: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            name: name.into(),
            attributes,
        }
    }
}

/// An edge: source id, target id, relationship label and attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTuple {
    pub source_id: String,
    pub target_id: String,
    pub label: String,
    pub attributes: Attributes,
}

impl EdgeTuple {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        label: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: label.into(),
            attributes,
        }
    }
}
