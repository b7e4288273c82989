//! Node in the property graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value, property_map::format_properties};

/// Server-assigned node identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the property graph.
///
/// Decoded nodes never carry an alias; the alias only exists so that
/// caller-composed nodes can be written into query text via [`Node::encode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Labels in the order the server returned them.
    pub labels: Vec<String>,
    pub alias: Option<String>,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            alias: None,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Render the node as a query pattern, e.g. `(a:Person{name:"Ada"})`.
    pub fn encode(&self) -> String {
        let mut out = String::from("(");
        if let Some(alias) = &self.alias {
            out.push_str(alias);
        }
        for label in &self.labels {
            out.push(':');
            out.push_str(label);
        }
        if !self.properties.is_empty() {
            out.push('{');
            out.push_str(&format_properties(&self.properties));
            out.push('}');
        }
        out.push(')');
        out
    }
}

/// Properties only, as `{k:v,...}`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", format_properties(&self.properties))
    }
}
