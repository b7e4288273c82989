//! Edge (relationship) in the property graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::{Node, NodeId, PropertyMap, Value, property_map::format_properties};

/// Server-assigned edge identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One end of an edge.
///
/// Edges composed by a caller own their endpoint nodes. Edges decoded from a
/// query result only know the endpoint ids; the full nodes, if needed, come
/// from other columns of the same result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Endpoint {
    Node(Box<Node>),
    Id(NodeId),
}

impl Endpoint {
    pub fn id(&self) -> NodeId {
        match self {
            Endpoint::Node(n) => n.id,
            Endpoint::Id(id) => *id,
        }
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            Endpoint::Node(n) => Some(n),
            Endpoint::Id(_) => None,
        }
    }
}

/// A directed edge carrying exactly one relationship type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub relation: String,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub properties: PropertyMap,
}

impl Edge {
    /// Compose an edge between two caller-owned nodes.
    pub fn new(relation: impl Into<String>, source: Node, destination: Node) -> Self {
        Self {
            id: EdgeId::default(),
            relation: relation.into(),
            source: Endpoint::Node(Box::new(source)),
            destination: Endpoint::Node(Box::new(destination)),
            properties: PropertyMap::new(),
        }
    }

    /// An edge whose endpoints are known only by id.
    pub fn between_ids(id: EdgeId, relation: impl Into<String>, src: NodeId, dst: NodeId) -> Self {
        Self {
            id,
            relation: relation.into(),
            source: Endpoint::Id(src),
            destination: Endpoint::Id(dst),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn src_node_id(&self) -> NodeId {
        self.source.id()
    }

    pub fn dst_node_id(&self) -> NodeId {
        self.destination.id()
    }

    /// Render as `(a)-[:R{k:v}]->(b)`.
    ///
    /// Returns `None` when either endpoint is id-only, since there is no
    /// alias to reference.
    pub fn encode(&self) -> Option<String> {
        let src = self.source.node()?;
        let dst = self.destination.node()?;

        let mut out = format!("({})-[", src.alias.as_deref().unwrap_or_default());
        if !self.relation.is_empty() {
            out.push(':');
            out.push_str(&self.relation);
        }
        if !self.properties.is_empty() {
            out.push('{');
            out.push_str(&format_properties(&self.properties));
            out.push('}');
        }
        out.push_str("]->(");
        out.push_str(dst.alias.as_deref().unwrap_or_default());
        out.push(')');
        Some(out)
    }
}

/// Properties only, as `{k:v,...}`.
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", format_properties(&self.properties))
    }
}
