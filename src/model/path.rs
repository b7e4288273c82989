//! Path: a sequence of alternating nodes and edges.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::{Edge, Node, Value};

/// A path in the graph: node -[edge]- node -[edge]- node ...
///
/// A well-formed path has one more node than edges. The empty path (no
/// nodes, no edges) stands in for anything that failed to assemble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PathRepr")]
pub struct Path {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Unchecked wire form; deserialized paths go through [`Path::new`].
#[derive(Deserialize)]
struct PathRepr {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl From<PathRepr> for Path {
    fn from(repr: PathRepr) -> Self {
        Path::new(repr.nodes, repr.edges)
    }
}

impl Path {
    /// Build a path, or the empty path if the counts do not line up.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let well_formed = match nodes.len() {
            0 => edges.is_empty(),
            n => edges.len() == n - 1,
        };
        if well_formed { Self { nodes, edges } } else { Self::default() }
    }

    /// Build a path from decoded values.
    ///
    /// All or nothing: if any element is not of the expected entity type,
    /// the result is the empty path rather than a partial one.
    pub fn from_values(nodes: Vec<Value>, edges: Vec<Value>) -> Self {
        let nodes: Option<Vec<Node>> = nodes
            .into_iter()
            .map(|v| match v {
                Value::Node(n) => Some(*n),
                _ => None,
            })
            .collect();
        let edges: Option<Vec<Edge>> = edges
            .into_iter()
            .map(|v| match v {
                Value::Edge(e) => Some(*e),
                _ => None,
            })
            .collect();

        match (nodes, edges) {
            (Some(nodes), Some(edges)) => Self::new(nodes, edges),
            _ => Self::default(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last_node(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// `<(1)-[10]->(2)<-[11]-(3)>`, arrows following each edge's direction.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (node, edge) in self.nodes.iter().zip(&self.edges) {
            write!(f, "({})", node.id)?;
            if node.id == edge.src_node_id() {
                write!(f, "-[{}]->", edge.id)?;
            } else {
                write!(f, "<-[{}]-", edge.id)?;
            }
        }
        if let Some(last) = self.nodes.last() {
            write!(f, "({})", last.id)?;
        }
        write!(f, ">")
    }
}
