//! Graph entity decoding: nodes, edges and paths.
//!
//! Labels, relationship types and property keys arrive as schema ids and
//! are resolved through the [`Resolver`] handed in by the caller.

use super::{Reply, expect_array, expect_int, scalar};
use crate::model::{Edge, EdgeId, Endpoint, Node, NodeId, Path, PropertyMap, Value};
use crate::schema::{Resolver, SchemaKind};
use crate::{Error, Result};

/// `[id, [label_id, ...], [property, ...]]`
pub fn decode_node(cell: &Reply, schema: &dyn Resolver) -> Result<Node> {
    let [id, label_ids, props, ..] = expect_array(cell, "node payload")? else {
        return Err(Error::Shape("invalid node payload".into()));
    };

    let id = entity_id(id, "node id")?;
    let labels = expect_array(label_ids, "node labels")?
        .iter()
        .map(|lid| schema.resolve(SchemaKind::Label, expect_int(lid, "label id")?))
        .collect::<Result<Vec<_>>>()?;
    let properties = decode_properties(expect_array(props, "node properties")?, schema)?;

    Ok(Node {
        id: NodeId(id),
        labels,
        alias: None,
        properties,
    })
}

/// `[id, relation_id, src_id, dst_id, [property, ...]]`
///
/// Endpoints stay id-only; the nodes themselves are not part of the cell.
pub fn decode_edge(cell: &Reply, schema: &dyn Resolver) -> Result<Edge> {
    let [id, relation, src, dst, props, ..] = expect_array(cell, "edge payload")? else {
        return Err(Error::Shape("invalid edge payload".into()));
    };

    let id = entity_id(id, "edge id")?;
    let relation = schema.resolve(
        SchemaKind::RelationshipType,
        expect_int(relation, "edge relation id")?,
    )?;
    let src = entity_id(src, "edge src id")?;
    let dst = entity_id(dst, "edge dest id")?;
    let properties = decode_properties(expect_array(props, "edge properties")?, schema)?;

    Ok(Edge {
        id: EdgeId(id),
        relation,
        source: Endpoint::Id(NodeId(src)),
        destination: Endpoint::Id(NodeId(dst)),
        properties,
    })
}

/// `[[ARRAY, [node cells]], [ARRAY, [edge cells]]]`
///
/// Structural problems are errors. Elements that decode fine but are not
/// nodes (resp. edges) yield the empty path.
pub fn decode_path(cell: &Reply, schema: &dyn Resolver) -> Result<Path> {
    let [nodes, edges, ..] = expect_array(cell, "path payload")? else {
        return Err(Error::Shape("path payload invalid".into()));
    };

    let nodes = scalar::decode_cell(nodes, schema)?;
    let edges = scalar::decode_cell(edges, schema)?;
    match (nodes, edges) {
        (Value::List(nodes), Value::List(edges)) => Ok(Path::from_values(nodes, edges)),
        _ => Err(Error::Shape("parsed path nodes or edges not array".into())),
    }
}

/// `[[key_id, tag, payload], ...]`
fn decode_properties(raw: &[Reply], schema: &dyn Resolver) -> Result<PropertyMap> {
    let mut properties = PropertyMap::with_capacity(raw.len());
    for prop in raw {
        let p = expect_array(prop, "property")?;
        if p.len() < 3 {
            return Err(Error::Shape("invalid property format".into()));
        }
        let key = schema.resolve(SchemaKind::PropertyKey, expect_int(&p[0], "property index")?)?;
        let value = scalar::decode_tagged(&p[1..], schema)?;
        properties.insert(key, value);
    }
    Ok(properties)
}

fn entity_id(reply: &Reply, what: &str) -> Result<u64> {
    let id = expect_int(reply, what)?;
    u64::try_from(id).map_err(|_| Error::Shape(format!("{what} is negative: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply;
    use crate::schema::SchemaCache;
    use pretty_assertions::assert_eq;

    fn schema() -> SchemaCache {
        SchemaCache::with_data(
            ["Person", "Admin"],
            ["KNOWS", "OWNS"],
            ["name", "age"],
        )
    }

    #[test]
    fn test_node_with_labels() {
        let node = decode_node(&reply![7, [0, 1], []], &schema()).unwrap();
        assert_eq!(
            node,
            Node::new(NodeId(7)).with_labels(["Person", "Admin"])
        );
    }

    #[test]
    fn test_node_properties() {
        let node = decode_node(&reply![1, [0], [[0, 2, "Ada"], [1, 3, 36]]], &schema()).unwrap();
        assert_eq!(node.get("name"), Some(&Value::from("Ada")));
        assert_eq!(node.get("age"), Some(&Value::Int(36)));
        assert_eq!(node.alias, None);
    }

    #[test]
    fn test_node_unknown_label_without_refresh() {
        let err = decode_node(&reply![1, [5], []], &schema()).unwrap_err();
        assert_eq!(err.to_string(), "unknown label index 5");
    }

    #[test]
    fn test_node_shape_errors() {
        assert!(decode_node(&reply![1, [0]], &schema()).unwrap_err().to_string().contains("invalid node payload"));
        assert!(decode_node(&reply!["x", [0], []], &schema()).unwrap_err().to_string().contains("node id not int64"));
        assert!(decode_node(&reply![1, 0, []], &schema()).unwrap_err().to_string().contains("node labels is not array"));
        assert!(decode_node(&reply![1, [0], [[0, 2]]], &schema()).unwrap_err().to_string().contains("invalid property format"));
        assert!(decode_node(&reply![(-1), [], []], &schema()).is_err());
    }

    #[test]
    fn test_edge_ids_only() {
        let edge = decode_edge(&reply![3, 1, 10, 11, [[1, 3, 2020]]], &schema()).unwrap();
        assert_eq!(edge.id, EdgeId(3));
        assert_eq!(edge.relation, "OWNS");
        assert_eq!(edge.source, Endpoint::Id(NodeId(10)));
        assert_eq!(edge.destination, Endpoint::Id(NodeId(11)));
        assert_eq!(edge.get("age"), Some(&Value::Int(2020)));
    }

    #[test]
    fn test_edge_unknown_relation() {
        let err = decode_edge(&reply![3, 9, 10, 11, []], &schema()).unwrap_err();
        assert!(matches!(err, Error::UnknownSchemaId { kind: SchemaKind::RelationshipType, id: 9 }));
        assert!(decode_edge(&reply![3, 0, 10, 11], &schema()).is_err());
    }

    #[test]
    fn test_path() {
        let cell = reply![
            [6, [[8, [1, [0], []]], [8, [2, [], []]]]],
            [6, [[7, [10, 0, 1, 2, []]]]]
        ];
        let path = decode_path(&cell, &schema()).unwrap();
        assert_eq!(path.nodes_count(), 2);
        assert_eq!(path.edge_count(), 1);
        assert_eq!(path.to_string(), "<(1)-[10]->(2)>");
    }

    #[test]
    fn test_path_with_wrong_element_type_is_empty() {
        let cell = reply![
            [6, [[8, [1, [], []]], [3, 5]]],
            [6, [[7, [10, 0, 1, 2, []]]]]
        ];
        let path = decode_path(&cell, &schema()).unwrap();
        assert_eq!(path.nodes_count(), 0);
        assert_eq!(path.edge_count(), 0);
    }

    #[test]
    fn test_path_with_bad_counts_is_empty() {
        let cell = reply![
            [6, [[8, [1, [], []]]]],
            [6, [[7, [10, 0, 1, 2, []]]]]
        ];
        let path = decode_path(&cell, &schema()).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.edge_count(), 0);
    }

    #[test]
    fn test_path_sides_must_be_arrays() {
        let err = decode_path(&reply![[3, 1], [6, []]], &schema()).unwrap_err();
        assert!(err.to_string().contains("not array"));
        assert!(decode_path(&reply![[6, []]], &schema()).is_err());
    }
}
