//! End-to-end decoding tests.
//!
//! Each test feeds a complete compact reply through `QueryResult::from_reply`
//! against a pre-seeded `SchemaCache` and checks the typed result.

use falkordb_compact::{
    Edge, Error, Node, NodeId, Path, QueryResult, Reply, SchemaCache, Value, reply,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn schema() -> SchemaCache {
    SchemaCache::with_data(
        ["Person", "Admin"],
        ["KNOWS", "OWNS"],
        ["name", "age", "since"],
    )
}

fn decode(reply: Reply) -> falkordb_compact::Result<QueryResult> {
    QueryResult::from_reply(&reply, &schema())
}

// ============================================================================
// 1. Integer column, three rows, statistics
// ============================================================================

#[test]
fn test_integer_rows_with_statistics() {
    let mut result = decode(reply![
        [[1, "x"]],
        [[[3, 1]], [[3, 2]], [[3, 3]]],
        ["Nodes created: 0"]
    ])
    .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.nodes_created(), 0);
    assert_eq!(result.column_names(), vec!["x"]);

    let mut seen = Vec::new();
    while result.advance() {
        seen.push(result.current().unwrap().get_as::<i64>("x").unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3]);
    assert!(!result.advance());
    assert!(result.current().is_none());
}

// ============================================================================
// 2. Node column with two labels
// ============================================================================

#[test]
fn test_node_column() {
    let result = decode(reply![
        [[2, "n"]],
        [[[7, [0, 1], []]]],
        []
    ])
    .unwrap();

    let node: Node = result.records()[0].get_as("n").unwrap();
    assert_eq!(node, Node::new(NodeId(7)).with_labels(["Person", "Admin"]));
    assert_eq!(node.alias, None);
}

// ============================================================================
// 3. Node and relation columns with properties
// ============================================================================

#[test]
fn test_node_and_relation_with_properties() {
    let result = decode(reply![
        [[2, "a"], [3, "r"]],
        [[
            [1, [0], [[0, 2, "Ann"], [1, 3, 41]]],
            [10, 0, 1, 2, [[2, 3, 2019]]]
        ]],
        ["Cached execution: 1", "Query internal execution time: 0.25 milliseconds"]
    ])
    .unwrap();

    let record = &result.records()[0];
    let a: Node = record.get_as("a").unwrap();
    assert_eq!(a.get("name"), Some(&Value::from("Ann")));
    assert_eq!(a.get("age"), Some(&Value::Int(41)));

    let r: Edge = record.get_as("r").unwrap();
    assert_eq!(r.relation, "KNOWS");
    assert_eq!(r.src_node_id(), NodeId(1));
    assert_eq!(r.dst_node_id(), NodeId(2));
    assert_eq!(r.get("since"), Some(&Value::Int(2019)));

    assert!(result.cached_execution());
    assert_eq!(result.internal_execution_time(), 0.25);
}

// ============================================================================
// 4. Scalar column carrying nested entities
// ============================================================================

#[test]
fn test_scalar_map_list_and_path() {
    let result = decode(reply![
        [[1, "m"], [1, "l"], [1, "p"]],
        [[
            [10, ["a", [3, 1], "b", [2, "y"]]],
            [6, [[8, [1, [0], []]], [4, "TRUE"]]],
            [9, [
                [6, [[8, [1, [0], []]], [8, [2, [1], []]]]],
                [6, [[7, [10, 1, 1, 2, []]]]]
            ]]
        ]],
        []
    ])
    .unwrap();

    let record = &result.records()[0];
    assert_eq!(
        record.get("m"),
        Some(&Value::from(vec![("a", Value::Int(1)), ("b", Value::from("y"))]))
    );

    let list: Vec<Value> = record.get_as("l").unwrap();
    assert_eq!(list[0].as_node().map(|n| n.id), Some(NodeId(1)));
    assert_eq!(list[1], Value::Bool(false));

    let path: Path = record.get_as("p").unwrap();
    assert_eq!(path.nodes_count(), 2);
    assert_eq!(path.edge_count(), 1);
    assert_eq!(path.first_node().map(|n| n.id), Some(NodeId(1)));
    assert_eq!(path.last_node().map(|n| n.labels.clone()), Some(vec!["Admin".to_string()]));
    assert_eq!(path.to_string(), "<(1)-[10]->(2)>");
}

// ============================================================================
// 5. Write query: statistics only
// ============================================================================

#[test]
fn test_statistics_only_reply() {
    let result = decode(reply![[
        "Labels added: 1",
        "Nodes created: 2",
        "Properties set: 4",
        "Relationships created: 1"
    ]])
    .unwrap();

    assert!(result.is_empty());
    assert!(result.columns().is_empty());
    assert_eq!(result.labels_added(), 1);
    assert_eq!(result.nodes_created(), 2);
    assert_eq!(result.properties_set(), 4);
    assert_eq!(result.relationships_created(), 1);
    assert_eq!(result.relationships_deleted(), 0);
    assert_eq!(result.indices_created(), 0);

    let empty = decode(reply![[]]).unwrap();
    assert!(empty.is_empty());
    assert!(empty.statistics().is_empty());
}

// ============================================================================
// 6. Error taxonomy through the public API
// ============================================================================

#[test]
fn test_error_kinds() {
    let err = decode(reply![]).unwrap_err();
    assert!(err.to_string().contains("empty response payload"));
    assert!(err.is_decode());

    let err = decode(reply![[[1, "x"]], [[[3, "1"]]], []]).unwrap_err();
    assert!(matches!(err, Error::Payload { .. }), "{err}");

    let err = decode(reply![[[2, "n"]], [[[1, [9], []]]], []]).unwrap_err();
    assert!(err.to_string().contains("unknown label index 9"), "{err}");

    let err = decode(reply![[[4, "x"]], [], []]).unwrap_err();
    assert!(matches!(err, Error::UnknownColumnType(4)));

    let err = decode(reply![[[1, "x"]], [[[42, 1]]], []]).unwrap_err();
    assert!(matches!(err, Error::UnknownScalarType(42)));
}

// ============================================================================
// Properties
// ============================================================================

fn non_int_payload() -> impl Strategy<Value = Reply> {
    prop_oneof![
        Just(Reply::Nil),
        any::<f64>().prop_map(Reply::Double),
        ".*".prop_map(Reply::String),
        prop::collection::vec(any::<i64>().prop_map(Reply::Int), 0..4).prop_map(Reply::Array),
    ]
}

proptest! {
    #[test]
    fn prop_integer_tag_rejects_non_int(payload in non_int_payload()) {
        let cell = Reply::Array(vec![Reply::Int(3), payload]);
        let result = falkordb_compact::protocol::decode_cell(&cell, &SchemaCache::new());
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_only_lowercase_true_is_true(s in ".*") {
        let cell = Reply::Array(vec![Reply::Int(4), Reply::String(s.clone())]);
        let value = falkordb_compact::protocol::decode_cell(&cell, &SchemaCache::new()).unwrap();
        prop_assert_eq!(value, Value::Bool(s == "true"));
    }

    #[test]
    fn prop_column_count_mismatch_always_fails(columns in 1usize..5, cells in 0usize..8) {
        prop_assume!(columns != cells);
        let header = (0..columns)
            .map(|i| reply![1, (format!("c{i}"))])
            .collect::<Vec<_>>();
        let row = (0..cells).map(|_| reply![3, 1]).collect::<Vec<_>>();
        let raw = Reply::Array(vec![
            Reply::Array(header),
            Reply::Array(vec![Reply::Array(row)]),
            Reply::Array(vec![]),
        ]);
        let err = QueryResult::from_reply(&raw, &SchemaCache::new()).unwrap_err();
        prop_assert!(err.to_string().contains("column count mismatch"), "{}", err);
    }

    #[test]
    fn prop_string_display_is_quoted(s in "[a-zA-Z0-9 ]{0,16}") {
        let cell = Reply::Array(vec![Reply::Int(2), Reply::String(s.clone())]);
        let value = falkordb_compact::protocol::decode_cell(&cell, &SchemaCache::new()).unwrap();
        prop_assert_eq!(value.to_string(), format!("{s:?}"));
    }
}
