//! JSON export of decoded results.
//!
//! One JSON object per record, keyed by column name. Entities become plain
//! objects, temporal values become ISO-8601 strings, durations become whole
//! seconds.
//!
//! ```text
//! QueryResult → write_json_lines() → {"n":{...},"count":3}\n...
//! ```

use std::io::Write;

use serde_json::{Map, json};

use crate::execution::{QueryResult, Record};
use crate::model::*;
use crate::Result;

/// Write every record of `result` as one JSON line.
pub fn write_json_lines(result: &QueryResult, writer: &mut dyn Write) -> Result<()> {
    for record in result {
        serde_json::to_writer(&mut *writer, &record_to_json(record))?;
        writeln!(writer)?;
    }
    Ok(())
}

pub fn record_to_json(record: &Record) -> serde_json::Value {
    let object: Map<String, serde_json::Value> = record
        .keys()
        .iter()
        .zip(record.values())
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    serde_json::Value::Object(object)
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => json!(*i),
        Value::Float(f) => json!(*f),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(m) => props_to_json(m),
        Value::Node(n) => node_to_json(n),
        Value::Edge(e) => edge_to_json(e),
        Value::Path(p) => json!({
            "nodes": p.nodes().iter().map(node_to_json).collect::<Vec<_>>(),
            "edges": p.edges().iter().map(edge_to_json).collect::<Vec<_>>(),
        }),
        Value::Point(p) => json!({ "latitude": p.latitude, "longitude": p.longitude }),
        Value::Vector(v) => json!(v),
        Value::Date(d) => json!(d.to_string()),
        Value::LocalDateTime(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        Value::LocalTime(t) => json!(t.to_string()),
        Value::Duration(d) => json!(d.num_seconds()),
    }
}

fn props_to_json(props: &PropertyMap) -> serde_json::Value {
    let map: Map<String, serde_json::Value> = props
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    serde_json::Value::Object(map)
}

fn node_to_json(node: &Node) -> serde_json::Value {
    json!({
        "id": node.id.0,
        "labels": node.labels,
        "properties": props_to_json(&node.properties),
    })
}

fn edge_to_json(edge: &Edge) -> serde_json::Value {
    json!({
        "id": edge.id.0,
        "relation": edge.relation,
        "src": edge.src_node_id().0,
        "dst": edge.dst_node_id().0,
        "properties": props_to_json(&edge.properties),
    })
}
