//! PropertyMap: the key-value store on nodes and edges.

use std::collections::HashMap;
use super::Value;
use crate::cypher::to_literal;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;

/// Convert iterator of (key, value) pairs into a map value.
impl<K, V> From<Vec<(K, V)>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// `k:v` pairs joined by commas, keys sorted so output is stable.
pub(crate) fn format_properties(props: &PropertyMap) -> String {
    let mut pairs: Vec<(&String, &Value)> = props.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs.into_iter()
        .map(|(k, v)| format!("{k}:{}", to_literal(v)))
        .collect::<Vec<_>>()
        .join(",")
}
