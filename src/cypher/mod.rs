//! # Cypher Text
//!
//! Renders values as Cypher literals so they can be spliced into query
//! text: parameter headers, procedure arguments and composed patterns.
//! Pure functions with no I/O and no state.

use crate::model::{PropertyMap, Value};

/// Render a value as a Cypher literal.
///
/// Graph entities have no literal form; they are rendered as the quoted
/// text of their display form.
pub fn to_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => quote(s),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(to_literal).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Map(m) => {
            let mut pairs: Vec<_> = m.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            let inner: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{k}: {}", to_literal(v)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        Value::Point(p) => format!("point({{latitude: {}, longitude: {}}})", p.latitude, p.longitude),
        Value::Vector(v) => {
            let inner: Vec<String> = v.iter().map(f32::to_string).collect();
            format!("vecf32([{}])", inner.join(","))
        }
        Value::Date(d) => format!("date('{}')", d.format("%Y-%m-%d")),
        Value::LocalDateTime(dt) => format!("localdatetime('{}')", dt.format("%Y-%m-%dT%H:%M:%S")),
        Value::LocalTime(t) => format!("localtime('{}')", t.format("%H:%M:%S")),
        Value::Duration(d) => format!("duration({{seconds: {}}})", d.num_seconds()),
        Value::Node(_) | Value::Edge(_) | Value::Path(_) => quote(&value.to_string()),
    }
}

/// Double-quoted with backslash escapes.
fn quote(s: &str) -> String {
    format!("{s:?}")
}

/// Build the `CYPHER k=v ...` parameter prefix. Keys are emitted sorted.
pub fn params_header(params: &PropertyMap) -> String {
    let mut pairs: Vec<_> = params.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut header = String::from("CYPHER ");
    for (key, value) in pairs {
        header.push_str(key);
        header.push('=');
        header.push_str(&to_literal(value));
        header.push(' ');
    }
    header
}

/// Build `CALL name(arg,...) YIELD a,b`.
pub fn procedure_call(name: &str, args: &[Value], yield_columns: &[&str]) -> String {
    let args: Vec<String> = args.iter().map(to_literal).collect();
    let mut query = format!("CALL {name}({})", args.join(","));
    if !yield_columns.is_empty() {
        query.push_str(" YIELD ");
        query.push_str(&yield_columns.join(","));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    #[test]
    fn test_scalar_literals() {
        assert_eq!(to_literal(&Value::from("hello")), "\"hello\"");
        assert_eq!(to_literal(&Value::from("it's \"q\"")), r#""it's \"q\"""#);
        assert_eq!(to_literal(&Value::Int(42)), "42");
        assert_eq!(to_literal(&Value::Float(3.0)), "3");
        assert_eq!(to_literal(&Value::Float(0.25)), "0.25");
        assert_eq!(to_literal(&Value::Bool(false)), "false");
        assert_eq!(to_literal(&Value::Null), "null");
    }

    #[test]
    fn test_container_literals() {
        let list = Value::List(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(to_literal(&list), "[1,\"a\"]");

        let map = Value::from(vec![("z", 1), ("a", 2)]);
        assert_eq!(to_literal(&map), "{a: 2,z: 1}");
    }

    #[test]
    fn test_temporal_literals() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(to_literal(&Value::Date(date)), "date('2023-01-01')");
        let dt = date.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(to_literal(&Value::LocalDateTime(dt)), "localdatetime('2023-01-01T12:00:00')");
        assert_eq!(to_literal(&Value::Duration(TimeDelta::seconds(60))), "duration({seconds: 60})");
    }

    #[test]
    fn test_params_header_sorted() {
        let mut params = PropertyMap::new();
        params.insert("name".into(), Value::from("Ada"));
        params.insert("age".into(), Value::Int(3));
        assert_eq!(params_header(&params), "CYPHER age=3 name=\"Ada\" ");
    }

    #[test]
    fn test_procedure_call() {
        assert_eq!(procedure_call("db.labels", &[], &[]), "CALL db.labels()");
        assert_eq!(
            procedure_call("db.idx.fulltext.queryNodes", &[Value::from("L"), Value::from("x")], &["node", "score"]),
            "CALL db.idx.fulltext.queryNodes(\"L\",\"x\") YIELD node,score"
        );
    }
}
