//! Scalar cell decoding: `[type_tag, payload]` → [`Value`].
//!
//! The decoder never coerces between tags. A payload whose wire type does
//! not match what its tag promises is an error, never a best guess.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta};

use super::{ScalarType, Reply, entity, expect_array, expect_int, expect_str};
use crate::model::{Point, Value};
use crate::schema::Resolver;
use crate::{Error, Result};

/// Decode a whole cell, which must be an array `[tag, payload, ..]`.
pub fn decode_cell(cell: &Reply, schema: &dyn Resolver) -> Result<Value> {
    decode_tagged(expect_array(cell, "scalar payload")?, schema)
}

/// Decode `[tag, payload]`. Elements past the payload are ignored.
pub fn decode_tagged(cell: &[Reply], schema: &dyn Resolver) -> Result<Value> {
    let [tag, payload, ..] = cell else {
        return Err(Error::Shape(format!("scalar cell too short: {} elements", cell.len())));
    };
    let tag = ScalarType::try_from(expect_int(tag, "scalar type")?)?;

    match tag {
        ScalarType::Null => Ok(Value::Null),
        ScalarType::String => Ok(Value::String(string_payload(tag, payload)?.to_owned())),
        ScalarType::Integer => int_payload(tag, payload).map(Value::Int),
        // Only the exact lowercase "true" is true; everything else is false.
        ScalarType::Boolean => Ok(Value::Bool(string_payload(tag, payload)? == "true")),
        ScalarType::Double => parse_float(tag, string_payload(tag, payload)?).map(Value::Float),
        ScalarType::Array => decode_array(payload, schema).map(Value::List),
        ScalarType::Edge => entity::decode_edge(payload, schema).map(Value::from),
        ScalarType::Node => entity::decode_node(payload, schema).map(Value::from),
        ScalarType::Path => entity::decode_path(payload, schema).map(Value::from),
        ScalarType::Map => decode_map(payload, schema).map(Value::Map),
        ScalarType::Point => decode_point(payload).map(Value::Point),
        ScalarType::VectorF32 => decode_vector(payload).map(Value::Vector),
        ScalarType::LocalDateTime => {
            instant(tag, payload).map(|dt| Value::LocalDateTime(dt.naive_utc()))
        }
        ScalarType::Date => instant(tag, payload).map(|dt| Value::Date(dt.date_naive())),
        ScalarType::LocalTime => instant(tag, payload).map(|dt| Value::LocalTime(dt.time())),
        ScalarType::Duration => {
            let secs = int_payload(tag, payload)?;
            TimeDelta::try_seconds(secs)
                .map(Value::Duration)
                .ok_or_else(|| out_of_range(tag, secs))
        }
    }
}

/// Decode a payload of nested tagged cells, preserving order.
pub(crate) fn decode_array(payload: &Reply, schema: &dyn Resolver) -> Result<Vec<Value>> {
    expect_array(payload, "array payload")?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let cell = item
                .as_array()
                .ok_or_else(|| Error::Shape(format!("array element {i} not scalar payload")))?;
            decode_tagged(cell, schema)
        })
        .collect()
}

/// `[key, cell, key, cell, ...]`. Later duplicate keys win.
fn decode_map(payload: &Reply, schema: &dyn Resolver) -> Result<HashMap<String, Value>> {
    let raw = expect_array(payload, "map payload")?;
    if raw.len() % 2 != 0 {
        return Err(Error::Shape(format!("map payload length is not even: {}", raw.len())));
    }

    let mut map = HashMap::with_capacity(raw.len() / 2);
    for pair in raw.chunks_exact(2) {
        let key = expect_str(&pair[0], "map key")?;
        let cell = pair[1]
            .as_array()
            .ok_or_else(|| Error::Shape(format!("map value for {key:?} not scalar payload")))?;
        map.insert(key.to_owned(), decode_tagged(cell, schema)?);
    }
    Ok(map)
}

/// `["<lat>", "<lon>"]` as numeric strings.
fn decode_point(payload: &Reply) -> Result<Point> {
    let [lat, lon, ..] = expect_array(payload, "point payload")? else {
        return Err(Error::Shape("point payload needs latitude and longitude".into()));
    };
    let latitude = parse_float(ScalarType::Point, expect_str(lat, "point latitude")?)?;
    let longitude = parse_float(ScalarType::Point, expect_str(lon, "point longitude")?)?;
    Ok(Point { latitude, longitude })
}

/// Native doubles narrowed to f32.
fn decode_vector(payload: &Reply) -> Result<Vec<f32>> {
    expect_array(payload, "vector payload")?
        .iter()
        .map(|item| match item {
            Reply::Double(d) => Ok(*d as f32),
            other => Err(Error::Payload {
                tag: ScalarType::VectorF32,
                expected: "double",
                got: other.type_name(),
            }),
        })
        .collect()
}

fn string_payload(tag: ScalarType, payload: &Reply) -> Result<&str> {
    payload.as_str().ok_or_else(|| Error::Payload {
        tag,
        expected: "string",
        got: payload.type_name(),
    })
}

fn int_payload(tag: ScalarType, payload: &Reply) -> Result<i64> {
    payload.as_int().ok_or_else(|| Error::Payload {
        tag,
        expected: "int64",
        got: payload.type_name(),
    })
}

fn parse_float(tag: ScalarType, s: &str) -> Result<f64> {
    s.parse::<f64>().map_err(|_| Error::InvalidNumber {
        what: tag.name(),
        input: s.to_owned(),
    })
}

/// Unix seconds → UTC instant.
fn instant(tag: ScalarType, payload: &Reply) -> Result<DateTime<chrono::Utc>> {
    let secs = int_payload(tag, payload)?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| out_of_range(tag, secs))
}

fn out_of_range(tag: ScalarType, secs: i64) -> Error {
    Error::InvalidNumber { what: tag.name(), input: secs.to_string() }
}
