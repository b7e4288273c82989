//! # Compact Wire Format
//!
//! The server answers graph queries with an untyped tree of arrays,
//! integers, doubles and strings. [`Reply`] is that tree as the transport
//! hands it over; the decoders in [`scalar`] and [`entity`] turn tagged
//! cells of it into [`Value`](crate::model::Value)s.
//!
//! ```text
//! [type_tag, payload]                       scalar cell
//! [id, [label_id..], [[key_id, tag, payload]..]]          node
//! [id, rel_id, src_id, dst_id, [[key_id, tag, payload]..]] edge
//! ```

pub mod tags;
pub mod scalar;
pub mod entity;

pub use tags::{ColumnType, ScalarType};
pub use scalar::{decode_cell, decode_tagged};
pub use entity::{decode_edge, decode_node, decode_path};

use crate::{Error, Result};

/// One node of a raw response tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Reply>),
}

impl Reply {
    pub fn type_name(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Int(_) => "int64",
            Reply::Double(_) => "double",
            Reply::String(_) => "string",
            Reply::Array(_) => "array",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Reply::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<i64> for Reply { fn from(v: i64) -> Self { Reply::Int(v) } }
impl From<f64> for Reply { fn from(v: f64) -> Self { Reply::Double(v) } }
impl From<&str> for Reply { fn from(v: &str) -> Self { Reply::String(v.to_owned()) } }
impl From<String> for Reply { fn from(v: String) -> Self { Reply::String(v) } }
impl From<Vec<Reply>> for Reply { fn from(v: Vec<Reply>) -> Self { Reply::Array(v) } }

/// Build a [`Reply::Array`] from heterogeneous elements.
///
/// ```
/// use falkordb_compact::{reply, protocol::Reply};
/// let cell = reply![3, [1, "x"]];
/// assert_eq!(cell, Reply::Array(vec![Reply::Int(3), Reply::Array(vec![Reply::Int(1), Reply::from("x")])]));
/// ```
#[macro_export]
macro_rules! reply {
    (@item [$($inner:tt)*]) => { $crate::reply![$($inner)*] };
    (@item nil) => { $crate::protocol::Reply::Nil };
    (@item $e:expr) => { $crate::protocol::Reply::from($e) };
    ($($item:tt),* $(,)?) => {
        $crate::protocol::Reply::Array(vec![$($crate::reply!(@item $item)),*])
    };
}

/// Borrow `reply` as an array, or fail with `"<what> is not array"`.
pub(crate) fn expect_array<'a>(reply: &'a Reply, what: &str) -> Result<&'a [Reply]> {
    reply
        .as_array()
        .ok_or_else(|| Error::Shape(format!("{what} is not array: {}", reply.type_name())))
}

/// Read `reply` as an int64, or fail with `"<what> not int64"`.
pub(crate) fn expect_int(reply: &Reply, what: &str) -> Result<i64> {
    reply
        .as_int()
        .ok_or_else(|| Error::Shape(format!("{what} not int64: {}", reply.type_name())))
}

/// Read `reply` as a string, or fail with `"<what> not string"`.
pub(crate) fn expect_str<'a>(reply: &'a Reply, what: &str) -> Result<&'a str> {
    reply
        .as_str()
        .ok_or_else(|| Error::Shape(format!("{what} not string: {}", reply.type_name())))
}
