//! Integer tags of the compact format.

use std::fmt;

use crate::Error;

/// How every cell of a result column is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Scalar = 1,
    Node = 2,
    Relation = 3,
}

impl TryFrom<i64> for ColumnType {
    type Error = Error;

    fn try_from(tag: i64) -> Result<Self, Error> {
        match tag {
            1 => Ok(ColumnType::Scalar),
            2 => Ok(ColumnType::Node),
            3 => Ok(ColumnType::Relation),
            other => Err(Error::UnknownColumnType(other)),
        }
    }
}

/// Type tag of a scalar cell `[tag, payload]`.
///
/// Tag 0 is reserved by the server for "unknown" and is rejected like any
/// other unrecognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Null = 1,
    String = 2,
    Integer = 3,
    Boolean = 4,
    Double = 5,
    Array = 6,
    Edge = 7,
    Node = 8,
    Path = 9,
    Map = 10,
    Point = 11,
    VectorF32 = 12,
    LocalDateTime = 13,
    Date = 14,
    LocalTime = 15,
    Duration = 16,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Null => "null",
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Boolean => "boolean",
            ScalarType::Double => "double",
            ScalarType::Array => "array",
            ScalarType::Edge => "edge",
            ScalarType::Node => "node",
            ScalarType::Path => "path",
            ScalarType::Map => "map",
            ScalarType::Point => "point",
            ScalarType::VectorF32 => "vector",
            ScalarType::LocalDateTime => "localdatetime",
            ScalarType::Date => "date",
            ScalarType::LocalTime => "localtime",
            ScalarType::Duration => "duration",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for ScalarType {
    type Error = Error;

    fn try_from(tag: i64) -> Result<Self, Error> {
        Ok(match tag {
            1 => ScalarType::Null,
            2 => ScalarType::String,
            3 => ScalarType::Integer,
            4 => ScalarType::Boolean,
            5 => ScalarType::Double,
            6 => ScalarType::Array,
            7 => ScalarType::Edge,
            8 => ScalarType::Node,
            9 => ScalarType::Path,
            10 => ScalarType::Map,
            11 => ScalarType::Point,
            12 => ScalarType::VectorF32,
            13 => ScalarType::LocalDateTime,
            14 => ScalarType::Date,
            15 => ScalarType::LocalTime,
            16 => ScalarType::Duration,
            other => return Err(Error::UnknownScalarType(other)),
        })
    }
}
