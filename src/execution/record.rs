//! A single row of a decoded result.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::model::*;
use crate::{Error, Result};

/// Values of one row, paired with the column names of the result header.
///
/// Positional access is direct. Named access goes through a name → index
/// map built on first use.
#[derive(Debug, Clone)]
pub struct Record {
    values: Vec<Value>,
    keys: Arc<[String]>,
    index: OnceLock<HashMap<String, usize>>,
}

impl Record {
    pub fn new(values: Vec<Value>, keys: Arc<[String]>) -> Self {
        Self { values, keys, index: OnceLock::new() }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let index = self.index.get_or_init(|| {
            self.keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect()
        });
        index.get(key).and_then(|&i| self.values.get(i))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a typed value from the row.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<T> {
        let val = self.get(key)
            .ok_or_else(|| Error::NotFound(format!("Column '{key}'")))?;
        T::from_value(val)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.values == other.values
    }
}

/// Convert from Value to concrete types.
pub trait FromValue: Sized {
    fn from_value(val: &Value) -> Result<Self>;
}

fn type_error(expected: &str, val: &Value) -> Error {
    Error::TypeError {
        expected: expected.into(),
        got: val.type_name().into(),
    }
}

macro_rules! from_value {
    ($ty:ty, $expected:literal, $pat:pat => $out:expr) => {
        impl FromValue for $ty {
            fn from_value(val: &Value) -> Result<Self> {
                match val {
                    $pat => Ok($out),
                    _ => Err(type_error($expected, val)),
                }
            }
        }
    };
}

from_value!(Node, "Node", Value::Node(n) => (**n).clone());
from_value!(Edge, "Edge", Value::Edge(e) => (**e).clone());
from_value!(Path, "Path", Value::Path(p) => (**p).clone());
from_value!(String, "String", Value::String(s) => s.clone());
from_value!(i64, "Integer", Value::Int(i) => *i);
from_value!(f64, "Float", Value::Float(f) => *f);
from_value!(bool, "Boolean", Value::Bool(b) => *b);
from_value!(Point, "Point", Value::Point(p) => *p);
from_value!(Vec<f32>, "Vector", Value::Vector(v) => v.clone());
from_value!(Vec<Value>, "List", Value::List(l) => l.clone());

impl FromValue for Value {
    fn from_value(val: &Value) -> Result<Self> {
        Ok(val.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
